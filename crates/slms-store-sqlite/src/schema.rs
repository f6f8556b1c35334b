//! SQL schema for the SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision; future migrations will be gated on that number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS departments (
    department_id TEXT PRIMARY KEY,
    name          TEXT NOT NULL UNIQUE,
    code          TEXT NOT NULL UNIQUE,   -- upper-case mnemonic, e.g. 'CST'
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

-- RESTRICT backs up the student-count check done before deleting a
-- department.
CREATE TABLE IF NOT EXISTS students (
    student_id          TEXT PRIMARY KEY,
    full_name           TEXT NOT NULL,
    roll_number         TEXT NOT NULL UNIQUE,
    registration_number TEXT NOT NULL,
    department_id       TEXT NOT NULL
                        REFERENCES departments(department_id) ON DELETE RESTRICT,
    semester            INTEGER NOT NULL CHECK (semester BETWEEN 1 AND 8),
    session             TEXT NOT NULL,
    shift               TEXT NOT NULL,   -- 'morning' | 'day' | 'evening'
    status              TEXT NOT NULL DEFAULT 'active',
    enrollment_date     TEXT NOT NULL,   -- YYYY-MM-DD
    discontinued_reason TEXT,
    last_semester       INTEGER,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL
);

-- career_history is a JSON array sorted by start_date descending.
-- current_position is its first element (or NULL) and is only ever written
-- in the same statement as career_history.
CREATE TABLE IF NOT EXISTS alumni (
    alumni_id        TEXT PRIMARY KEY,
    student_id       TEXT NOT NULL UNIQUE
                     REFERENCES students(student_id) ON DELETE CASCADE,
    alumni_type      TEXT NOT NULL DEFAULT 'recent',
    graduation_year  INTEGER NOT NULL,
    support_category TEXT NOT NULL DEFAULT 'no_support_needed',
    career_history   TEXT NOT NULL DEFAULT '[]',
    current_position TEXT,
    support_history  TEXT NOT NULL DEFAULT '[]',
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS applications (
    application_id      TEXT PRIMARY KEY,
    applicant_name      TEXT NOT NULL,
    father_name         TEXT,
    mother_name         TEXT,
    department          TEXT NOT NULL,   -- free text from the public form
    session             TEXT NOT NULL,
    shift               TEXT,
    roll_number         TEXT NOT NULL,
    registration_number TEXT NOT NULL,
    email               TEXT,
    application_type    TEXT NOT NULL DEFAULT 'other',
    subject             TEXT NOT NULL,
    message             TEXT,
    selected_documents  TEXT NOT NULL DEFAULT '[]',
    status              TEXT NOT NULL DEFAULT 'pending',
    submitted_at        TEXT NOT NULL,
    reviewed_at         TEXT,
    reviewed_by         TEXT,
    review_notes        TEXT
);

CREATE TABLE IF NOT EXISTS documents (
    document_id  TEXT PRIMARY KEY,
    student_id   TEXT NOT NULL
                 REFERENCES students(student_id) ON DELETE CASCADE,
    file_name    TEXT NOT NULL,
    file_type    TEXT NOT NULL,
    category     TEXT NOT NULL,
    file_path    TEXT NOT NULL,   -- relative to the document root
    file_size    INTEGER NOT NULL,
    content_hash TEXT NOT NULL,   -- SHA-256 hex
    uploaded_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS students_department_idx ON students(department_id);
CREATE INDEX IF NOT EXISTS students_status_idx     ON students(status);
CREATE INDEX IF NOT EXISTS alumni_year_idx         ON alumni(graduation_year);
CREATE INDEX IF NOT EXISTS applications_status_idx ON applications(status);
CREATE INDEX IF NOT EXISTS documents_student_idx   ON documents(student_id);

PRAGMA user_version = 1;
";
