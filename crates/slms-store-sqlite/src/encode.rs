//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings so that text
//! ordering matches chronological ordering. Calendar dates are `YYYY-MM-DD`.
//! Enums are stored as their snake_case names. Structured fields (career
//! history, support history, selected documents) are compact JSON. UUIDs are
//! hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::Row;
use slms_core::{
  alumni::{AlumniRecord, SupportChange},
  application::Application,
  career::CareerHistory,
  department::Department,
  document::Document,
  student::Student,
  validate::DATE_FORMAT,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|_| Error::InvalidColumn { column: "timestamp", value: s.to_owned() })
}

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|_| Error::InvalidColumn { column: "date", value: s.to_owned() })
}

/// Parse a snake_case enum column via its `strum::EnumString` impl.
pub fn decode_enum<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse()
    .map_err(|_| Error::InvalidColumn { column, value: s.to_owned() })
}

pub fn decode_count(n: i64) -> u64 { u64::try_from(n).unwrap_or_default() }

// ─── Departments ─────────────────────────────────────────────────────────────

pub const DEPARTMENT_COLUMNS: &str =
  "department_id, name, code, created_at, updated_at";

/// Raw strings read directly from a `departments` row.
pub struct RawDepartment {
  pub department_id: String,
  pub name:          String,
  pub code:          String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawDepartment {
  /// Reads [`DEPARTMENT_COLUMNS`] starting at column 0.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      department_id: row.get(0)?,
      name:          row.get(1)?,
      code:          row.get(2)?,
      created_at:    row.get(3)?,
      updated_at:    row.get(4)?,
    })
  }

  pub fn into_department(self) -> Result<Department> {
    Ok(Department {
      department_id: decode_uuid(&self.department_id)?,
      name:          self.name,
      code:          self.code,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

// ─── Students ────────────────────────────────────────────────────────────────

pub const STUDENT_COLUMNS: &str = "student_id, full_name, roll_number, \
   registration_number, department_id, semester, session, shift, status, \
   enrollment_date, discontinued_reason, last_semester, created_at, updated_at";

/// Raw values read directly from a `students` row.
pub struct RawStudent {
  pub student_id:          String,
  pub full_name:           String,
  pub roll_number:         String,
  pub registration_number: String,
  pub department_id:       String,
  pub semester:            u8,
  pub session:             String,
  pub shift:               String,
  pub status:              String,
  pub enrollment_date:     String,
  pub discontinued_reason: Option<String>,
  pub last_semester:       Option<u8>,
  pub created_at:          String,
  pub updated_at:          String,
}

impl RawStudent {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student_id:          row.get(0)?,
      full_name:           row.get(1)?,
      roll_number:         row.get(2)?,
      registration_number: row.get(3)?,
      department_id:       row.get(4)?,
      semester:            row.get(5)?,
      session:             row.get(6)?,
      shift:               row.get(7)?,
      status:              row.get(8)?,
      enrollment_date:     row.get(9)?,
      discontinued_reason: row.get(10)?,
      last_semester:       row.get(11)?,
      created_at:          row.get(12)?,
      updated_at:          row.get(13)?,
    })
  }

  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      student_id:          decode_uuid(&self.student_id)?,
      full_name:           self.full_name,
      roll_number:         self.roll_number,
      registration_number: self.registration_number,
      department_id:       decode_uuid(&self.department_id)?,
      semester:            self.semester,
      session:             self.session,
      shift:               decode_enum("shift", &self.shift)?,
      status:              decode_enum("status", &self.status)?,
      enrollment_date:     decode_date(&self.enrollment_date)?,
      discontinued_reason: self.discontinued_reason,
      last_semester:       self.last_semester,
      created_at:          decode_dt(&self.created_at)?,
      updated_at:          decode_dt(&self.updated_at)?,
    })
  }
}

// ─── Alumni ──────────────────────────────────────────────────────────────────

/// `current_position` is not read back: it is recomputed from
/// the history on load.
pub const ALUMNI_COLUMNS: &str = "alumni_id, student_id, alumni_type, \
   graduation_year, support_category, career_history, support_history, \
   created_at, updated_at";

/// Raw values read directly from an `alumni` row.
pub struct RawAlumni {
  pub alumni_id:        String,
  pub student_id:       String,
  pub alumni_type:      String,
  pub graduation_year:  i32,
  pub support_category: String,
  pub career_history:   String,
  pub support_history:  String,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawAlumni {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      alumni_id:        row.get(0)?,
      student_id:       row.get(1)?,
      alumni_type:      row.get(2)?,
      graduation_year:  row.get(3)?,
      support_category: row.get(4)?,
      career_history:   row.get(5)?,
      support_history:  row.get(6)?,
      created_at:       row.get(7)?,
      updated_at:       row.get(8)?,
    })
  }

  pub fn into_record(self) -> Result<AlumniRecord> {
    let support_history: Vec<SupportChange> =
      serde_json::from_str(&self.support_history)?;
    Ok(AlumniRecord {
      alumni_id: decode_uuid(&self.alumni_id)?,
      student_id: decode_uuid(&self.student_id)?,
      alumni_type: decode_enum("alumni_type", &self.alumni_type)?,
      graduation_year: self.graduation_year,
      support_category: decode_enum("support_category", &self.support_category)?,
      career: CareerHistory::from_json(&self.career_history)?,
      support_history,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Column values for writing a whole alumni row.
pub struct AlumniRow {
  pub alumni_id:        String,
  pub student_id:       String,
  pub alumni_type:      String,
  pub graduation_year:  i32,
  pub support_category: String,
  pub career_history:   String,
  pub current_position: Option<String>,
  pub support_history:  String,
  pub created_at:       String,
  pub updated_at:       String,
}

impl AlumniRow {
  /// Encode `record`; the history and its head are always encoded together.
  pub fn encode(record: &AlumniRecord) -> Result<Self> {
    let current_position = record
      .current_position()
      .map(serde_json::to_string)
      .transpose()?;
    Ok(Self {
      alumni_id: encode_uuid(record.alumni_id),
      student_id: encode_uuid(record.student_id),
      alumni_type: record.alumni_type.to_string(),
      graduation_year: record.graduation_year,
      support_category: record.support_category.to_string(),
      career_history: record.career.to_json()?,
      current_position,
      support_history: serde_json::to_string(&record.support_history)?,
      created_at: encode_dt(record.created_at),
      updated_at: encode_dt(record.updated_at),
    })
  }
}

// ─── Applications ────────────────────────────────────────────────────────────

pub const APPLICATION_COLUMNS: &str = "application_id, applicant_name, \
   father_name, mother_name, department, session, shift, roll_number, \
   registration_number, email, application_type, subject, message, \
   selected_documents, status, submitted_at, reviewed_at, reviewed_by, \
   review_notes";

/// Raw values read directly from an `applications` row.
pub struct RawApplication {
  pub application_id:      String,
  pub applicant_name:      String,
  pub father_name:         Option<String>,
  pub mother_name:         Option<String>,
  pub department:          String,
  pub session:             String,
  pub shift:               Option<String>,
  pub roll_number:         String,
  pub registration_number: String,
  pub email:               Option<String>,
  pub application_type:    String,
  pub subject:             String,
  pub message:             Option<String>,
  pub selected_documents:  String,
  pub status:              String,
  pub submitted_at:        String,
  pub reviewed_at:         Option<String>,
  pub reviewed_by:         Option<String>,
  pub review_notes:        Option<String>,
}

impl RawApplication {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      application_id:      row.get(0)?,
      applicant_name:      row.get(1)?,
      father_name:         row.get(2)?,
      mother_name:         row.get(3)?,
      department:          row.get(4)?,
      session:             row.get(5)?,
      shift:               row.get(6)?,
      roll_number:         row.get(7)?,
      registration_number: row.get(8)?,
      email:               row.get(9)?,
      application_type:    row.get(10)?,
      subject:             row.get(11)?,
      message:             row.get(12)?,
      selected_documents:  row.get(13)?,
      status:              row.get(14)?,
      submitted_at:        row.get(15)?,
      reviewed_at:         row.get(16)?,
      reviewed_by:         row.get(17)?,
      review_notes:        row.get(18)?,
    })
  }

  pub fn into_application(self) -> Result<Application> {
    Ok(Application {
      application_id:      decode_uuid(&self.application_id)?,
      applicant_name:      self.applicant_name,
      father_name:         self.father_name,
      mother_name:         self.mother_name,
      department:          self.department,
      session:             self.session,
      shift:               self
        .shift
        .as_deref()
        .map(|s| decode_enum("shift", s))
        .transpose()?,
      roll_number:         self.roll_number,
      registration_number: self.registration_number,
      email:               self.email,
      application_type:    decode_enum("application_type", &self.application_type)?,
      subject:             self.subject,
      message:             self.message,
      selected_documents:  serde_json::from_str(&self.selected_documents)?,
      status:              decode_enum("status", &self.status)?,
      submitted_at:        decode_dt(&self.submitted_at)?,
      reviewed_at:         self.reviewed_at.as_deref().map(decode_dt).transpose()?,
      reviewed_by:         self.reviewed_by,
      review_notes:        self.review_notes,
    })
  }
}

// ─── Documents ───────────────────────────────────────────────────────────────

pub const DOCUMENT_COLUMNS: &str = "document_id, student_id, file_name, \
   file_type, category, file_path, file_size, content_hash, uploaded_at";

/// Raw values read directly from a `documents` row.
pub struct RawDocument {
  pub document_id:  String,
  pub student_id:   String,
  pub file_name:    String,
  pub file_type:    String,
  pub category:     String,
  pub file_path:    String,
  pub file_size:    i64,
  pub content_hash: String,
  pub uploaded_at:  String,
}

impl RawDocument {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      document_id:  row.get(0)?,
      student_id:   row.get(1)?,
      file_name:    row.get(2)?,
      file_type:    row.get(3)?,
      category:     row.get(4)?,
      file_path:    row.get(5)?,
      file_size:    row.get(6)?,
      content_hash: row.get(7)?,
      uploaded_at:  row.get(8)?,
    })
  }

  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      document_id:  decode_uuid(&self.document_id)?,
      student_id:   decode_uuid(&self.student_id)?,
      file_name:    self.file_name,
      file_type:    self.file_type,
      category:     decode_enum("category", &self.category)?,
      file_path:    self.file_path,
      file_size:    u64::try_from(self.file_size).map_err(|_| {
        Error::InvalidColumn {
          column: "file_size",
          value:  self.file_size.to_string(),
        }
      })?,
      content_hash: self.content_hash,
      uploaded_at:  decode_dt(&self.uploaded_at)?,
    })
  }
}
