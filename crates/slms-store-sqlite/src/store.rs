//! [`SqliteStore`]: the SQLite implementation of [`CampusStore`].

use std::path::Path;

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::{Connection, OptionalExtension as _, types::Value};
use uuid::Uuid;

use slms_core::{
  alumni::{AlumniQuery, AlumniRecord, AlumniUpdate, SupportCategory},
  application::{Application, ApplicationQuery, ApplicationStatus, NewApplication, Review},
  career::CareerPosition,
  dashboard::{AlumniStats, DashboardStats},
  department::{Department, DepartmentFields, DepartmentSummary},
  document::{Document, DocumentQuery, NewDocument},
  store::CampusStore,
  student::{Disconnection, Student, StudentFields, StudentQuery, StudentStatus},
};

use crate::{
  Error, Result,
  encode::{
    ALUMNI_COLUMNS, APPLICATION_COLUMNS, AlumniRow, DEPARTMENT_COLUMNS,
    DOCUMENT_COLUMNS, RawAlumni, RawApplication, RawDepartment, RawDocument,
    RawStudent, STUDENT_COLUMNS, decode_count, encode_date, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
  stats::{read_alumni_stats, read_application_stats, read_student_stats},
};

const DUPLICATE_DEPARTMENT: &str = "a department with this name or code already exists";
const DUPLICATE_ROLL_NUMBER: &str = "a student with this roll number already exists";

/// The current time at the precision timestamps are stored with, so records
/// returned from a write compare equal to the same records read back.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A campus store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Load an alumni record, let `change` edit it, and write it back, all in
  /// one transaction.
  async fn modify_alumni<F>(&self, alumni_id: Uuid, change: F) -> Result<AlumniRecord>
  where
    F: FnOnce(&mut AlumniRecord, DateTime<Utc>) + Send + 'static,
  {
    let now = now();
    let record = self
      .conn
      .call(move |conn| Ok(modify_alumni_in(conn, alumni_id, now, change)))
      .await??;
    tracing::debug!(alumni_id = %alumni_id, "updated alumni record");
    Ok(record)
  }
}

// ─── Synchronous helpers ─────────────────────────────────────────────────────
//
// These run on the connection thread inside `Connection::call`.

fn load_department(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawDepartment>> {
  conn
    .query_row(
      &format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE department_id = ?1"),
      rusqlite::params![id],
      RawDepartment::from_row,
    )
    .optional()
}

fn load_student(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawStudent>> {
  conn
    .query_row(
      &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?1"),
      rusqlite::params![id],
      RawStudent::from_row,
    )
    .optional()
}

/// Look up an alumni row by `alumni_id` or `student_id`.
fn load_alumni(
  conn: &Connection,
  key: &'static str,
  id: &str,
) -> rusqlite::Result<Option<RawAlumni>> {
  conn
    .query_row(
      &format!("SELECT {ALUMNI_COLUMNS} FROM alumni WHERE {key} = ?1"),
      rusqlite::params![id],
      RawAlumni::from_row,
    )
    .optional()
}

fn load_application(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawApplication>> {
  conn
    .query_row(
      &format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE application_id = ?1"),
      rusqlite::params![id],
      RawApplication::from_row,
    )
    .optional()
}

fn load_document(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawDocument>> {
  conn
    .query_row(
      &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE document_id = ?1"),
      rusqlite::params![id],
      RawDocument::from_row,
    )
    .optional()
}

fn exists(conn: &Connection, sql: &str, id: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(sql, rusqlite::params![id], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

fn count_in_department(conn: &Connection, id: &str) -> rusqlite::Result<i64> {
  conn.query_row(
    "SELECT COUNT(*) FROM students WHERE department_id = ?1",
    rusqlite::params![id],
    |r| r.get(0),
  )
}

fn student_status(conn: &Connection, id: &str) -> rusqlite::Result<Option<String>> {
  conn
    .query_row(
      "SELECT status FROM students WHERE student_id = ?1",
      rusqlite::params![id],
      |r| r.get(0),
    )
    .optional()
}

fn write_alumni(conn: &Connection, row: &AlumniRow) -> rusqlite::Result<usize> {
  conn.execute(
    "UPDATE alumni SET
       alumni_type = ?2, graduation_year = ?3, support_category = ?4,
       career_history = ?5, current_position = ?6, support_history = ?7,
       updated_at = ?8
     WHERE alumni_id = ?1",
    rusqlite::params![
      row.alumni_id,
      row.alumni_type,
      row.graduation_year,
      row.support_category,
      row.career_history,
      row.current_position,
      row.support_history,
      row.updated_at,
    ],
  )
}

fn modify_alumni_in<F>(
  conn: &mut Connection,
  alumni_id: Uuid,
  now: DateTime<Utc>,
  change: F,
) -> Result<AlumniRecord>
where
  F: FnOnce(&mut AlumniRecord, DateTime<Utc>),
{
  let tx = conn.transaction()?;
  let mut record = load_alumni(&tx, "alumni_id", &encode_uuid(alumni_id))?
    .ok_or(Error::AlumniNotFound(alumni_id))?
    .into_record()?;
  change(&mut record, now);
  write_alumni(&tx, &AlumniRow::encode(&record)?)?;
  tx.commit()?;
  Ok(record)
}

fn delete_department_in(conn: &mut Connection, department_id: Uuid) -> Result<()> {
  let id = encode_uuid(department_id);
  let tx = conn.transaction()?;
  if load_department(&tx, &id)?.is_none() {
    return Err(Error::DepartmentNotFound(department_id));
  }
  let student_count = decode_count(count_in_department(&tx, &id)?);
  if student_count > 0 {
    return Err(Error::DepartmentInUse { department_id, student_count });
  }
  tx.execute(
    "DELETE FROM departments WHERE department_id = ?1",
    rusqlite::params![id],
  )?;
  tx.commit()?;
  Ok(())
}

fn transition_in(conn: &mut Connection, record: &AlumniRecord) -> Result<()> {
  let student_id = encode_uuid(record.student_id);
  let tx = conn.transaction()?;

  match student_status(&tx, &student_id)? {
    None => return Err(Error::StudentNotFound(record.student_id)),
    Some(s) if s == StudentStatus::Discontinued.to_string() => {
      return Err(Error::Discontinued(record.student_id));
    }
    Some(_) => {}
  }
  if load_alumni(&tx, "student_id", &student_id)?.is_some() {
    return Err(Error::AlreadyAlumni(record.student_id));
  }

  let row = AlumniRow::encode(record)?;
  tx.execute(
    "UPDATE students SET status = ?2, updated_at = ?3 WHERE student_id = ?1",
    rusqlite::params![student_id, StudentStatus::Graduated.to_string(), row.created_at],
  )?;
  tx.execute(
    "INSERT INTO alumni
       (alumni_id, student_id, alumni_type, graduation_year, support_category,
        career_history, current_position, support_history, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    rusqlite::params![
      row.alumni_id,
      row.student_id,
      row.alumni_type,
      row.graduation_year,
      row.support_category,
      row.career_history,
      row.current_position,
      row.support_history,
      row.created_at,
      row.updated_at,
    ],
  )?;
  tx.commit()?;
  Ok(())
}

fn disconnect_in(
  conn: &mut Connection,
  student_id: Uuid,
  disconnection: &Disconnection,
  now: &str,
) -> Result<RawStudent> {
  let id = encode_uuid(student_id);
  let tx = conn.transaction()?;

  match student_status(&tx, &id)? {
    None => return Err(Error::StudentNotFound(student_id)),
    Some(s) if s == StudentStatus::Graduated.to_string() => {
      return Err(Error::AlreadyGraduated(student_id));
    }
    Some(_) => {}
  }

  tx.execute(
    "UPDATE students SET
       status = ?2, discontinued_reason = ?3, last_semester = ?4, updated_at = ?5
     WHERE student_id = ?1",
    rusqlite::params![
      id,
      StudentStatus::Discontinued.to_string(),
      disconnection.reason,
      disconnection.last_semester,
      now,
    ],
  )?;
  let raw = load_student(&tx, &id)?.ok_or(Error::StudentNotFound(student_id))?;
  tx.commit()?;
  Ok(raw)
}

fn delete_student_in(conn: &mut Connection, student_id: Uuid) -> Result<Vec<RawDocument>> {
  let id = encode_uuid(student_id);
  let tx = conn.transaction()?;

  let documents = {
    let mut stmt = tx.prepare(&format!(
      "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE student_id = ?1"
    ))?;
    stmt
      .query_map(rusqlite::params![id], RawDocument::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  // Alumni and document rows go with the student via ON DELETE CASCADE.
  let deleted = tx.execute(
    "DELETE FROM students WHERE student_id = ?1",
    rusqlite::params![id],
  )?;
  if deleted == 0 {
    return Err(Error::StudentNotFound(student_id));
  }
  tx.commit()?;
  Ok(documents)
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// A dynamically built `WHERE` clause with numbered parameters.
#[derive(Default)]
struct Filter {
  conditions: Vec<String>,
  params:     Vec<Value>,
}

impl Filter {
  /// Add `condition`, in which every `?` stands for `value`.
  fn push(&mut self, condition: &str, value: Value) {
    self.params.push(value);
    let placeholder = format!("?{}", self.params.len());
    self.conditions.push(condition.replace('?', &placeholder));
  }

  fn where_clause(&self) -> String {
    if self.conditions.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", self.conditions.join(" AND "))
    }
  }
}

fn student_filter(query: &StudentQuery) -> Filter {
  let mut filter = Filter::default();
  if let Some(id) = query.department_id {
    filter.push("department_id = ?", Value::Text(encode_uuid(id)));
  }
  if let Some(semester) = query.semester {
    filter.push("semester = ?", Value::Integer(semester.into()));
  }
  if let Some(status) = query.status {
    filter.push("status = ?", Value::Text(status.to_string()));
  }
  if let Some(term) = query.search_term() {
    filter.push(
      "(LOWER(full_name) LIKE ? OR LOWER(roll_number) LIKE ? \
       OR LOWER(registration_number) LIKE ?)",
      Value::Text(format!("%{}%", term.to_lowercase())),
    );
  }
  filter
}

fn alumni_filter(query: &AlumniQuery) -> Filter {
  let mut filter = Filter::default();
  if let Some(kind) = query.alumni_type {
    filter.push("alumni_type = ?", Value::Text(kind.to_string()));
  }
  if let Some(category) = query.support_category {
    filter.push("support_category = ?", Value::Text(category.to_string()));
  }
  if let Some(year) = query.graduation_year {
    filter.push("graduation_year = ?", Value::Integer(year.into()));
  }
  filter
}

fn application_filter(query: &ApplicationQuery) -> Filter {
  let mut filter = Filter::default();
  if let Some(status) = query.status {
    filter.push("status = ?", Value::Text(status.to_string()));
  }
  if let Some(kind) = query.application_type {
    filter.push("application_type = ?", Value::Text(kind.to_string()));
  }
  if let Some(department) = query.department.as_deref().map(str::trim)
    && !department.is_empty()
  {
    filter.push("LOWER(department) = ?", Value::Text(department.to_lowercase()));
  }
  filter
}

fn document_filter(query: &DocumentQuery) -> Filter {
  let mut filter = Filter::default();
  if let Some(id) = query.student_id {
    filter.push("student_id = ?", Value::Text(encode_uuid(id)));
  }
  if let Some(category) = query.category {
    filter.push("category = ?", Value::Text(category.to_string()));
  }
  filter
}

/// Run `SELECT {columns} FROM {table} {filter} ORDER BY {order}`.
fn select_filtered<T>(
  conn: &Connection,
  columns: &str,
  table: &str,
  filter: Filter,
  order: &str,
  from_row: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
  let sql = format!(
    "SELECT {columns} FROM {table} {} ORDER BY {order}",
    filter.where_clause()
  );
  let mut stmt = conn.prepare(&sql)?;
  stmt
    .query_map(rusqlite::params_from_iter(filter.params), from_row)?
    .collect()
}

// ─── CampusStore impl ────────────────────────────────────────────────────────

impl CampusStore for SqliteStore {
  type Error = Error;

  // ── Departments ───────────────────────────────────────────────────────────

  async fn create_department(&self, fields: DepartmentFields) -> Result<Department> {
    let now = now();
    let department = Department {
      department_id: Uuid::new_v4(),
      name:          fields.name,
      code:          fields.code,
      created_at:    now,
      updated_at:    now,
    };

    let id_str = encode_uuid(department.department_id);
    let name = department.name.clone();
    let code = department.code.clone();
    let at_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO departments (department_id, name, code, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![id_str, name, code, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| Error::from_write(e, DUPLICATE_DEPARTMENT))?;

    tracing::debug!(department_id = %department.department_id, code = %department.code, "created department");
    Ok(department)
  }

  async fn get_department(&self, id: Uuid) -> Result<Option<Department>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(load_department(conn, &id_str)?))
      .await?;
    raw.map(RawDepartment::into_department).transpose()
  }

  async fn list_departments(&self) -> Result<Vec<DepartmentSummary>> {
    let raws: Vec<(RawDepartment, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DEPARTMENT_COLUMNS},
             (SELECT COUNT(*) FROM students s
              WHERE s.department_id = departments.department_id)
           FROM departments
           ORDER BY name"
        ))?;
        let rows = stmt
          .query_map([], |row| Ok((RawDepartment::from_row(row)?, row.get(5)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(raw, count)| {
        Ok(DepartmentSummary {
          department:    raw.into_department()?,
          student_count: decode_count(count),
        })
      })
      .collect()
  }

  async fn update_department(
    &self,
    id: Uuid,
    fields: DepartmentFields,
  ) -> Result<Department> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE departments SET name = ?2, code = ?3, updated_at = ?4
           WHERE department_id = ?1",
          rusqlite::params![id_str, fields.name, fields.code, at_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(load_department(conn, &id_str)?)
      })
      .await
      .map_err(|e| Error::from_write(e, DUPLICATE_DEPARTMENT))?
      .ok_or(Error::DepartmentNotFound(id))?;

    tracing::debug!(department_id = %id, "updated department");
    raw.into_department()
  }

  async fn delete_department(&self, id: Uuid) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(delete_department_in(conn, id)))
      .await??;
    tracing::debug!(department_id = %id, "deleted department");
    Ok(())
  }

  async fn count_students(&self, department_id: Uuid) -> Result<u64> {
    let id_str = encode_uuid(department_id);
    let count = self
      .conn
      .call(move |conn| Ok(count_in_department(conn, &id_str)?))
      .await?;
    Ok(decode_count(count))
  }

  // ── Students ──────────────────────────────────────────────────────────────

  async fn create_student(&self, fields: StudentFields) -> Result<Student> {
    let now = now();
    let student = Student {
      student_id:          Uuid::new_v4(),
      full_name:           fields.full_name,
      roll_number:         fields.roll_number,
      registration_number: fields.registration_number,
      department_id:       fields.department_id,
      semester:            fields.semester,
      session:             fields.session,
      shift:               fields.shift,
      status:              StudentStatus::Active,
      enrollment_date:     fields.enrollment_date,
      discontinued_reason: None,
      last_semester:       None,
      created_at:          now,
      updated_at:          now,
    };

    let department_id = student.department_id;
    let values = (
      encode_uuid(student.student_id),
      student.full_name.clone(),
      student.roll_number.clone(),
      student.registration_number.clone(),
      encode_uuid(department_id),
      student.semester,
      student.session.clone(),
      student.shift.to_string(),
      student.status.to_string(),
      encode_date(student.enrollment_date),
      encode_dt(now),
    );

    self
      .conn
      .call(move |conn| {
        let (id, name, roll, reg, dept, semester, session, shift, status, enrolled, at) =
          values;
        if !exists(conn, "SELECT 1 FROM departments WHERE department_id = ?1", &dept)? {
          return Ok(Err(Error::DepartmentNotFound(department_id)));
        }
        conn.execute(
          "INSERT INTO students
             (student_id, full_name, roll_number, registration_number,
              department_id, semester, session, shift, status, enrollment_date,
              created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
          rusqlite::params![
            id, name, roll, reg, dept, semester, session, shift, status, enrolled, at
          ],
        )?;
        Ok(Ok(()))
      })
      .await
      .map_err(|e| Error::from_write(e, DUPLICATE_ROLL_NUMBER))??;

    tracing::debug!(student_id = %student.student_id, roll_number = %student.roll_number, "enrolled student");
    Ok(student)
  }

  async fn get_student(&self, id: Uuid) -> Result<Option<Student>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(load_student(conn, &id_str)?))
      .await?;
    raw.map(RawStudent::into_student).transpose()
  }

  async fn list_students<'a>(&'a self, query: &'a StudentQuery) -> Result<Vec<Student>> {
    let filter = student_filter(query);
    let raws = self
      .conn
      .call(move |conn| {
        Ok(select_filtered(
          conn,
          STUDENT_COLUMNS,
          "students",
          filter,
          "semester, roll_number",
          RawStudent::from_row,
        )?)
      })
      .await?;
    raws.into_iter().map(RawStudent::into_student).collect()
  }

  async fn update_student(&self, id: Uuid, fields: StudentFields) -> Result<Student> {
    let id_str = encode_uuid(id);
    let department_id = fields.department_id;
    let dept_str = encode_uuid(department_id);
    let shift = fields.shift.to_string();
    let enrolled = encode_date(fields.enrollment_date);
    let at_str = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        if !exists(conn, "SELECT 1 FROM departments WHERE department_id = ?1", &dept_str)? {
          return Ok(Err(Error::DepartmentNotFound(department_id)));
        }
        let changed = conn.execute(
          "UPDATE students SET
             full_name = ?2, roll_number = ?3, registration_number = ?4,
             department_id = ?5, semester = ?6, session = ?7, shift = ?8,
             enrollment_date = ?9, updated_at = ?10
           WHERE student_id = ?1",
          rusqlite::params![
            id_str,
            fields.full_name,
            fields.roll_number,
            fields.registration_number,
            dept_str,
            fields.semester,
            fields.session,
            shift,
            enrolled,
            at_str,
          ],
        )?;
        if changed == 0 {
          return Ok(Err(Error::StudentNotFound(id)));
        }
        Ok(load_student(conn, &id_str)?.ok_or(Error::StudentNotFound(id)))
      })
      .await
      .map_err(|e| Error::from_write(e, DUPLICATE_ROLL_NUMBER))??;

    tracing::debug!(student_id = %id, "updated student");
    raw.into_student()
  }

  async fn delete_student(&self, id: Uuid) -> Result<Vec<Document>> {
    let raws = self
      .conn
      .call(move |conn| Ok(delete_student_in(conn, id)))
      .await??;
    tracing::debug!(student_id = %id, documents = raws.len(), "deleted student");
    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn transition_to_alumni(
    &self,
    student_id: Uuid,
    graduation_year: i32,
  ) -> Result<AlumniRecord> {
    let record = AlumniRecord::new(student_id, graduation_year, now());
    let record = self
      .conn
      .call(move |conn| Ok(transition_in(conn, &record).map(|()| record)))
      .await??;
    tracing::debug!(
      student_id = %student_id,
      alumni_id = %record.alumni_id,
      graduation_year,
      "student transitioned to alumni"
    );
    Ok(record)
  }

  async fn disconnect_studies(
    &self,
    student_id: Uuid,
    disconnection: Disconnection,
  ) -> Result<Student> {
    let at_str = encode_dt(now());
    let raw = self
      .conn
      .call(move |conn| Ok(disconnect_in(conn, student_id, &disconnection, &at_str)))
      .await??;
    tracing::debug!(student_id = %student_id, "student discontinued");
    raw.into_student()
  }

  // ── Alumni ────────────────────────────────────────────────────────────────

  async fn get_alumni(&self, id: Uuid) -> Result<Option<AlumniRecord>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(load_alumni(conn, "alumni_id", &id_str)?))
      .await?;
    raw.map(RawAlumni::into_record).transpose()
  }

  async fn get_alumni_by_student(&self, student_id: Uuid) -> Result<Option<AlumniRecord>> {
    let id_str = encode_uuid(student_id);
    let raw = self
      .conn
      .call(move |conn| Ok(load_alumni(conn, "student_id", &id_str)?))
      .await?;
    raw.map(RawAlumni::into_record).transpose()
  }

  async fn list_alumni<'a>(&'a self, query: &'a AlumniQuery) -> Result<Vec<AlumniRecord>> {
    let filter = alumni_filter(query);
    let raws = self
      .conn
      .call(move |conn| {
        Ok(select_filtered(
          conn,
          ALUMNI_COLUMNS,
          "alumni",
          filter,
          "graduation_year DESC, created_at DESC",
          RawAlumni::from_row,
        )?)
      })
      .await?;
    raws.into_iter().map(RawAlumni::into_record).collect()
  }

  async fn update_alumni(&self, id: Uuid, update: AlumniUpdate) -> Result<AlumniRecord> {
    self
      .modify_alumni(id, move |record, now| update.apply(record, now))
      .await
  }

  async fn add_career_position(
    &self,
    alumni_id: Uuid,
    position: CareerPosition,
  ) -> Result<AlumniRecord> {
    self
      .modify_alumni(alumni_id, move |record, now| {
        record.career.add(position);
        record.updated_at = now;
      })
      .await
  }

  async fn update_support_category(
    &self,
    alumni_id: Uuid,
    category: SupportCategory,
    notes: Option<String>,
  ) -> Result<AlumniRecord> {
    self
      .modify_alumni(alumni_id, move |record, now| {
        record.change_support_category(category, notes, now);
      })
      .await
  }

  // ── Applications ──────────────────────────────────────────────────────────

  async fn submit_application(&self, input: NewApplication) -> Result<Application> {
    let application = Application {
      application_id:      Uuid::new_v4(),
      applicant_name:      input.applicant_name,
      father_name:         input.father_name,
      mother_name:         input.mother_name,
      department:          input.department,
      session:             input.session,
      shift:               input.shift,
      roll_number:         input.roll_number,
      registration_number: input.registration_number,
      email:               input.email,
      application_type:    input.application_type,
      subject:             input.subject,
      message:             input.message,
      selected_documents:  input.selected_documents,
      status:              ApplicationStatus::Pending,
      submitted_at:        now(),
      reviewed_at:         None,
      reviewed_by:         None,
      review_notes:        None,
    };

    let a = application.clone();
    let selected = serde_json::to_string(&a.selected_documents)?;
    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO applications ({APPLICATION_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                     ?15, ?16, NULL, NULL, NULL)"
          ),
          rusqlite::params![
            encode_uuid(a.application_id),
            a.applicant_name,
            a.father_name,
            a.mother_name,
            a.department,
            a.session,
            a.shift.map(|s| s.to_string()),
            a.roll_number,
            a.registration_number,
            a.email,
            a.application_type.to_string(),
            a.subject,
            a.message,
            selected,
            a.status.to_string(),
            encode_dt(a.submitted_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(application_id = %application.application_id, "application submitted");
    Ok(application)
  }

  async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(load_application(conn, &id_str)?))
      .await?;
    raw.map(RawApplication::into_application).transpose()
  }

  async fn list_applications<'a>(
    &'a self,
    query: &'a ApplicationQuery,
  ) -> Result<Vec<Application>> {
    let filter = application_filter(query);
    let raws = self
      .conn
      .call(move |conn| {
        Ok(select_filtered(
          conn,
          APPLICATION_COLUMNS,
          "applications",
          filter,
          "submitted_at DESC",
          RawApplication::from_row,
        )?)
      })
      .await?;
    raws.into_iter().map(RawApplication::into_application).collect()
  }

  async fn review_application(&self, id: Uuid, review: Review) -> Result<Application> {
    let id_str = encode_uuid(id);
    let status = review.status.to_string();
    let at_str = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE applications SET
             status = ?2, reviewed_at = ?3, reviewed_by = ?4, review_notes = ?5
           WHERE application_id = ?1",
          rusqlite::params![id_str, status, at_str, review.reviewed_by, review.review_notes],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(load_application(conn, &id_str)?)
      })
      .await?
      .ok_or(Error::ApplicationNotFound(id))?;

    tracing::debug!(application_id = %id, status = %raw.status, "application reviewed");
    raw.into_application()
  }

  async fn delete_application(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM applications WHERE application_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    if deleted == 0 {
      return Err(Error::ApplicationNotFound(id));
    }
    tracing::debug!(application_id = %id, "deleted application");
    Ok(())
  }

  // ── Documents ─────────────────────────────────────────────────────────────

  async fn create_document(&self, input: NewDocument) -> Result<Document> {
    let document = Document {
      document_id:  Uuid::new_v4(),
      student_id:   input.student_id,
      file_name:    input.file_name,
      file_type:    input.file_type,
      category:     input.category,
      file_path:    input.file_path,
      file_size:    input.file_size,
      content_hash: input.content_hash,
      uploaded_at:  now(),
    };

    let d = document.clone();
    let size = i64::try_from(d.file_size).map_err(|_| Error::InvalidColumn {
      column: "file_size",
      value:  d.file_size.to_string(),
    })?;
    self
      .conn
      .call(move |conn| {
        let student = encode_uuid(d.student_id);
        if !exists(conn, "SELECT 1 FROM students WHERE student_id = ?1", &student)? {
          return Ok(Err(Error::StudentNotFound(d.student_id)));
        }
        conn.execute(
          &format!(
            "INSERT INTO documents ({DOCUMENT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
          ),
          rusqlite::params![
            encode_uuid(d.document_id),
            student,
            d.file_name,
            d.file_type,
            d.category.to_string(),
            d.file_path,
            size,
            d.content_hash,
            encode_dt(d.uploaded_at),
          ],
        )?;
        Ok(Ok(()))
      })
      .await??;

    tracing::debug!(document_id = %document.document_id, path = %document.file_path, "recorded document");
    Ok(document)
  }

  async fn get_document(&self, id: Uuid) -> Result<Option<Document>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(load_document(conn, &id_str)?))
      .await?;
    raw.map(RawDocument::into_document).transpose()
  }

  async fn list_documents<'a>(&'a self, query: &'a DocumentQuery) -> Result<Vec<Document>> {
    let filter = document_filter(query);
    let raws = self
      .conn
      .call(move |conn| {
        Ok(select_filtered(
          conn,
          DOCUMENT_COLUMNS,
          "documents",
          filter,
          "uploaded_at DESC",
          RawDocument::from_row,
        )?)
      })
      .await?;
    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn delete_document(&self, id: Uuid) -> Result<Document> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| {
        let Some(raw) = load_document(conn, &id_str)? else {
          return Ok(None);
        };
        conn.execute(
          "DELETE FROM documents WHERE document_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(Some(raw))
      })
      .await?
      .ok_or(Error::DocumentNotFound(id))?;
    tracing::debug!(document_id = %id, "deleted document record");
    raw.into_document()
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  async fn alumni_stats(&self) -> Result<AlumniStats> {
    let raw = self
      .conn
      .call(|conn| Ok(read_alumni_stats(conn)?))
      .await?;
    raw.into_stats()
  }

  async fn dashboard_stats(&self) -> Result<DashboardStats> {
    let (students, alumni, applications) = self
      .conn
      .call(|conn| {
        // One read transaction so the three sections see the same snapshot.
        let tx = conn.transaction()?;
        let raw = (
          read_student_stats(&tx)?,
          read_alumni_stats(&tx)?,
          read_application_stats(&tx)?,
        );
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    Ok(DashboardStats {
      students:     students.into_stats()?,
      alumni:       alumni.into_stats()?,
      applications: applications.into_stats()?,
    })
  }
}
