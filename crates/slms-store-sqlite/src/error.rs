//! Error type for `slms-store-sqlite`.

use slms_core::store::{StoreError, StoreErrorKind};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] slms_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column holds a value the domain types cannot represent.
  #[error("invalid value {value:?} in column {column}")]
  InvalidColumn { column: &'static str, value: String },

  #[error("department not found: {0}")]
  DepartmentNotFound(Uuid),

  #[error("student not found: {0}")]
  StudentNotFound(Uuid),

  #[error("alumni record not found: {0}")]
  AlumniNotFound(Uuid),

  #[error("application not found: {0}")]
  ApplicationNotFound(Uuid),

  #[error("document not found: {0}")]
  DocumentNotFound(Uuid),

  #[error(
    "department {department_id} has {student_count} enrolled student(s); \
     reassign or remove them before deleting the department"
  )]
  DepartmentInUse { department_id: Uuid, student_count: u64 },

  /// A UNIQUE constraint rejected the write.
  #[error("{0}")]
  Duplicate(&'static str),

  #[error("student {0} already has an alumni record")]
  AlreadyAlumni(Uuid),

  #[error("student {0} has graduated")]
  AlreadyGraduated(Uuid),

  #[error("student {0} has discontinued their studies")]
  Discontinued(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// Lets synchronous helpers that run inside `Connection::call` use `?` on
// rusqlite results directly.
impl From<rusqlite::Error> for Error {
  fn from(err: rusqlite::Error) -> Self { Error::Database(err.into()) }
}

impl Error {
  /// Classify a failed write, turning UNIQUE violations into
  /// [`Error::Duplicate`] with the given message.
  pub(crate) fn from_write(err: tokio_rusqlite::Error, what: &'static str) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)) =
      &err
      && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    {
      return Error::Duplicate(what);
    }
    Error::Database(err)
  }
}

impl StoreError for Error {
  fn kind(&self) -> StoreErrorKind {
    match self {
      Error::DepartmentNotFound(_)
      | Error::StudentNotFound(_)
      | Error::AlumniNotFound(_)
      | Error::ApplicationNotFound(_)
      | Error::DocumentNotFound(_) => StoreErrorKind::NotFound,
      Error::DepartmentInUse { student_count, .. } => {
        StoreErrorKind::ProtectedDeletion { student_count: *student_count }
      }
      Error::Duplicate(_)
      | Error::AlreadyAlumni(_)
      | Error::AlreadyGraduated(_)
      | Error::Discontinued(_) => StoreErrorKind::Conflict,
      _ => StoreErrorKind::Other,
    }
  }
}
