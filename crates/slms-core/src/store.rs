//! The `CampusStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `slms-store-sqlite`).
//! The API layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  alumni::{AlumniQuery, AlumniRecord, AlumniUpdate, SupportCategory},
  application::{Application, ApplicationQuery, NewApplication, Review},
  career::CareerPosition,
  dashboard::{AlumniStats, DashboardStats},
  department::{Department, DepartmentFields, DepartmentSummary},
  document::{Document, DocumentQuery, NewDocument},
  student::{Disconnection, Student, StudentFields, StudentQuery},
};

// ─── Error classification ────────────────────────────────────────────────────

/// Backend-independent classification of a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
  /// The addressed record does not exist.
  NotFound,
  /// A uniqueness or state rule rejected the write.
  Conflict,
  /// A department still has students and cannot be deleted.
  ProtectedDeletion { student_count: u64 },
  /// Anything else; treated as an internal failure.
  Other,
}

/// Error type of a [`CampusStore`] backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> StoreErrorKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a storage backend.
///
/// Every write that touches more than one row, or reads before it writes, is
/// atomic: it either applies completely or not at all.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CampusStore: Send + Sync {
  type Error: StoreError;

  // ── Departments ───────────────────────────────────────────────────────

  fn create_department(
    &self,
    fields: DepartmentFields,
  ) -> impl Future<Output = Result<Department, Self::Error>> + Send + '_;

  /// Retrieve a department by UUID. Returns `None` if not found.
  fn get_department(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Department>, Self::Error>> + Send + '_;

  /// All departments ordered by name, each with its student count.
  fn list_departments(
    &self,
  ) -> impl Future<Output = Result<Vec<DepartmentSummary>, Self::Error>> + Send + '_;

  fn update_department(
    &self,
    id: Uuid,
    fields: DepartmentFields,
  ) -> impl Future<Output = Result<Department, Self::Error>> + Send + '_;

  /// Delete a department that has no students.
  ///
  /// Fails with [`StoreErrorKind::ProtectedDeletion`] while any student
  /// references it; the department is left intact in that case.
  fn delete_department(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Number of students enrolled in a department.
  fn count_students(
    &self,
    department_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Students ──────────────────────────────────────────────────────────

  /// Enrol a student. The department must exist.
  fn create_student(
    &self,
    fields: StudentFields,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  fn get_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  fn list_students<'a>(
    &'a self,
    query: &'a StudentQuery,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + 'a;

  fn update_student(
    &self,
    id: Uuid,
    fields: StudentFields,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Delete a student together with their alumni record and document rows.
  ///
  /// Returns the deleted documents so the caller can clean up their files.
  fn delete_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  /// Mark a student graduated and create their alumni record, atomically.
  fn transition_to_alumni(
    &self,
    student_id: Uuid,
    graduation_year: i32,
  ) -> impl Future<Output = Result<AlumniRecord, Self::Error>> + Send + '_;

  /// Mark a student discontinued.
  fn disconnect_studies(
    &self,
    student_id: Uuid,
    disconnection: Disconnection,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  // ── Alumni ────────────────────────────────────────────────────────────

  fn get_alumni(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<AlumniRecord>, Self::Error>> + Send + '_;

  fn get_alumni_by_student(
    &self,
    student_id: Uuid,
  ) -> impl Future<Output = Result<Option<AlumniRecord>, Self::Error>> + Send + '_;

  fn list_alumni<'a>(
    &'a self,
    query: &'a AlumniQuery,
  ) -> impl Future<Output = Result<Vec<AlumniRecord>, Self::Error>> + Send + 'a;

  fn update_alumni(
    &self,
    id: Uuid,
    update: AlumniUpdate,
  ) -> impl Future<Output = Result<AlumniRecord, Self::Error>> + Send + '_;

  /// Insert a validated position into an alumni record's career history.
  ///
  /// Runs as one read-modify-write: the history and the derived current
  /// position are written together, so concurrent additions cannot lose one
  /// another.
  fn add_career_position(
    &self,
    alumni_id: Uuid,
    position: CareerPosition,
  ) -> impl Future<Output = Result<AlumniRecord, Self::Error>> + Send + '_;

  /// Change the support category and append to the support history.
  fn update_support_category(
    &self,
    alumni_id: Uuid,
    category: SupportCategory,
    notes: Option<String>,
  ) -> impl Future<Output = Result<AlumniRecord, Self::Error>> + Send + '_;

  // ── Applications ──────────────────────────────────────────────────────

  /// Store a submission with status `pending`. `submitted_at` is set by the
  /// store.
  fn submit_application(
    &self,
    application: NewApplication,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + '_;

  fn get_application(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + '_;

  /// Newest submissions first.
  fn list_applications<'a>(
    &'a self,
    query: &'a ApplicationQuery,
  ) -> impl Future<Output = Result<Vec<Application>, Self::Error>> + Send + 'a;

  fn review_application(
    &self,
    id: Uuid,
    review: Review,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + '_;

  fn delete_application(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Documents ─────────────────────────────────────────────────────────

  /// Record metadata for a file that has already been written. The student
  /// must exist.
  fn create_document(
    &self,
    document: NewDocument,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  fn get_document(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  /// Newest uploads first.
  fn list_documents<'a>(
    &'a self,
    query: &'a DocumentQuery,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'a;

  /// Delete a document row and return it; removing the file is up to the
  /// caller.
  fn delete_document(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  // ── Statistics ────────────────────────────────────────────────────────

  fn alumni_stats(
    &self,
  ) -> impl Future<Output = Result<AlumniStats, Self::Error>> + Send + '_;

  fn dashboard_stats(
    &self,
  ) -> impl Future<Output = Result<DashboardStats, Self::Error>> + Send + '_;
}
