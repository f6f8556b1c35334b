//! Handlers for `/students` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/students` | Optional `?department_id`, `semester`, `status`, `search` |
//! | `POST`   | `/students` | Body: [`StudentInput`]; the department must exist |
//! | `GET`    | `/students/{id}` | 404 if not found |
//! | `PUT`    | `/students/{id}` | Body: [`StudentInput`] |
//! | `DELETE` | `/students/{id}` | Also removes alumni record and documents |
//! | `POST`   | `/students/{id}/transition-to-alumni` | Body: `{"graduation_year":2024}` |
//! | `POST`   | `/students/{id}/disconnect-studies` | Body: `{"reason":"...","last_semester":3}` |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use slms_core::{
  alumni::GraduationInput,
  store::CampusStore,
  student::{DisconnectInput, Student, StudentInput, StudentQuery},
};
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  extract::{Json, Path, Query},
};

/// `GET /students[?department_id=..&semester=..&status=..&search=..]`
pub async fn list<S: CampusStore>(
  State(state): State<AppState<S>>,
  Query(query): Query<StudentQuery>,
) -> Result<Json<Vec<Student>>, ApiError> {
  let students = state
    .store
    .list_students(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(students))
}

/// `POST /students`
pub async fn create<S: CampusStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<StudentInput>,
) -> Result<impl IntoResponse, ApiError> {
  let fields = body.validate()?;
  let student = state
    .store
    .create_student(fields)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(student)))
}

/// `GET /students/{id}`
pub async fn get_one<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Student>, ApiError> {
  let student = state
    .store
    .get_student(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("student {id} not found")))?;
  Ok(Json(student))
}

/// `PUT /students/{id}`
pub async fn update<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StudentInput>,
) -> Result<Json<Student>, ApiError> {
  let fields = body.validate()?;
  let student = state
    .store
    .update_student(id, fields)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(student))
}

/// `DELETE /students/{id}`
///
/// The rows go first; the student's document files are then removed
/// best-effort.
pub async fn delete_one<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let documents = state
    .store
    .delete_student(id)
    .await
    .map_err(ApiError::store)?;
  for document in &documents {
    state.files.remove(&document.file_path).await;
  }
  tracing::info!(student_id = %id, documents = documents.len(), "student deleted");
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /students/{id}/transition-to-alumni`
pub async fn transition<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<GraduationInput>,
) -> Result<impl IntoResponse, ApiError> {
  let graduation_year = body.validate()?;
  let record = state
    .store
    .transition_to_alumni(id, graduation_year)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(student_id = %id, alumni_id = %record.alumni_id, "student graduated");
  Ok((StatusCode::CREATED, Json(record)))
}

/// `POST /students/{id}/disconnect-studies`
pub async fn disconnect<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<DisconnectInput>,
) -> Result<Json<Student>, ApiError> {
  let disconnection = body.validate()?;
  let student = state
    .store
    .disconnect_studies(id, disconnection)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(student))
}
