//! Handlers for `/departments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/departments` | Each entry carries its `student_count` |
//! | `POST`   | `/departments` | Body: `{"name":"...","code":"..."}` |
//! | `GET`    | `/departments/{id}` | 404 if not found |
//! | `PUT`    | `/departments/{id}` | Same body as create |
//! | `DELETE` | `/departments/{id}` | 400 with `student_count` while students remain |
//! | `GET`    | `/departments/{id}/students` | Optional `?semester=` |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use slms_core::{
  department::{Department, DepartmentInput, DepartmentRoster, DepartmentSummary},
  store::CampusStore,
  student::StudentQuery,
};
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  extract::{Json, Path, Query},
};

/// `GET /departments`
pub async fn list<S: CampusStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<DepartmentSummary>>, ApiError> {
  let departments = state
    .store
    .list_departments()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(departments))
}

/// `POST /departments`
pub async fn create<S: CampusStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<DepartmentInput>,
) -> Result<impl IntoResponse, ApiError> {
  let fields = body.validate()?;
  let department = state
    .store
    .create_department(fields)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(department)))
}

/// `GET /departments/{id}`
pub async fn get_one<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Department>, ApiError> {
  let department = state
    .store
    .get_department(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("department {id} not found")))?;
  Ok(Json(department))
}

/// `PUT /departments/{id}`
pub async fn update<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<DepartmentInput>,
) -> Result<Json<Department>, ApiError> {
  let fields = body.validate()?;
  let department = state
    .store
    .update_department(id, fields)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(department))
}

/// `DELETE /departments/{id}`
pub async fn delete_one<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  state
    .store
    .delete_department(id)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(department_id = %id, "department deleted");
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct RosterParams {
  pub semester: Option<u8>,
}

/// `GET /departments/{id}/students[?semester=<n>]`
pub async fn students<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<RosterParams>,
) -> Result<Json<DepartmentRoster>, ApiError> {
  let department = state
    .store
    .get_department(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("department {id} not found")))?;

  let query = StudentQuery {
    department_id: Some(id),
    semester: params.semester,
    ..Default::default()
  };
  let students = state
    .store
    .list_students(&query)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(DepartmentRoster {
    department,
    count: students.len(),
    students,
  }))
}
