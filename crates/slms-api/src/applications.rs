//! Handlers for `/applications` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/applications` | Optional `?status`, `application_type`, `department`; newest first |
//! | `POST`   | `/applications/submit` | Public form; body: [`ApplicationSubmission`] |
//! | `GET`    | `/applications/{id}` | 404 if not found |
//! | `DELETE` | `/applications/{id}` | |
//! | `PUT`    | `/applications/{id}/review` | Body: `{"status":"approved","reviewed_by":"..."}` |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use slms_core::{
  application::{Application, ApplicationQuery, ApplicationSubmission, ReviewInput},
  store::CampusStore,
};
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  extract::{Json, Path, Query},
};

/// `GET /applications`
pub async fn list<S: CampusStore>(
  State(state): State<AppState<S>>,
  Query(query): Query<ApplicationQuery>,
) -> Result<Json<Vec<Application>>, ApiError> {
  let applications = state
    .store
    .list_applications(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(applications))
}

/// `POST /applications/submit`
pub async fn submit<S: CampusStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<ApplicationSubmission>,
) -> Result<impl IntoResponse, ApiError> {
  let application = body.validate()?;
  let application = state
    .store
    .submit_application(application)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    application_id = %application.application_id,
    application_type = %application.application_type,
    "application submitted"
  );
  Ok((StatusCode::CREATED, Json(application)))
}

/// `GET /applications/{id}`
pub async fn get_one<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Application>, ApiError> {
  let application = state
    .store
    .get_application(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("application {id} not found")))?;
  Ok(Json(application))
}

/// `PUT /applications/{id}/review`
pub async fn review<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ReviewInput>,
) -> Result<Json<Application>, ApiError> {
  let review = body.validate()?;
  let application = state
    .store
    .review_application(id, review)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(application))
}

/// `DELETE /applications/{id}`
pub async fn delete_one<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  state
    .store
    .delete_application(id)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
