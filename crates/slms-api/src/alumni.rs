//! Handlers for `/alumni` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/alumni` | Optional `?alumni_type`, `support_category`, `graduation_year` |
//! | `GET`  | `/alumni/stats` | Alumni section of the dashboard |
//! | `GET`  | `/alumni/{id}` | 404 if not found |
//! | `PUT`  | `/alumni/{id}` | Body: `{"alumni_type":..,"graduation_year":..}`, both optional |
//! | `POST` | `/alumni/{id}/career-positions` | Body: [`CareerPositionInput`] |
//! | `PUT`  | `/alumni/{id}/support-category` | Body: `{"support_category":..,"notes":..}` |

use axum::extract::State;
use slms_core::{
  alumni::{AlumniQuery, AlumniRecord, AlumniUpdate, SupportCategoryInput},
  career::CareerPositionInput,
  dashboard::AlumniStats,
  store::CampusStore,
};
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  extract::{Json, Path, Query},
};

/// `GET /alumni`
pub async fn list<S: CampusStore>(
  State(state): State<AppState<S>>,
  Query(query): Query<AlumniQuery>,
) -> Result<Json<Vec<AlumniRecord>>, ApiError> {
  let records = state
    .store
    .list_alumni(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(records))
}

/// `GET /alumni/stats`
pub async fn stats<S: CampusStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<AlumniStats>, ApiError> {
  let stats = state.store.alumni_stats().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}

/// `GET /alumni/{id}`
pub async fn get_one<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<AlumniRecord>, ApiError> {
  let record = state
    .store
    .get_alumni(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("alumni record {id} not found")))?;
  Ok(Json(record))
}

/// `PUT /alumni/{id}`
pub async fn update<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AlumniUpdate>,
) -> Result<Json<AlumniRecord>, ApiError> {
  let update = body.validate()?;
  let record = state
    .store
    .update_alumni(id, update)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(record))
}

/// `POST /alumni/{id}/career-positions`
///
/// Validation happens before the store is touched, so a rejected payload
/// leaves the record unchanged. Returns the whole record with its history
/// newest first.
pub async fn add_career_position<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<CareerPositionInput>,
) -> Result<Json<AlumniRecord>, ApiError> {
  let position = body.validate()?;
  let record = state
    .store
    .add_career_position(id, position)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(record))
}

/// `PUT /alumni/{id}/support-category`
pub async fn update_support_category<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SupportCategoryInput>,
) -> Result<Json<AlumniRecord>, ApiError> {
  let record = state
    .store
    .update_support_category(id, body.support_category, body.notes)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(record))
}
