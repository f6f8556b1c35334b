//! `GET /dashboard/stats` and `GET /health`.

use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};
use slms_core::{dashboard::DashboardStats, store::CampusStore};

use crate::{AppState, error::ApiError, extract::Json};

/// `GET /dashboard/stats`
pub async fn stats<S: CampusStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<DashboardStats>, ApiError> {
  let stats = state
    .store
    .dashboard_stats()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(stats))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
  Json(json!({ "status": "ok", "time": Utc::now() }))
}
