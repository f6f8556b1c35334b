//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use slms_core::{
  ValidationError,
  store::{StoreError, StoreErrorKind},
};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("conflict: {0}")]
  Conflict(String),

  /// The record is still referenced and was left in place.
  #[error("{message}")]
  ProtectedDeletion { message: String, student_count: u64 },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a store failure by its classification; anything unclassified is an
  /// internal error.
  pub fn store<E: StoreError>(err: E) -> Self {
    match err.kind() {
      StoreErrorKind::NotFound => ApiError::NotFound(err.to_string()),
      StoreErrorKind::Conflict => ApiError::Conflict(err.to_string()),
      StoreErrorKind::ProtectedDeletion { student_count } => {
        ApiError::ProtectedDeletion { message: err.to_string(), student_count }
      }
      StoreErrorKind::Other => ApiError::Store(Box::new(err)),
    }
  }
}

/// Turn a deserializer message of the form `path: reason` into a field
/// error; messages without a path are attributed to `fallback`.
fn deserialize_error(text: &str, fallback: &str) -> ValidationError {
  let detail = text.split_once(": ").map_or(text, |(_, detail)| detail);
  match detail.split_once(": ") {
    Some((path, reason))
      if !path.is_empty() && !path.contains(char::is_whitespace) =>
    {
      ValidationError::single(path, reason)
    }
    _ => ValidationError::single(fallback, detail),
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    match rejection {
      JsonRejection::JsonDataError(e) => {
        ApiError::Validation(deserialize_error(&e.body_text(), "body"))
      }
      other => ApiError::BadRequest(other.body_text()),
    }
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    match rejection {
      QueryRejection::FailedToDeserializeQueryString(e) => {
        ApiError::Validation(deserialize_error(&e.body_text(), "query"))
      }
      other => ApiError::BadRequest(other.body_text()),
    }
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Validation(e) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": "validation failed", "fields": e.fields }),
      ),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, json!({ "error": m })),
      ApiError::ProtectedDeletion { message, student_count } => (
        StatusCode::BAD_REQUEST,
        json!({ "error": message, "student_count": student_count }),
      ),
      ApiError::Io(e) => {
        tracing::error!(error = %e, "file operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
    };
    (status, Json(body)).into_response()
  }
}
