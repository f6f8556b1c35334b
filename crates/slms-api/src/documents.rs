//! Handlers for `/documents` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/documents` | Optional `?student_id`, `category`; newest first |
//! | `POST`   | `/documents` | Body: [`UploadBody`] with base64 `content` |
//! | `GET`    | `/documents/{id}` | Metadata only |
//! | `DELETE` | `/documents/{id}` | Record first, then the file, best-effort |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use base64::Engine as _;
use serde::Deserialize;
use sha2::{Digest as _, Sha256};
use slms_core::{
  ValidationError,
  document::{Document, DocumentCategory, DocumentQuery, NewDocument, file_extension},
  store::CampusStore,
  validate::required_text,
};
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  extract::{Json, Path, Query},
};

// ─── Upload ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /documents`.
#[derive(Debug, Deserialize)]
pub struct UploadBody {
  pub student_id: Option<Uuid>,
  #[serde(default)]
  pub category:   DocumentCategory,
  pub file_name:  Option<String>,
  /// File contents, standard base64.
  pub content:    Option<String>,
}

/// A decoded, validated upload.
#[derive(Debug)]
pub struct Upload {
  pub student_id: Uuid,
  pub category:   DocumentCategory,
  pub file_name:  String,
  pub bytes:      Vec<u8>,
}

impl UploadBody {
  pub fn validate(&self) -> Result<Upload, ValidationError> {
    let mut errors = ValidationError::new();
    let file_name =
      required_text(&mut errors, "file_name", self.file_name.as_deref());
    if self.student_id.is_none() {
      errors.push("student_id", "is required");
    }

    let bytes = match self.content.as_deref() {
      None => {
        errors.push("content", "is required");
        None
      }
      Some(content) => {
        match base64::engine::general_purpose::STANDARD.decode(content.trim()) {
          Ok(bytes) if bytes.is_empty() => {
            errors.push("content", "must not be empty");
            None
          }
          Ok(bytes) => Some(bytes),
          Err(_) => {
            errors.push("content", "is not valid base64");
            None
          }
        }
      }
    };

    match (self.student_id, file_name, bytes) {
      (Some(student_id), Some(file_name), Some(bytes)) if errors.is_empty() => {
        Ok(Upload { student_id, category: self.category, file_name, bytes })
      }
      _ => Err(errors),
    }
  }
}

/// `POST /documents`
///
/// The file is written before the record; if recording fails the file is
/// removed again.
pub async fn upload<S: CampusStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<UploadBody>,
) -> Result<impl IntoResponse, ApiError> {
  let upload = body.validate()?;

  state
    .store
    .get_student(upload.student_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("student {} not found", upload.student_id))
    })?;

  let file_type = file_extension(&upload.file_name);
  let file_path = state.files.write(&upload.bytes, &file_type).await?;
  let content_hash = hex::encode(Sha256::digest(&upload.bytes));

  let new = NewDocument {
    student_id: upload.student_id,
    file_name: upload.file_name,
    file_type,
    category: upload.category,
    file_path: file_path.clone(),
    file_size: upload.bytes.len() as u64,
    content_hash,
  };
  let document = match state.store.create_document(new).await {
    Ok(document) => document,
    Err(e) => {
      state.files.remove(&file_path).await;
      return Err(ApiError::store(e));
    }
  };

  tracing::info!(
    document_id = %document.document_id,
    student_id = %document.student_id,
    size = document.file_size,
    "document uploaded"
  );
  Ok((StatusCode::CREATED, Json(document)))
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /documents`
pub async fn list<S: CampusStore>(
  State(state): State<AppState<S>>,
  Query(query): Query<DocumentQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
  let documents = state
    .store
    .list_documents(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(documents))
}

/// `GET /documents/{id}`
pub async fn get_one<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
  let document = state
    .store
    .get_document(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("document {id} not found")))?;
  Ok(Json(document))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /documents/{id}`
///
/// Succeeds once the record is gone, whether or not the file could be
/// removed.
pub async fn delete_one<S: CampusStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let document = state
    .store
    .delete_document(id)
    .await
    .map_err(ApiError::store)?;
  state.files.remove(&document.file_path).await;
  Ok(StatusCode::NO_CONTENT)
}
