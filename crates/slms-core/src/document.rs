//! Documents: files attached to a student record. Only metadata lives in the
//! database; the bytes live on disk under the configured document root.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Longest file extension kept from an uploaded file name.
const MAX_EXTENSION_LEN: usize = 10;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentCategory {
  Nid,
  Marksheet,
  Certificate,
  AttendanceSheet,
  #[default]
  Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
  pub document_id:  Uuid,
  pub student_id:   Uuid,
  /// The name the file was uploaded with.
  pub file_name:    String,
  /// Lower-case extension without the dot; empty if there was none.
  pub file_type:    String,
  pub category:     DocumentCategory,
  /// Path relative to the document root.
  pub file_path:    String,
  pub file_size:    u64,
  /// SHA-256 hex digest of the file contents.
  pub content_hash: String,
  pub uploaded_at:  DateTime<Utc>,
}

/// Input to [`crate::store::CampusStore::create_document`]. The file has
/// already been written; `uploaded_at` is set by the store.
#[derive(Debug, Clone)]
pub struct NewDocument {
  pub student_id:   Uuid,
  pub file_name:    String,
  pub file_type:    String,
  pub category:     DocumentCategory,
  pub file_path:    String,
  pub file_size:    u64,
  pub content_hash: String,
}

/// Filters for listing documents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentQuery {
  pub student_id: Option<Uuid>,
  pub category:   Option<DocumentCategory>,
}

/// Extract a safe, lower-case extension from an uploaded file name.
///
/// Anything that is not short and alphanumeric yields an empty string, so the
/// result can be used verbatim in an on-disk file name.
pub fn file_extension(file_name: &str) -> String {
  let ext = match file_name.rsplit_once('.') {
    Some((stem, ext)) if !stem.is_empty() => ext,
    _ => return String::new(),
  };
  if ext.is_empty()
    || ext.len() > MAX_EXTENSION_LEN
    || !ext.chars().all(|c| c.is_ascii_alphanumeric())
  {
    return String::new();
  }
  ext.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extension_is_lowercased() {
    assert_eq!(file_extension("Marksheet.PDF"), "pdf");
    assert_eq!(file_extension("scan.final.jpeg"), "jpeg");
  }

  #[test]
  fn unsafe_or_missing_extensions_are_dropped() {
    assert_eq!(file_extension("README"), "");
    assert_eq!(file_extension(".bashrc"), "");
    assert_eq!(file_extension("x./etc"), "");
    assert_eq!(file_extension("a.verylongextension"), "");
  }

  #[test]
  fn category_text_form() {
    assert_eq!(DocumentCategory::AttendanceSheet.as_ref(), "attendance_sheet");
    assert_eq!("nid".parse::<DocumentCategory>().unwrap(), DocumentCategory::Nid);
  }
}
