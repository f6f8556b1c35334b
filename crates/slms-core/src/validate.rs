//! Field-level validation shared by every input type.
//!
//! Validators never stop at the first problem: each offending field is
//! recorded so a client can fix everything in one round trip.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Calendar dates are accepted in ISO 8601 extended form only.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single rejected field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

/// One or more fields of an input payload failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("validation failed: {}", describe(.fields))]
pub struct ValidationError {
  pub fields: Vec<FieldError>,
}

fn describe(fields: &[FieldError]) -> String {
  fields
    .iter()
    .map(|f| format!("{}: {}", f.field, f.message))
    .collect::<Vec<_>>()
    .join("; ")
}

impl ValidationError {
  pub fn new() -> Self { Self::default() }

  /// Shorthand for an error carrying exactly one field.
  pub fn single(field: &str, message: impl Into<String>) -> Self {
    let mut err = Self::new();
    err.push(field, message);
    err
  }

  pub fn push(&mut self, field: &str, message: impl Into<String>) {
    self.fields.push(FieldError {
      field:   field.to_owned(),
      message: message.into(),
    });
  }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }

  /// Whether `field` is among the rejected fields.
  pub fn has(&self, field: &str) -> bool {
    self.fields.iter().any(|f| f.field == field)
  }

  /// `Ok(value)` if nothing was recorded, otherwise `Err(self)`.
  pub fn finish<T>(self, value: T) -> Result<T, Self> {
    if self.is_empty() { Ok(value) } else { Err(self) }
  }
}

// ─── Field helpers ───────────────────────────────────────────────────────────

/// Trimmed, non-blank text. Records an error and returns `None` otherwise.
pub fn required_text(
  errors: &mut ValidationError,
  field: &str,
  value: Option<&str>,
) -> Option<String> {
  match value.map(str::trim) {
    None => {
      errors.push(field, "is required");
      None
    }
    Some("") => {
      errors.push(field, "must not be empty");
      None
    }
    Some(v) => Some(v.to_owned()),
  }
}

/// Trimmed text, with blank collapsing to `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
  value
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_owned)
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(
  errors: &mut ValidationError,
  field: &str,
  raw: &str,
) -> Option<NaiveDate> {
  match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
    Ok(date) => Some(date),
    Err(_) => {
      errors.push(field, format!("{raw:?} is not a valid YYYY-MM-DD date"));
      None
    }
  }
}

pub fn required_date(
  errors: &mut ValidationError,
  field: &str,
  value: Option<&str>,
) -> Option<NaiveDate> {
  let raw = required_text(errors, field, value)?;
  parse_date(errors, field, &raw)
}

/// Blank input is treated as absent; anything else must parse.
pub fn optional_date(
  errors: &mut ValidationError,
  field: &str,
  value: Option<&str>,
) -> Option<NaiveDate> {
  let raw = optional_text(value)?;
  parse_date(errors, field, &raw)
}

pub fn in_range<T>(
  errors: &mut ValidationError,
  field: &str,
  value: T,
  range: RangeInclusive<T>,
) where
  T: PartialOrd + std::fmt::Display,
{
  if !range.contains(&value) {
    errors.push(
      field,
      format!("must be between {} and {}", range.start(), range.end()),
    );
  }
}
