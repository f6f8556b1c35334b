//! Career history of an alumni record.
//!
//! Positions are kept sorted by start date, most recent first. Positions that
//! share a start date stay in the order they were added. The current position
//! is never stored on its own: it is whatever sits at the head of the list.
//!
//! History is append-only; no operation edits or removes a position.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  validate::{
    ValidationError, optional_date, optional_text, required_date,
    required_text,
  },
};

// ─── Position ────────────────────────────────────────────────────────────────

/// A single employment record. Embedded in an alumni record; has no identity
/// of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerPosition {
  pub company:     String,
  pub position:    String,
  pub start_date:  NaiveDate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// `None` means the position is ongoing.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_date:    Option<NaiveDate>,
}

impl CareerPosition {
  pub fn is_ongoing(&self) -> bool { self.end_date.is_none() }
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// A position as submitted by a client.
///
/// Every field is optional text so that [`CareerPositionInput::validate`] can
/// report all problems at once instead of failing inside the JSON decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CareerPositionInput {
  pub company:     Option<String>,
  pub position:    Option<String>,
  #[serde(alias = "startDate")]
  pub start_date:  Option<String>,
  pub description: Option<String>,
  #[serde(alias = "endDate")]
  pub end_date:    Option<String>,
}

impl CareerPositionInput {
  /// Check the payload and build the position it describes.
  ///
  /// `company`, `position` and `start_date` are required. Dates must be ISO
  /// 8601 calendar dates and an end date may not precede the start date.
  pub fn validate(&self) -> Result<CareerPosition, ValidationError> {
    let mut errors = ValidationError::new();

    let company = required_text(&mut errors, "company", self.company.as_deref());
    let position =
      required_text(&mut errors, "position", self.position.as_deref());
    let start_date =
      required_date(&mut errors, "start_date", self.start_date.as_deref());
    let end_date =
      optional_date(&mut errors, "end_date", self.end_date.as_deref());

    if let (Some(start), Some(end)) = (start_date, end_date)
      && end < start
    {
      errors.push("end_date", "must not be earlier than start_date");
    }

    match (company, position, start_date) {
      (Some(company), Some(position), Some(start_date)) if errors.is_empty() => {
        Ok(CareerPosition {
          company,
          position,
          start_date,
          description: optional_text(self.description.as_deref()),
          end_date,
        })
      }
      _ => Err(errors),
    }
  }
}

// ─── History ─────────────────────────────────────────────────────────────────

/// An ordered, append-only list of career positions.
///
/// Serialises as two sibling fields, `career_history` and `current_position`,
/// so it can be flattened into an owning record. On deserialisation the
/// `current_position` field is ignored and recomputed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "HistoryRepr", from = "HistoryRepr")]
pub struct CareerHistory {
  positions: Vec<CareerPosition>,
}

#[derive(Serialize, Deserialize)]
struct HistoryRepr {
  #[serde(default)]
  career_history:   Vec<CareerPosition>,
  #[serde(default, skip_deserializing)]
  current_position: Option<CareerPosition>,
}

impl From<CareerHistory> for HistoryRepr {
  fn from(history: CareerHistory) -> Self {
    let current_position = history.current().cloned();
    Self { career_history: history.positions, current_position }
  }
}

impl From<HistoryRepr> for CareerHistory {
  fn from(repr: HistoryRepr) -> Self {
    Self::from_positions(repr.career_history)
  }
}

impl CareerHistory {
  pub fn new() -> Self { Self::default() }

  /// Build a history from positions in any order. Equal start dates keep the
  /// relative order they have in `positions`.
  pub fn from_positions(positions: Vec<CareerPosition>) -> Self {
    let mut history = Self { positions };
    history.restore_order();
    history
  }

  /// Append `position` and move it to its chronological slot.
  pub fn add(&mut self, position: CareerPosition) {
    self.positions.push(position);
    self.restore_order();
  }

  /// The position with the most recent start date.
  pub fn current(&self) -> Option<&CareerPosition> { self.positions.first() }

  pub fn positions(&self) -> &[CareerPosition] { &self.positions }

  pub fn iter(&self) -> std::slice::Iter<'_, CareerPosition> {
    self.positions.iter()
  }

  pub fn len(&self) -> usize { self.positions.len() }

  pub fn is_empty(&self) -> bool { self.positions.is_empty() }

  /// Serialise the positions (without the derived current position) for a
  /// storage column.
  pub fn to_json(&self) -> Result<String> {
    Ok(serde_json::to_string(&self.positions)?)
  }

  /// Inverse of [`CareerHistory::to_json`]. Ordering is re-established on
  /// load, so rows written by older code are still read correctly.
  pub fn from_json(s: &str) -> Result<Self> {
    let positions: Vec<CareerPosition> = serde_json::from_str(s)?;
    Ok(Self::from_positions(positions))
  }

  // `slice::sort_by` is stable; equal start dates keep insertion order.
  fn restore_order(&mut self) {
    self
      .positions
      .sort_by(|a, b| b.start_date.cmp(&a.start_date));
  }
}

impl<'a> IntoIterator for &'a CareerHistory {
  type Item = &'a CareerPosition;
  type IntoIter = std::slice::Iter<'a, CareerPosition>;

  fn into_iter(self) -> Self::IntoIter { self.iter() }
}
