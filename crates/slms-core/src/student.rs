//! Students: enrolment records. Only the fields the rest of the system reads
//! are modeled here.

use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::validate::{
  ValidationError, in_range, optional_text, required_date, required_text,
};

/// Diploma programmes run for eight semesters.
pub const SEMESTERS: RangeInclusive<u8> = 1..=8;

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
pub enum StudentStatus {
  #[default]
  Active,
  Graduated,
  Discontinued,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Shift {
  Morning,
  Day,
  Evening,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub student_id:          Uuid,
  pub full_name:           String,
  pub roll_number:         String,
  pub registration_number: String,
  pub department_id:       Uuid,
  pub semester:            u8,
  /// Academic session, e.g. `2023-24`.
  pub session:             String,
  pub shift:               Shift,
  pub status:              StudentStatus,
  pub enrollment_date:     NaiveDate,
  pub discontinued_reason: Option<String>,
  pub last_semester:       Option<u8>,
  pub created_at:          DateTime<Utc>,
  pub updated_at:          DateTime<Utc>,
}

// ─── Create / update ─────────────────────────────────────────────────────────

/// Body of a student create or full update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentInput {
  pub full_name:           Option<String>,
  pub roll_number:         Option<String>,
  pub registration_number: Option<String>,
  pub department_id:       Option<Uuid>,
  pub semester:            Option<u8>,
  pub session:             Option<String>,
  pub shift:               Option<Shift>,
  pub enrollment_date:     Option<String>,
}

/// A validated [`StudentInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFields {
  pub full_name:           String,
  pub roll_number:         String,
  pub registration_number: String,
  pub department_id:       Uuid,
  pub semester:            u8,
  pub session:             String,
  pub shift:               Shift,
  pub enrollment_date:     NaiveDate,
}

impl StudentInput {
  pub fn validate(&self) -> Result<StudentFields, ValidationError> {
    let mut errors = ValidationError::new();

    let full_name =
      required_text(&mut errors, "full_name", self.full_name.as_deref());
    let roll_number =
      required_text(&mut errors, "roll_number", self.roll_number.as_deref());
    let registration_number = required_text(
      &mut errors,
      "registration_number",
      self.registration_number.as_deref(),
    );
    let session = required_text(&mut errors, "session", self.session.as_deref());
    let enrollment_date = required_date(
      &mut errors,
      "enrollment_date",
      self.enrollment_date.as_deref(),
    );

    if self.department_id.is_none() {
      errors.push("department_id", "is required");
    }
    if self.shift.is_none() {
      errors.push("shift", "is required");
    }
    match self.semester {
      Some(s) => in_range(&mut errors, "semester", s, SEMESTERS),
      None => errors.push("semester", "is required"),
    }

    match (
      full_name,
      roll_number,
      registration_number,
      session,
      enrollment_date,
      self.department_id,
      self.semester,
      self.shift,
    ) {
      (
        Some(full_name),
        Some(roll_number),
        Some(registration_number),
        Some(session),
        Some(enrollment_date),
        Some(department_id),
        Some(semester),
        Some(shift),
      ) if errors.is_empty() => Ok(StudentFields {
        full_name,
        roll_number,
        registration_number,
        department_id,
        semester,
        session,
        shift,
        enrollment_date,
      }),
      _ => Err(errors),
    }
  }
}

// ─── Discontinuation ─────────────────────────────────────────────────────────

/// Body of `POST /students/{id}/disconnect-studies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisconnectInput {
  #[serde(alias = "discontinuedReason")]
  pub reason:        Option<String>,
  #[serde(alias = "lastSemester")]
  pub last_semester: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnection {
  pub reason:        String,
  pub last_semester: u8,
}

impl DisconnectInput {
  pub fn validate(&self) -> Result<Disconnection, ValidationError> {
    let mut errors = ValidationError::new();
    let reason = required_text(&mut errors, "reason", self.reason.as_deref());
    match self.last_semester {
      Some(s) => in_range(&mut errors, "last_semester", s, SEMESTERS),
      None => errors.push("last_semester", "is required"),
    }
    match (reason, self.last_semester) {
      (Some(reason), Some(last_semester)) if errors.is_empty() => {
        Ok(Disconnection { reason, last_semester })
      }
      _ => Err(errors),
    }
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Filters for listing students. All set filters must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentQuery {
  pub department_id: Option<Uuid>,
  pub semester:      Option<u8>,
  pub status:        Option<StudentStatus>,
  /// Case-insensitive substring over name, roll and registration number.
  pub search:        Option<String>,
}

impl StudentQuery {
  /// The search term with surrounding whitespace removed; blank means none.
  pub fn search_term(&self) -> Option<String> {
    optional_text(self.search.as_deref())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid() -> StudentInput {
    StudentInput {
      full_name:           Some("Rahim Uddin".into()),
      roll_number:         Some("CS001".into()),
      registration_number: Some("REG001".into()),
      department_id:       Some(Uuid::new_v4()),
      semester:            Some(3),
      session:             Some("2023-24".into()),
      shift:               Some(Shift::Morning),
      enrollment_date:     Some("2023-01-01".into()),
    }
  }

  #[test]
  fn valid_input_passes() {
    let fields = valid().validate().unwrap();
    assert_eq!(fields.semester, 3);
    assert_eq!(fields.shift, Shift::Morning);
  }

  #[test]
  fn semester_out_of_range_is_rejected() {
    let mut input = valid();
    input.semester = Some(9);
    assert!(input.validate().unwrap_err().has("semester"));
    input.semester = Some(0);
    assert!(input.validate().unwrap_err().has("semester"));
  }

  #[test]
  fn missing_fields_are_all_reported() {
    let err = StudentInput::default().validate().unwrap_err();
    for field in [
      "full_name",
      "roll_number",
      "registration_number",
      "session",
      "enrollment_date",
      "department_id",
      "shift",
      "semester",
    ] {
      assert!(err.has(field), "{field} missing from {err}");
    }
  }

  #[test]
  fn enum_column_text_matches_serde() {
    assert_eq!(StudentStatus::Discontinued.as_ref(), "discontinued");
    assert_eq!("evening".parse::<Shift>().unwrap(), Shift::Evening);
    assert_eq!(
      serde_json::to_value(StudentStatus::Graduated).unwrap(),
      "graduated"
    );
  }

  #[test]
  fn disconnect_requires_reason() {
    let err = DisconnectInput { reason: Some(" ".into()), last_semester: Some(4) }
      .validate()
      .unwrap_err();
    assert!(err.has("reason"));

    let ok = DisconnectInput {
      reason:        Some("financial".into()),
      last_semester: Some(4),
    }
    .validate()
    .unwrap();
    assert_eq!(ok.last_semester, 4);
  }
}
