//! Alumni records: created when a student graduates.
//!
//! The embedded [`CareerHistory`] owns the ordering of career positions; this
//! module only wires it into the record and tracks support categories.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{
  career::{CareerHistory, CareerPosition, CareerPositionInput},
  validate::{ValidationError, in_range, optional_text},
};

pub const GRADUATION_YEARS: RangeInclusive<i32> = 1900..=2100;

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
pub enum AlumniType {
  #[default]
  Recent,
  Established,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
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
pub enum SupportCategory {
  ReceivingSupport,
  NeedsExtraSupport,
  #[default]
  NoSupportNeeded,
}

/// One entry in the append-only log of support-category changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportChange {
  pub category:   SupportCategory,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes:      Option<String>,
  pub changed_at: DateTime<Utc>,
}

// ─── Record ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlumniRecord {
  pub alumni_id:        Uuid,
  /// The graduated student; exactly one alumni record per student.
  pub student_id:       Uuid,
  pub alumni_type:      AlumniType,
  pub graduation_year:  i32,
  pub support_category: SupportCategory,
  /// Flattened as `career_history` plus the derived `current_position`.
  #[serde(flatten)]
  pub career:           CareerHistory,
  #[serde(default)]
  pub support_history:  Vec<SupportChange>,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

impl AlumniRecord {
  /// A fresh record for a student who has just graduated.
  pub fn new(student_id: Uuid, graduation_year: i32, now: DateTime<Utc>) -> Self {
    Self {
      alumni_id: Uuid::new_v4(),
      student_id,
      alumni_type: AlumniType::Recent,
      graduation_year,
      support_category: SupportCategory::default(),
      career: CareerHistory::new(),
      support_history: Vec::new(),
      created_at: now,
      updated_at: now,
    }
  }

  pub fn current_position(&self) -> Option<&CareerPosition> {
    self.career.current()
  }

  /// Validate `input` and insert it into the career history.
  ///
  /// A rejected payload leaves the record untouched.
  pub fn add_career_position(
    &mut self,
    input: &CareerPositionInput,
  ) -> Result<(), ValidationError> {
    let position = input.validate()?;
    self.career.add(position);
    Ok(())
  }

  /// Switch support category and log the change.
  pub fn change_support_category(
    &mut self,
    category: SupportCategory,
    notes: Option<String>,
    at: DateTime<Utc>,
  ) {
    self.support_category = category;
    self.support_history.push(SupportChange {
      category,
      notes: optional_text(notes.as_deref()),
      changed_at: at,
    });
    self.updated_at = at;
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Body of `POST /students/{id}/transition-to-alumni`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraduationInput {
  #[serde(alias = "graduationYear")]
  pub graduation_year: Option<i32>,
}

impl GraduationInput {
  pub fn validate(&self) -> Result<i32, ValidationError> {
    let mut errors = ValidationError::new();
    match self.graduation_year {
      Some(year) => {
        in_range(&mut errors, "graduation_year", year, GRADUATION_YEARS);
        errors.finish(year)
      }
      None => Err(ValidationError::single("graduation_year", "is required")),
    }
  }
}

/// Body of `PUT /alumni/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlumniUpdate {
  pub alumni_type:     Option<AlumniType>,
  pub graduation_year: Option<i32>,
}

impl AlumniUpdate {
  pub fn validate(self) -> Result<Self, ValidationError> {
    let mut errors = ValidationError::new();
    if let Some(year) = self.graduation_year {
      in_range(&mut errors, "graduation_year", year, GRADUATION_YEARS);
    }
    errors.finish(self)
  }

  pub fn apply(&self, record: &mut AlumniRecord, at: DateTime<Utc>) {
    if let Some(kind) = self.alumni_type {
      record.alumni_type = kind;
    }
    if let Some(year) = self.graduation_year {
      record.graduation_year = year;
    }
    record.updated_at = at;
  }
}

/// Body of `PUT /alumni/{id}/support-category`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportCategoryInput {
  #[serde(alias = "currentSupportCategory", alias = "category")]
  pub support_category: SupportCategory,
  #[serde(default)]
  pub notes:            Option<String>,
}

/// Filters for listing alumni. All set filters must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlumniQuery {
  pub alumni_type:      Option<AlumniType>,
  pub support_category: Option<SupportCategory>,
  pub graduation_year:  Option<i32>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record() -> AlumniRecord { AlumniRecord::new(Uuid::new_v4(), 2024, Utc::now()) }

  fn input(company: &str, start: Option<&str>) -> CareerPositionInput {
    CareerPositionInput {
      company:     Some(company.into()),
      position:    Some("Engineer".into()),
      start_date:  start.map(Into::into),
      description: None,
      end_date:    None,
    }
  }

  #[test]
  fn scenario_newest_first() {
    let mut alumni = record();
    alumni.add_career_position(&input("A", Some("2020-01-01"))).unwrap();
    alumni.add_career_position(&input("B", Some("2024-01-01"))).unwrap();

    let companies: Vec<_> = alumni.career.iter().map(|p| p.company.as_str()).collect();
    assert_eq!(companies, ["B", "A"]);
    assert_eq!(alumni.current_position().unwrap().company, "B");
  }

  #[test]
  fn rejected_payload_leaves_record_untouched() {
    let mut alumni = record();
    alumni.add_career_position(&input("A", Some("2020-01-01"))).unwrap();
    let before = alumni.clone();

    let err = alumni.add_career_position(&input("B", None)).unwrap_err();
    assert!(err.has("start_date"));
    assert_eq!(alumni, before);

    let err = alumni
      .add_career_position(&input("", Some("2024-01-01")))
      .unwrap_err();
    assert!(err.has("company"));
    assert_eq!(alumni, before);
    assert_eq!(alumni.current_position().unwrap().company, "A");
  }

  #[test]
  fn support_change_is_logged() {
    let mut alumni = record();
    let at = Utc::now();
    alumni.change_support_category(
      SupportCategory::NeedsExtraSupport,
      Some("  job search  ".into()),
      at,
    );
    assert_eq!(alumni.support_category, SupportCategory::NeedsExtraSupport);
    assert_eq!(alumni.support_history.len(), 1);
    assert_eq!(alumni.support_history[0].notes.as_deref(), Some("job search"));
    assert_eq!(alumni.updated_at, at);
  }

  #[test]
  fn record_json_exposes_current_position() {
    let mut alumni = record();
    alumni.add_career_position(&input("A", Some("2020-01-01"))).unwrap();
    let value = serde_json::to_value(&alumni).unwrap();
    assert_eq!(value["current_position"]["company"], "A");
    assert_eq!(value["career_history"].as_array().unwrap().len(), 1);
    assert_eq!(value["alumni_type"], "recent");
    assert_eq!(value["support_category"], "no_support_needed");

    let back: AlumniRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back, alumni);
  }

  #[test]
  fn graduation_year_is_range_checked() {
    assert_eq!(
      GraduationInput { graduation_year: Some(2024) }.validate().unwrap(),
      2024
    );
    assert!(
      GraduationInput { graduation_year: Some(24) }
        .validate()
        .unwrap_err()
        .has("graduation_year")
    );
    assert!(GraduationInput::default().validate().is_err());
  }

  #[test]
  fn update_applies_only_present_fields() {
    let mut alumni = record();
    let update = AlumniUpdate {
      alumni_type:     Some(AlumniType::Established),
      graduation_year: None,
    }
    .validate()
    .unwrap();
    update.apply(&mut alumni, Utc::now());
    assert_eq!(alumni.alumni_type, AlumniType::Established);
    assert_eq!(alumni.graduation_year, 2024);
  }
}
