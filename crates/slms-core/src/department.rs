//! Departments: the academic units students are enrolled in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  student::Student,
  validate::{ValidationError, required_text},
};

/// Department codes are short upper-case mnemonics such as `CST`.
pub const MAX_CODE_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
  pub department_id: Uuid,
  pub name:          String,
  pub code:          String,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// A department together with the number of students enrolled in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentSummary {
  #[serde(flatten)]
  pub department:    Department,
  pub student_count: u64,
}

/// The students of one department, optionally narrowed to a semester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentRoster {
  pub department: Department,
  pub students:   Vec<Student>,
  pub count:      usize,
}

/// Body of a department create or full update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentInput {
  pub name: Option<String>,
  pub code: Option<String>,
}

/// A validated [`DepartmentInput`]: trimmed name, upper-cased code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentFields {
  pub name: String,
  pub code: String,
}

impl DepartmentInput {
  pub fn validate(&self) -> Result<DepartmentFields, ValidationError> {
    let mut errors = ValidationError::new();
    let name = required_text(&mut errors, "name", self.name.as_deref());
    let code = required_text(&mut errors, "code", self.code.as_deref())
      .map(|c| c.to_uppercase());

    if let Some(code) = &code
      && code.chars().count() > MAX_CODE_LEN
    {
      errors.push("code", format!("must be at most {MAX_CODE_LEN} characters"));
    }

    match (name, code) {
      (Some(name), Some(code)) if errors.is_empty() => {
        Ok(DepartmentFields { name, code })
      }
      _ => Err(errors),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn input(name: &str, code: &str) -> DepartmentInput {
    DepartmentInput { name: Some(name.into()), code: Some(code.into()) }
  }

  #[test]
  fn code_is_upper_cased() {
    let fields = input(" Civil Technology ", "ct").validate().unwrap();
    assert_eq!(fields.name, "Civil Technology");
    assert_eq!(fields.code, "CT");
  }

  #[test]
  fn blank_and_long_codes_are_rejected() {
    assert!(input("Civil", "  ").validate().unwrap_err().has("code"));
    assert!(
      input("Civil", "ABCDEFGHIJK")
        .validate()
        .unwrap_err()
        .has("code")
    );
  }

  #[test]
  fn missing_name_is_rejected() {
    let err = DepartmentInput { name: None, code: Some("CT".into()) }
      .validate()
      .unwrap_err();
    assert!(err.has("name"));
    assert!(!err.has("code"));
  }
}
