//! Dashboard statistics: grouped counts over students, alumni and
//! applications. Within each section every grouping sums to the section total.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
  alumni::SupportCategory,
  application::{ApplicationStatus, ApplicationType},
  student::StudentStatus,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
  pub students:     StudentStats,
  pub alumni:       AlumniStats,
  pub applications: ApplicationStats,
}

// ─── Students ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentStats {
  pub total:         u64,
  pub active:        u64,
  pub graduated:     u64,
  pub discontinued:  u64,
  pub by_status:     Vec<StatusCount>,
  pub by_department: Vec<DepartmentCount>,
  pub by_semester:   Vec<SemesterCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
  pub status: StudentStatus,
  pub count:  u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentCount {
  pub name:  String,
  pub code:  String,
  pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterCount {
  pub semester: u8,
  pub count:    u64,
}

impl StudentStats {
  /// Fill the headline counters from `by_status`.
  pub fn with_status_totals(mut self) -> Self {
    let of = |status| {
      self
        .by_status
        .iter()
        .find(|s| s.status == status)
        .map_or(0, |s| s.count)
    };
    self.active = of(StudentStatus::Active);
    self.graduated = of(StudentStatus::Graduated);
    self.discontinued = of(StudentStatus::Discontinued);
    self
  }
}

// ─── Alumni ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlumniStats {
  pub total:       u64,
  pub recent:      u64,
  pub established: u64,
  pub by_support:  BTreeMap<SupportCategory, u64>,
  /// Newest graduation year first.
  pub by_year:     Vec<YearCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
  pub graduation_year: i32,
  pub count:           u64,
}

// ─── Applications ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStats {
  pub total:     u64,
  pub pending:   u64,
  pub approved:  u64,
  pub rejected:  u64,
  pub by_status: Vec<ApplicationStatusCount>,
  pub by_type:   Vec<ApplicationTypeCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStatusCount {
  pub status: ApplicationStatus,
  pub count:  u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationTypeCount {
  pub application_type: ApplicationType,
  pub count:            u64,
}

impl ApplicationStats {
  /// Fill the headline counters from `by_status`.
  pub fn with_status_totals(mut self) -> Self {
    let of = |status| {
      self
        .by_status
        .iter()
        .find(|s| s.status == status)
        .map_or(0, |s| s.count)
    };
    self.pending = of(ApplicationStatus::Pending);
    self.approved = of(ApplicationStatus::Approved);
    self.rejected = of(ApplicationStatus::Rejected);
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_totals_come_from_grouping() {
    let stats = StudentStats {
      total: 5,
      by_status: vec![
        StatusCount { status: StudentStatus::Active, count: 3 },
        StatusCount { status: StudentStatus::Discontinued, count: 2 },
      ],
      ..Default::default()
    }
    .with_status_totals();
    assert_eq!(stats.active, 3);
    assert_eq!(stats.graduated, 0);
    assert_eq!(stats.discontinued, 2);
  }

  #[test]
  fn support_map_serialises_with_text_keys() {
    let mut stats = AlumniStats::default();
    stats.by_support.insert(SupportCategory::ReceivingSupport, 4);
    let value = serde_json::to_value(&stats).unwrap();
    assert_eq!(value["by_support"]["receiving_support"], 4);
  }
}
