//! Applications: requests for testimonials, certificates and the like,
//! submitted through the public form and reviewed by staff.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{
  student::Shift,
  validate::{ValidationError, optional_text, required_text},
};

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
pub enum ApplicationStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

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
pub enum ApplicationType {
  Testimonial,
  Certificate,
  Transcript,
  Transfer,
  #[default]
  Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
  pub application_id:      Uuid,
  pub applicant_name:      String,
  pub father_name:         Option<String>,
  pub mother_name:         Option<String>,
  /// Department name as typed on the public form.
  pub department:          String,
  pub session:             String,
  pub shift:               Option<Shift>,
  pub roll_number:         String,
  pub registration_number: String,
  pub email:               Option<String>,
  pub application_type:    ApplicationType,
  pub subject:             String,
  pub message:             Option<String>,
  pub selected_documents:  Vec<String>,
  pub status:              ApplicationStatus,
  pub submitted_at:        DateTime<Utc>,
  pub reviewed_at:         Option<DateTime<Utc>>,
  pub reviewed_by:         Option<String>,
  pub review_notes:        Option<String>,
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// Body of `POST /applications/submit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationSubmission {
  pub applicant_name:      Option<String>,
  pub father_name:         Option<String>,
  pub mother_name:         Option<String>,
  pub department:          Option<String>,
  pub session:             Option<String>,
  pub shift:               Option<Shift>,
  pub roll_number:         Option<String>,
  pub registration_number: Option<String>,
  pub email:               Option<String>,
  #[serde(default)]
  pub application_type:    ApplicationType,
  pub subject:             Option<String>,
  pub message:             Option<String>,
  #[serde(default)]
  pub selected_documents:  Vec<String>,
}

/// A validated submission, ready to be stored with status `pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
  pub applicant_name:      String,
  pub father_name:         Option<String>,
  pub mother_name:         Option<String>,
  pub department:          String,
  pub session:             String,
  pub shift:               Option<Shift>,
  pub roll_number:         String,
  pub registration_number: String,
  pub email:               Option<String>,
  pub application_type:    ApplicationType,
  pub subject:             String,
  pub message:             Option<String>,
  pub selected_documents:  Vec<String>,
}

impl ApplicationSubmission {
  pub fn validate(&self) -> Result<NewApplication, ValidationError> {
    let mut errors = ValidationError::new();

    let applicant_name = required_text(
      &mut errors,
      "applicant_name",
      self.applicant_name.as_deref(),
    );
    let department =
      required_text(&mut errors, "department", self.department.as_deref());
    let session = required_text(&mut errors, "session", self.session.as_deref());
    let roll_number =
      required_text(&mut errors, "roll_number", self.roll_number.as_deref());
    let registration_number = required_text(
      &mut errors,
      "registration_number",
      self.registration_number.as_deref(),
    );
    let subject = required_text(&mut errors, "subject", self.subject.as_deref());

    let email = optional_text(self.email.as_deref());
    if let Some(email) = &email
      && !email.contains('@')
    {
      errors.push("email", "is not an email address");
    }

    let selected_documents: Vec<String> = self
      .selected_documents
      .iter()
      .filter_map(|d| optional_text(Some(d)))
      .collect();
    if selected_documents.is_empty() {
      errors.push("selected_documents", "select at least one document");
    }

    match (
      applicant_name,
      department,
      session,
      roll_number,
      registration_number,
      subject,
    ) {
      (
        Some(applicant_name),
        Some(department),
        Some(session),
        Some(roll_number),
        Some(registration_number),
        Some(subject),
      ) if errors.is_empty() => Ok(NewApplication {
        applicant_name,
        father_name: optional_text(self.father_name.as_deref()),
        mother_name: optional_text(self.mother_name.as_deref()),
        department,
        session,
        shift: self.shift,
        roll_number,
        registration_number,
        email,
        application_type: self.application_type,
        subject,
        message: optional_text(self.message.as_deref()),
        selected_documents,
      }),
      _ => Err(errors),
    }
  }
}

// ─── Review ──────────────────────────────────────────────────────────────────

/// Body of `PUT /applications/{id}/review`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewInput {
  pub status:       Option<ApplicationStatus>,
  pub reviewed_by:  Option<String>,
  pub review_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
  pub status:       ApplicationStatus,
  pub reviewed_by:  String,
  pub review_notes: Option<String>,
}

impl ReviewInput {
  /// A review must settle the application: `pending` is not a verdict.
  pub fn validate(&self) -> Result<Review, ValidationError> {
    let mut errors = ValidationError::new();
    let reviewed_by =
      required_text(&mut errors, "reviewed_by", self.reviewed_by.as_deref());
    match self.status {
      None => errors.push("status", "is required"),
      Some(ApplicationStatus::Pending) => {
        errors.push("status", "must be approved or rejected")
      }
      Some(_) => {}
    }
    match (self.status, reviewed_by) {
      (Some(status), Some(reviewed_by)) if errors.is_empty() => Ok(Review {
        status,
        reviewed_by,
        review_notes: optional_text(self.review_notes.as_deref()),
      }),
      _ => Err(errors),
    }
  }
}

/// Filters for listing applications. All set filters must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationQuery {
  pub status:           Option<ApplicationStatus>,
  pub application_type: Option<ApplicationType>,
  pub department:       Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn submission() -> ApplicationSubmission {
    ApplicationSubmission {
      applicant_name: Some("Karim Ahmed".into()),
      department: Some("Computer Technology".into()),
      session: Some("2020-21".into()),
      shift: Some(Shift::Day),
      roll_number: Some("R-77".into()),
      registration_number: Some("REG-77".into()),
      subject: Some("Testimonial request".into()),
      selected_documents: vec!["Testimonial".into()],
      ..Default::default()
    }
  }

  #[test]
  fn valid_submission_defaults_to_other_type() {
    let app = submission().validate().unwrap();
    assert_eq!(app.application_type, ApplicationType::Other);
    assert_eq!(app.email, None);
  }

  #[test]
  fn submission_needs_a_document() {
    let mut raw = submission();
    raw.selected_documents = vec!["  ".into()];
    assert!(raw.validate().unwrap_err().has("selected_documents"));
  }

  #[test]
  fn bad_email_is_rejected() {
    let mut raw = submission();
    raw.email = Some("not-an-address".into());
    assert!(raw.validate().unwrap_err().has("email"));
  }

  #[test]
  fn review_must_settle() {
    let pending = ReviewInput {
      status:       Some(ApplicationStatus::Pending),
      reviewed_by:  Some("registrar".into()),
      review_notes: None,
    };
    assert!(pending.validate().unwrap_err().has("status"));

    let approved = ReviewInput {
      status: Some(ApplicationStatus::Approved),
      ..pending
    };
    assert_eq!(approved.validate().unwrap().status, ApplicationStatus::Approved);
  }
}
