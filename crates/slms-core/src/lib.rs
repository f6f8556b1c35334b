//! Domain model for the student lifecycle backend: departments, students,
//! alumni with their career history, applications, documents and dashboard
//! statistics, plus the [`store::CampusStore`] trait that backends implement.
//!
//! No HTTP or database code lives here.

pub mod alumni;
pub mod application;
pub mod career;
pub mod dashboard;
pub mod department;
pub mod document;
pub mod error;
pub mod store;
pub mod student;
pub mod validate;

pub use error::{Error, Result};
pub use validate::{FieldError, ValidationError};
