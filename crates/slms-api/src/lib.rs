//! JSON REST API for the student lifecycle backend.
//!
//! Exposes an axum [`Router`] backed by any [`slms_core::store::CampusStore`]
//! plus a directory for uploaded documents. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", slms_api::api_router(state))
//! ```

pub mod alumni;
pub mod applications;
pub mod dashboard;
pub mod departments;
pub mod documents;
pub mod error;
pub mod extract;
pub mod files;
pub mod students;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use slms_core::store::CampusStore;

pub use error::ApiError;
pub use files::DocumentFiles;

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub files: Arc<DocumentFiles>,
}

// Manual impl: cloning only bumps the `Arc`s, so `S` itself need not be
// `Clone`.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), files: Arc::clone(&self.files) }
  }
}

impl<S> AppState<S> {
  pub fn new(store: S, files: DocumentFiles) -> Self {
    Self { store: Arc::new(store), files: Arc::new(files) }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: CampusStore + 'static,
{
  Router::new()
    // Departments
    .route(
      "/departments",
      get(departments::list::<S>).post(departments::create::<S>),
    )
    .route(
      "/departments/{id}",
      get(departments::get_one::<S>)
        .put(departments::update::<S>)
        .delete(departments::delete_one::<S>),
    )
    .route("/departments/{id}/students", get(departments::students::<S>))
    // Students
    .route("/students", get(students::list::<S>).post(students::create::<S>))
    .route(
      "/students/{id}",
      get(students::get_one::<S>)
        .put(students::update::<S>)
        .delete(students::delete_one::<S>),
    )
    .route(
      "/students/{id}/transition-to-alumni",
      post(students::transition::<S>),
    )
    .route(
      "/students/{id}/disconnect-studies",
      post(students::disconnect::<S>),
    )
    // Alumni
    .route("/alumni", get(alumni::list::<S>))
    .route("/alumni/stats", get(alumni::stats::<S>))
    .route(
      "/alumni/{id}",
      get(alumni::get_one::<S>).put(alumni::update::<S>),
    )
    .route(
      "/alumni/{id}/career-positions",
      post(alumni::add_career_position::<S>),
    )
    .route(
      "/alumni/{id}/support-category",
      put(alumni::update_support_category::<S>),
    )
    // Applications
    .route("/applications", get(applications::list::<S>))
    .route("/applications/submit", post(applications::submit::<S>))
    .route(
      "/applications/{id}",
      get(applications::get_one::<S>).delete(applications::delete_one::<S>),
    )
    .route("/applications/{id}/review", put(applications::review::<S>))
    // Documents
    .route(
      "/documents",
      get(documents::list::<S>).post(documents::upload::<S>),
    )
    .route(
      "/documents/{id}",
      get(documents::get_one::<S>).delete(documents::delete_one::<S>),
    )
    // Dashboard
    .route("/dashboard/stats", get(dashboard::stats::<S>))
    .route("/health", get(dashboard::health))
    .with_state(state)
}
