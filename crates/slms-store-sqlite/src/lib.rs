//! SQLite backend for the student lifecycle store.
//!
//! All statements run on the single `tokio_rusqlite` connection thread, which
//! also serialises the read-modify-write updates of alumni records.

mod encode;
mod schema;
mod stats;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
