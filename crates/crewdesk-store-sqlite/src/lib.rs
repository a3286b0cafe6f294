//! SQLite backend for the Crewdesk recruitment store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. SQLite serialises writers, which is
//! the only cross-request coordination the service relies on.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
