//! SQLite backend for the Rolodex contact service.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The database, not this crate, owns the
//! generated columns: ids come from `AUTOINCREMENT`, timestamps from column
//! defaults and an update trigger.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::latest_version;
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
