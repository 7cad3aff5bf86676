//! Error type for `rolodex-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The database was written by a newer build than this one.
  #[error("database schema version {found} is newer than supported version {supported}")]
  UnsupportedSchemaVersion { found: u32, supported: u32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
