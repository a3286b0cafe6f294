//! Error type for `crewdesk-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] crewdesk_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A crew member with this passport number is already registered.
  #[error("passport {0} is already registered")]
  DuplicatePassport(String),

  #[error("crew member not found: {0}")]
  CrewNotFound(i64),

  #[error("staff member not found: {0}")]
  StaffNotFound(i64),

  #[error("admin {0:?} already exists")]
  AdminExists(String),

  #[error("column {column} holds out-of-range value {value}")]
  OutOfRange { column: &'static str, value: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
