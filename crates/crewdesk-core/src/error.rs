//! Error types for `crewdesk-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown application status code: {0}")]
  UnknownStatusCode(i64),

  #[error("unknown application status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown document kind: {0:?}")]
  UnknownDocumentKind(String),

  #[error("unknown department: {0:?}")]
  UnknownDepartment(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
