//! Route handlers, grouped by audience.

pub mod admin;
pub mod assets;
pub mod files;
pub mod profile;
pub mod public;

use axum::{
  extract::{FromRequestParts, Path},
  http::request::Parts,
};
use crewdesk_core::document::{DocumentKind, NewCrewDocument};
use serde::de::DeserializeOwned;

use crate::{error::Error, uploads::StagedFile};

/// Fallback for every unmatched route.
pub async fn not_found() -> Error { Error::NotFound }

/// Path parameters naming stored records. A segment that does not parse
/// (e.g. a non-numeric id) cannot name a record, so it is a 404.
pub struct RecordPath<T>(pub T);

impl<S, T> FromRequestParts<S> for RecordPath<T>
where
  S: Send + Sync,
  T: DeserializeOwned + Send,
{
  type Rejection = Error;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Path(value) = Path::<T>::from_request_parts(parts, state)
      .await
      .map_err(|e| {
        tracing::debug!(error = %e, "unparseable record path");
        Error::NotFound
      })?;
    Ok(Self(value))
  }
}

pub(crate) fn new_document(kind: DocumentKind, staged: &StagedFile) -> NewCrewDocument {
  NewCrewDocument {
    kind,
    stored_path:       staged.relative_path.clone(),
    original_filename: staged.original_filename.clone(),
    file_size:         staged.size,
    mime_type:         staged.mime_type.to_owned(),
  }
}
