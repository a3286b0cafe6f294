//! Streaming stored uploads back to authorised readers.

use axum::{
  http::header,
  response::{IntoResponse, Response},
};

use crate::{
  error::Error,
  uploads::{UploadError, UploadPolicy},
};

/// A filename safe to place inside a quoted header parameter.
pub fn header_safe(name: &str) -> String {
  name
    .chars()
    .map(|c| match c {
      ' '..='~' if c != '"' && c != '\\' => c,
      _ => '_',
    })
    .collect()
}

/// Serve the file at `relative` (below the upload root) inline.
pub async fn send_stored(
  policy: &UploadPolicy,
  relative: &str,
  mime_type: &str,
  filename: &str,
) -> Result<Response, Error> {
  let path = policy.resolve(relative).ok_or(Error::NotFound)?;
  let data = match tokio::fs::read(&path).await {
    Ok(data) => data,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      tracing::warn!(path = %path.display(), "stored upload is missing");
      return Err(Error::NotFound);
    }
    Err(e) => return Err(UploadError::Io(e).into()),
  };

  Ok(
    (
      [
        (header::CONTENT_TYPE, mime_type.to_owned()),
        (
          header::CONTENT_DISPOSITION,
          format!("inline; filename=\"{}\"", header_safe(filename)),
        ),
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_owned()),
      ],
      data,
    )
      .into_response(),
  )
}
