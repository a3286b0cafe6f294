//! Buffered reading of `multipart/form-data` submissions.
//!
//! Text parts become [`FormValues`]; file parts are size- and type-checked
//! while streaming and kept in memory until the text fields have been
//! validated. Nothing is written to disk here.

use axum::extract::Multipart;
use bytes::{Bytes, BytesMut};
use crewdesk_core::form::{FormErrors, FormValues};

use crate::{
  error::Error,
  uploads::{UploadError, UploadPolicy, client_basename},
};

/// An accepted file part.
#[derive(Debug)]
pub struct UploadedFile {
  pub field:     String,
  pub filename:  String,
  /// Lowercased, already checked against the allowed list.
  pub extension: String,
  pub data:      Bytes,
}

/// Everything a form post carried.
#[derive(Debug, Default)]
pub struct Submission {
  pub values:   FormValues,
  pub files:    Vec<UploadedFile>,
  /// Per-field upload rejections (wrong type, too large).
  pub rejected: FormErrors,
}

impl Submission {
  /// Accepted files for one field, in submission order.
  pub fn files_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a UploadedFile> + 'a {
    self.files.iter().filter(move |f| f.field == field)
  }
}

/// Drain `multipart` into a [`Submission`].
///
/// Empty file parts (no filename or no bytes) count as "no file". A part that
/// exceeds the policy limit stops being read as soon as the limit is passed.
pub async fn read_submission(
  mut multipart: Multipart,
  policy: &UploadPolicy,
) -> Result<Submission, Error> {
  let mut submission = Submission::default();

  while let Some(mut field) = multipart.next_field().await? {
    let Some(name) = field.name().map(str::to_owned) else { continue };

    let Some(raw_filename) = field.file_name().map(str::to_owned) else {
      let text = field.text().await?;
      submission.values.insert(name, text);
      continue;
    };

    let filename = client_basename(&raw_filename).to_owned();
    if filename.is_empty() {
      continue;
    }

    let extension = match policy.check_extension(&filename) {
      Ok(ext) => ext,
      Err(e) => {
        reject(&mut submission, &name, &filename, e);
        continue;
      }
    };

    let mut buf = BytesMut::new();
    let mut too_large = None;
    while let Some(chunk) = field.chunk().await? {
      buf.extend_from_slice(&chunk);
      if let Err(e) = policy.check_size(buf.len() as u64) {
        too_large = Some(e);
        break;
      }
    }
    if let Some(e) = too_large {
      reject(&mut submission, &name, &filename, e);
      continue;
    }
    if buf.is_empty() {
      continue;
    }

    submission.files.push(UploadedFile {
      field: name,
      filename,
      extension,
      data: buf.freeze(),
    });
  }

  Ok(submission)
}

fn reject(submission: &mut Submission, field: &str, filename: &str, e: UploadError) {
  tracing::info!(field, filename, reason = %e, "upload rejected");
  submission.rejected.insert(field, e.to_string());
}
