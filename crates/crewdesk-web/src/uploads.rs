//! Upload policy and on-disk staging of accepted files.
//!
//! Files are written under `<root>/<dir>/<uuid>.<ext>`; the client filename
//! never reaches the filesystem. A [`Staging`] removes everything it wrote
//! unless [`Staging::commit`] is called, so a failed database write leaves
//! no orphaned files behind.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Default per-file limit: 16 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Accepted extensions, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

#[derive(Debug, Error)]
pub enum UploadError {
  #[error("File type not allowed. Please upload PDF, JPG, JPEG, or PNG files.")]
  DisallowedType,

  #[error("File is too large. Maximum size is {} MB.", .limit / (1024 * 1024))]
  TooLarge { limit: u64 },

  #[error("could not store upload: {0}")]
  Io(#[from] std::io::Error),
}

/// Where uploads go and what they may look like.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
  pub root:      PathBuf,
  pub max_bytes: u64,
}

impl UploadPolicy {
  pub fn new(root: impl Into<PathBuf>, max_bytes: u64) -> Self {
    Self { root: root.into(), max_bytes }
  }

  /// The lowercased extension of `filename` if it is an allowed type.
  pub fn check_extension(&self, filename: &str) -> Result<String, UploadError> {
    let (stem, ext) = filename.rsplit_once('.').ok_or(UploadError::DisallowedType)?;
    let ext = ext.to_ascii_lowercase();
    if stem.is_empty() || !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
      return Err(UploadError::DisallowedType);
    }
    Ok(ext)
  }

  pub fn check_size(&self, size: u64) -> Result<(), UploadError> {
    if size > self.max_bytes {
      return Err(UploadError::TooLarge { limit: self.max_bytes });
    }
    Ok(())
  }

  /// Absolute location of a stored relative path, refusing anything that
  /// could step outside the upload root.
  pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
    let rel = Path::new(relative);
    rel
      .components()
      .all(|c| matches!(c, Component::Normal(_)))
      .then(|| self.root.join(rel))
  }
}

/// MIME type for an allowed extension.
pub fn mime_for(ext: &str) -> &'static str {
  match ext {
    "pdf" => "application/pdf",
    "png" => "image/png",
    "jpg" | "jpeg" => "image/jpeg",
    _ => "application/octet-stream",
  }
}

/// The final path component of a client-supplied filename.
pub fn client_basename(filename: &str) -> &str {
  filename
    .rsplit(['/', '\\'])
    .next()
    .unwrap_or(filename)
    .trim()
}

// ─── Staging ─────────────────────────────────────────────────────────────────

/// A file written to disk but not yet referenced by the database.
#[derive(Debug, Clone)]
pub struct StagedFile {
  pub field:             String,
  /// Path relative to the upload root, e.g. `passport/3f2a….pdf`.
  pub relative_path:     String,
  pub original_filename: String,
  pub size:              u64,
  pub mime_type:         &'static str,
}

/// Files written during one request. Dropping an uncommitted staging area
/// deletes its files.
pub struct Staging<'a> {
  policy:    &'a UploadPolicy,
  files:     Vec<StagedFile>,
  committed: bool,
}

impl<'a> Staging<'a> {
  pub fn new(policy: &'a UploadPolicy) -> Self {
    Self { policy, files: Vec::new(), committed: false }
  }

  /// Write `data` under `<root>/<dir>/` with a fresh random name.
  pub async fn write(
    &mut self,
    field: &str,
    dir: &str,
    original_filename: &str,
    extension: &str,
    data: &[u8],
  ) -> Result<&StagedFile, UploadError> {
    let dir_path = self.policy.root.join(dir);
    tokio::fs::create_dir_all(&dir_path).await?;

    let name = format!("{}.{extension}", Uuid::new_v4().simple());
    // Tracked before writing so a partial file is cleaned up as well.
    self.files.push(StagedFile {
      field:             field.to_owned(),
      relative_path:     format!("{dir}/{name}"),
      original_filename: original_filename.to_owned(),
      size:              data.len() as u64,
      mime_type:         mime_for(extension),
    });
    tokio::fs::write(dir_path.join(&name), data).await?;
    Ok(&self.files[self.files.len() - 1])
  }

  /// Keep the files: the database now references them.
  pub fn commit(mut self) -> Vec<StagedFile> {
    self.committed = true;
    std::mem::take(&mut self.files)
  }
}

impl Drop for Staging<'_> {
  fn drop(&mut self) {
    if self.committed {
      return;
    }
    for file in &self.files {
      let path = self.policy.root.join(&file.relative_path);
      match std::fs::remove_file(&path) {
        Ok(()) => tracing::debug!(field = %file.field, path = %path.display(), "removed staged upload"),
        Err(e) => tracing::warn!(field = %file.field, path = %path.display(), error = %e, "failed to remove staged upload"),
      }
    }
  }
}
