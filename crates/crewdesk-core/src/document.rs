//! Crew documents: uploaded files owned by exactly one crew member.
//!
//! No binary data lives in the database; a document row records where the
//! file was stored relative to the upload root.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::{Error, Result};

// ─── Categories ──────────────────────────────────────────────────────────────

/// Grouping used by the document checklist.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
  Identity,
  Medical,
  Professional,
  Other,
}

impl DocumentCategory {
  pub fn title(self) -> &'static str {
    match self {
      Self::Identity => "Identity Documents",
      Self::Medical => "Medical Documents",
      Self::Professional => "Professional Documents",
      Self::Other => "Other Documents",
    }
  }

  pub fn kinds(self) -> impl Iterator<Item = DocumentKind> {
    DocumentKind::iter().filter(move |k| k.category() == self)
  }
}

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// The type of a crew document. The snake_case name doubles as the multipart
/// field name on the private profile upload form.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
  // ── Identity ────────────────────────────────────────────────────────────
  Passport,
  GovernmentId,
  Photo,

  // ── Medical ─────────────────────────────────────────────────────────────
  MedicalCertificate,
  YellowFever,

  // ── Professional ────────────────────────────────────────────────────────
  Cdc,
  CocCop,
  StcwCertificates,
  GmdssDce,

  // ── Other ───────────────────────────────────────────────────────────────
  Resume,
  SeaAgreement,
}

impl DocumentKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Passport => "passport",
      Self::GovernmentId => "government_id",
      Self::Photo => "photo",
      Self::MedicalCertificate => "medical_certificate",
      Self::YellowFever => "yellow_fever",
      Self::Cdc => "cdc",
      Self::CocCop => "coc_cop",
      Self::StcwCertificates => "stcw_certificates",
      Self::GmdssDce => "gmdss_dce",
      Self::Resume => "resume",
      Self::SeaAgreement => "sea_agreement",
    }
  }

  /// Directory under the upload root; each kind gets its own.
  pub fn dir_name(self) -> &'static str { self.as_str() }

  pub fn category(self) -> DocumentCategory {
    match self {
      Self::Passport | Self::GovernmentId | Self::Photo => {
        DocumentCategory::Identity
      }
      Self::MedicalCertificate | Self::YellowFever => DocumentCategory::Medical,
      Self::Cdc | Self::CocCop | Self::StcwCertificates | Self::GmdssDce => {
        DocumentCategory::Professional
      }
      Self::Resume | Self::SeaAgreement => DocumentCategory::Other,
    }
  }

  pub fn display_name(self) -> &'static str {
    match self {
      Self::Passport => "Passport Copy",
      Self::GovernmentId => "Government ID (Aadhaar / PAN / SSN)",
      Self::Photo => "Photo (Passport Size)",
      Self::MedicalCertificate => "Medical Certificate",
      Self::YellowFever => "Yellow Fever Certificate",
      Self::Cdc => "CDC (Seaman Book)",
      Self::CocCop => "COC/COP Certificate",
      Self::StcwCertificates => "STCW Certificates",
      Self::GmdssDce => "GMDSS/DCE Certificate",
      Self::Resume => "Resume/CV",
      Self::SeaAgreement => "SEA Agreement",
    }
  }

  /// Whether the kind counts towards profile completion.
  pub fn required(self) -> bool {
    !matches!(
      self,
      Self::GovernmentId | Self::YellowFever | Self::GmdssDce | Self::SeaAgreement
    )
  }
}

impl fmt::Display for DocumentKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for DocumentKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::iter()
      .find(|k| k.as_str() == s)
      .ok_or_else(|| Error::UnknownDocumentKind(s.to_owned()))
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewDocument {
  pub document_id:       i64,
  pub crew_id:           i64,
  pub kind:              DocumentKind,
  /// Path relative to the configured upload root, e.g. `passport/<id>.pdf`.
  pub stored_path:       String,
  pub original_filename: String,
  pub file_size:         u64,
  pub mime_type:         String,
  pub uploaded_at:       DateTime<Utc>,
}

impl CrewDocument {
  /// Human-readable size, e.g. `2.0 MB`.
  pub fn size_display(&self) -> String { format_file_size(self.file_size) }
}

/// A document whose file has already been written to disk and which is
/// waiting to be recorded. `crew_id` is supplied by the store.
#[derive(Debug, Clone)]
pub struct NewCrewDocument {
  pub kind:              DocumentKind,
  pub stored_path:       String,
  pub original_filename: String,
  pub file_size:         u64,
  pub mime_type:         String,
}

pub fn format_file_size(bytes: u64) -> String {
  let mut size = bytes as f64;
  for unit in ["B", "KB", "MB", "GB"] {
    if size < 1024.0 {
      return format!("{size:.1} {unit}");
    }
    size /= 1024.0;
  }
  format!("{size:.1} TB")
}

// ─── Checklist ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ChecklistEntry<'a> {
  pub kind:  DocumentKind,
  pub files: Vec<&'a CrewDocument>,
}

impl ChecklistEntry<'_> {
  pub fn uploaded(&self) -> bool { !self.files.is_empty() }
}

#[derive(Debug, Clone)]
pub struct ChecklistSection<'a> {
  pub category: DocumentCategory,
  pub entries:  Vec<ChecklistEntry<'a>>,
}

/// Per-category view of which document kinds a crew member has provided.
#[derive(Debug, Clone)]
pub struct DocumentChecklist<'a> {
  pub sections: Vec<ChecklistSection<'a>>,
}

impl<'a> DocumentChecklist<'a> {
  pub fn build(documents: &'a [CrewDocument]) -> Self {
    let sections = DocumentCategory::iter()
      .map(|category| ChecklistSection {
        category,
        entries: category
          .kinds()
          .map(|kind| ChecklistEntry {
            kind,
            files: documents.iter().filter(|d| d.kind == kind).collect(),
          })
          .collect(),
      })
      .collect();
    Self { sections }
  }

  /// Share of required kinds with at least one file, rounded down.
  pub fn completion_percent(&self) -> u8 {
    let required = self
      .sections
      .iter()
      .flat_map(|s| &s.entries)
      .filter(|e| e.kind.required());
    let (total, done) = required.fold((0u32, 0u32), |(t, d), e| {
      (t + 1, d + u32::from(e.uploaded()))
    });
    if total == 0 {
      return 100;
    }
    (done * 100 / total) as u8
  }

  pub fn is_complete(&self) -> bool { self.completion_percent() == 100 }
}
