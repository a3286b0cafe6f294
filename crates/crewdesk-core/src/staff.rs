//! Shore staff applications.
//!
//! Staff use a separate, simpler form than crew: no passport, no document
//! checklist, and at most one resume and one photo.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::{Error, Result, status::ApplicationStatus};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Department {
  Operations,
  Hr,
  Technical,
  Crewing,
}

impl Department {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Operations => "operations",
      Self::Hr => "hr",
      Self::Technical => "technical",
      Self::Crewing => "crewing",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Operations => "Operations",
      Self::Hr => "HR",
      Self::Technical => "Technical",
      Self::Crewing => "Crewing",
    }
  }
}

impl fmt::Display for Department {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for Department {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::iter()
      .find(|d| d.as_str() == s)
      .ok_or_else(|| Error::UnknownDepartment(s.to_owned()))
  }
}

/// The two files a staff application may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffFile {
  Resume,
  Photo,
}

impl StaffFile {
  /// Path segment used in download links.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Resume => "resume",
      Self::Photo => "photo",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Resume => "Resume/CV",
      Self::Photo => "Photo",
    }
  }
}

impl FromStr for StaffFile {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    [Self::Resume, Self::Photo]
      .into_iter()
      .find(|f| f.as_str() == s)
      .ok_or_else(|| Error::UnknownDocumentKind(s.to_owned()))
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
  pub staff_id:           i64,
  pub full_name:          String,
  pub email_or_whatsapp:  String,
  pub mobile_number:      String,
  pub location:           String,
  pub position_applying:  String,
  pub department:         Department,
  pub years_experience:   u32,
  pub current_employer:   Option<String>,
  pub availability_date:  NaiveDate,
  pub education:          Option<String>,
  pub certifications:     Option<String>,
  pub salary_expectation: Option<String>,
  /// Paths relative to the upload root.
  pub resume_file:        Option<String>,
  pub photo_file:         Option<String>,
  pub status:             ApplicationStatus,
  pub admin_notes:        Option<String>,
  pub created_at:         DateTime<Utc>,
  pub updated_at:         DateTime<Utc>,
}

impl StaffMember {
  pub fn file(&self, which: StaffFile) -> Option<&str> {
    match which {
      StaffFile::Resume => self.resume_file.as_deref(),
      StaffFile::Photo => self.photo_file.as_deref(),
    }
  }
}

/// Input to [`crate::store::RecruitmentStore::register_staff`].
#[derive(Debug, Clone)]
pub struct NewStaffMember {
  pub full_name:          String,
  pub email_or_whatsapp:  String,
  pub mobile_number:      String,
  pub location:           String,
  pub position_applying:  String,
  pub department:         Department,
  pub years_experience:   u32,
  pub current_employer:   Option<String>,
  pub availability_date:  NaiveDate,
  pub education:          Option<String>,
  pub certifications:     Option<String>,
  pub salary_expectation: Option<String>,
  pub resume_file:        Option<String>,
  pub photo_file:         Option<String>,
}

/// Staff applications enter the pipeline at screening.
pub const INITIAL_STAFF_STATUS: ApplicationStatus = ApplicationStatus::Screening;

/// Filter for [`crate::store::RecruitmentStore::list_staff`].
#[derive(Debug, Clone, Default)]
pub struct StaffQuery {
  pub status: Option<ApplicationStatus>,
  /// Case-insensitive substring over name, position and department.
  pub search: Option<String>,
  pub limit:  Option<usize>,
}
