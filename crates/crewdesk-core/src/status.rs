//! Recruitment pipeline status shared by crew and staff applications.
//!
//! Statuses are persisted as stable integer codes; negative codes are the
//! terminal "off-pipeline" outcomes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::{Error, Result};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
  #[default]
  Registered,
  Screening,
  DocumentsVerified,
  Approved,
  Rejected,
  Flagged,
}

impl ApplicationStatus {
  /// The integer stored in the `status` column.
  pub fn code(self) -> i64 {
    match self {
      Self::Registered => 0,
      Self::Screening => 1,
      Self::DocumentsVerified => 2,
      Self::Approved => 3,
      Self::Rejected => -1,
      Self::Flagged => -2,
    }
  }

  pub fn from_code(code: i64) -> Result<Self> {
    Self::iter()
      .find(|s| s.code() == code)
      .ok_or(Error::UnknownStatusCode(code))
  }

  /// Form/query-string identifier, e.g. `documents_verified`.
  pub fn slug(self) -> &'static str {
    match self {
      Self::Registered => "registered",
      Self::Screening => "screening",
      Self::DocumentsVerified => "documents_verified",
      Self::Approved => "approved",
      Self::Rejected => "rejected",
      Self::Flagged => "flagged",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Registered => "Registered",
      Self::Screening => "Screening",
      Self::DocumentsVerified => "Documents Verified",
      Self::Approved => "Approved",
      Self::Rejected => "Rejected",
      Self::Flagged => "Flagged",
    }
  }

  /// Badge class used by the dashboard markup.
  pub fn badge_class(self) -> &'static str {
    match self {
      Self::Registered => "secondary",
      Self::Screening => "warning",
      Self::DocumentsVerified => "info",
      Self::Approved => "success",
      Self::Rejected => "danger",
      Self::Flagged => "dark",
    }
  }
}

impl fmt::Display for ApplicationStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Accepts the slug, the human label, or the integer code.
impl FromStr for ApplicationStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let s = s.trim();
    if let Ok(code) = s.parse::<i64>() {
      return Self::from_code(code);
    }
    Self::iter()
      .find(|st| st.slug() == s || st.label().eq_ignore_ascii_case(s))
      .ok_or_else(|| Error::UnknownStatus(s.to_owned()))
  }
}
