//! Crew member applications.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::status::ApplicationStatus;

/// A seafarer's application as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
  pub crew_id: i64,

  // ── Personal ────────────────────────────────────────────────────────────
  pub name:          String,
  pub nationality:   String,
  pub date_of_birth: NaiveDate,
  pub mobile_number: String,
  pub email:         String,

  // ── Professional ────────────────────────────────────────────────────────
  pub rank:                String,
  /// Upper-cased; unique across all crew members.
  pub passport:            String,
  pub years_experience:    u32,
  pub last_vessel_type:    Option<String>,
  pub availability_date:   NaiveDate,
  /// Port or city where the seafarer can join a vessel.
  pub available_port_city: Option<String>,

  // ── Emergency contact ───────────────────────────────────────────────────
  pub emergency_contact_name:         Option<String>,
  pub emergency_contact_phone:        Option<String>,
  pub emergency_contact_relationship: Option<String>,

  // ── Review ──────────────────────────────────────────────────────────────
  pub status:        ApplicationStatus,
  pub admin_notes:   Option<String>,
  /// Opaque secret embedded in the private profile link.
  #[serde(skip_serializing)]
  pub profile_token: String,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Input to [`crate::store::RecruitmentStore::register_crew`].
/// Status, token and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewCrewMember {
  pub name:                           String,
  pub nationality:                    String,
  pub date_of_birth:                  NaiveDate,
  pub mobile_number:                  String,
  pub email:                          String,
  pub rank:                           String,
  pub passport:                       String,
  pub years_experience:               u32,
  pub last_vessel_type:               Option<String>,
  pub availability_date:              NaiveDate,
  pub available_port_city:            Option<String>,
  pub emergency_contact_name:         Option<String>,
  pub emergency_contact_phone:        Option<String>,
  pub emergency_contact_relationship: Option<String>,
}

/// Passport numbers are compared and stored upper-cased without surrounding
/// whitespace.
pub fn normalize_passport(raw: &str) -> String { raw.trim().to_uppercase() }

/// Filter for [`crate::store::RecruitmentStore::list_crew`].
#[derive(Debug, Clone, Default)]
pub struct CrewQuery {
  pub status: Option<ApplicationStatus>,
  /// Case-insensitive substring over name, passport and rank.
  pub search: Option<String>,
  pub limit:  Option<usize>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn passport_is_trimmed_and_uppercased() {
    assert_eq!(normalize_passport("  p12345 "), "P12345");
  }
}
