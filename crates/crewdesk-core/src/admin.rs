//! Administrator accounts and their login sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
  pub admin_id:      i64,
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

/// A server-side login session. The cookie carries only `session_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
  pub session_id: String,
  pub admin_id:   i64,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool { now >= self.expires_at }
}

/// Aggregate counts shown on the dashboard landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
  pub total_crew:      u64,
  pub total_staff:     u64,
  pub crew_screening:  u64,
  pub staff_screening: u64,
  pub crew_approved:   u64,
  pub staff_approved:  u64,
}
