//! The `RecruitmentStore` and `SessionStore` traits.
//!
//! Both are implemented by storage backends (e.g. `crewdesk-store-sqlite`).
//! The web layer depends on these abstractions, not on a concrete backend.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};

use crate::{
  admin::{Admin, DashboardStats, SessionRecord},
  crew::{CrewMember, CrewQuery, NewCrewMember},
  document::{CrewDocument, NewCrewDocument},
  staff::{NewStaffMember, StaffMember, StaffQuery},
  status::ApplicationStatus,
};

/// Abstraction over the recruitment database.
///
/// Applications are never deleted; the only mutation after creation is a
/// status change (plus token rotation and document additions for crew).
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecruitmentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Crew ──────────────────────────────────────────────────────────────

  /// Insert a crew member with status `Registered`, a fresh profile token,
  /// and one document row per entry in `documents`, atomically.
  ///
  /// Fails without writing anything if the passport number is taken.
  fn register_crew(
    &self,
    crew: NewCrewMember,
    documents: Vec<NewCrewDocument>,
  ) -> impl Future<Output = Result<(CrewMember, Vec<CrewDocument>), Self::Error>>
  + Send
  + '_;

  /// Retrieve a crew member by id. Returns `None` if not found.
  fn get_crew(
    &self,
    crew_id: i64,
  ) -> impl Future<Output = Result<Option<CrewMember>, Self::Error>> + Send + '_;

  /// Look up a crew member by (already normalised) passport number.
  fn find_crew_by_passport(
    &self,
    passport: String,
  ) -> impl Future<Output = Result<Option<CrewMember>, Self::Error>> + Send + '_;

  /// List crew members newest first.
  fn list_crew<'a>(
    &'a self,
    query: &'a CrewQuery,
  ) -> impl Future<Output = Result<Vec<CrewMember>, Self::Error>> + Send + 'a;

  /// Set the status (and replace the admin notes) of a crew member.
  fn update_crew_status(
    &self,
    crew_id: i64,
    status: ApplicationStatus,
    notes: Option<String>,
  ) -> impl Future<Output = Result<CrewMember, Self::Error>> + Send + '_;

  /// Replace the profile token, invalidating any previously shared link.
  fn rotate_profile_token(
    &self,
    crew_id: i64,
  ) -> impl Future<Output = Result<CrewMember, Self::Error>> + Send + '_;

  // ── Crew documents ────────────────────────────────────────────────────

  /// Record additional documents for an existing crew member, atomically.
  fn add_crew_documents(
    &self,
    crew_id: i64,
    documents: Vec<NewCrewDocument>,
  ) -> impl Future<Output = Result<Vec<CrewDocument>, Self::Error>> + Send + '_;

  /// All documents for a crew member, newest first.
  fn list_crew_documents(
    &self,
    crew_id: i64,
  ) -> impl Future<Output = Result<Vec<CrewDocument>, Self::Error>> + Send + '_;

  /// A single document, only if it belongs to `crew_id`.
  fn get_crew_document(
    &self,
    crew_id: i64,
    document_id: i64,
  ) -> impl Future<Output = Result<Option<CrewDocument>, Self::Error>> + Send + '_;

  // ── Staff ─────────────────────────────────────────────────────────────

  fn register_staff(
    &self,
    staff: NewStaffMember,
  ) -> impl Future<Output = Result<StaffMember, Self::Error>> + Send + '_;

  fn get_staff(
    &self,
    staff_id: i64,
  ) -> impl Future<Output = Result<Option<StaffMember>, Self::Error>> + Send + '_;

  fn list_staff<'a>(
    &'a self,
    query: &'a StaffQuery,
  ) -> impl Future<Output = Result<Vec<StaffMember>, Self::Error>> + Send + 'a;

  fn update_staff_status(
    &self,
    staff_id: i64,
    status: ApplicationStatus,
    notes: Option<String>,
  ) -> impl Future<Output = Result<StaffMember, Self::Error>> + Send + '_;

  // ── Admins ────────────────────────────────────────────────────────────

  fn dashboard_stats(
    &self,
  ) -> impl Future<Output = Result<DashboardStats, Self::Error>> + Send + '_;

  /// Create an admin account. Fails if the username is taken.
  fn create_admin(
    &self,
    username: String,
    password_hash: String,
  ) -> impl Future<Output = Result<Admin, Self::Error>> + Send + '_;

  fn find_admin(
    &self,
    username: String,
  ) -> impl Future<Output = Result<Option<Admin>, Self::Error>> + Send + '_;
}

/// Server-side storage for admin login sessions.
pub trait SessionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Start a session for `admin_id` lasting `ttl` from now.
  fn create_session(
    &self,
    admin_id: i64,
    ttl: Duration,
  ) -> impl Future<Output = Result<SessionRecord, Self::Error>> + Send + '_;

  /// The session and its admin, if the session exists. Expiry is the
  /// caller's concern.
  fn get_session(
    &self,
    session_id: String,
  ) -> impl Future<Output = Result<Option<(SessionRecord, Admin)>, Self::Error>>
  + Send
  + '_;

  fn delete_session(
    &self,
    session_id: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove every session that expired at or before `now`; returns the count.
  fn purge_expired_sessions(
    &self,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
