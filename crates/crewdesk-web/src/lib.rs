//! HTTP layer for Crewdesk.
//!
//! Exposes an axum [`Router`] serving the public registration forms, the
//! crew member's private profile and the admin dashboard, backed by any
//! store implementing [`RecruitmentStore`] and [`SessionStore`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod html;
pub mod multipart;
pub mod uploads;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use crewdesk_core::store::{RecruitmentStore, SessionStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::SessionKeys;
use handlers::{admin, assets, profile, public};
use uploads::{DEFAULT_MAX_UPLOAD_BYTES, UploadPolicy};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `crewdesk.toml` and the
/// environment.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  /// Public origin used when building private profile links.
  #[serde(default = "default_base_url")]
  pub base_url:            String,
  /// A path, `sqlite://path`, or `sqlite::memory:`.
  #[serde(default = "default_database_url")]
  pub database_url:        String,
  #[serde(default = "default_upload_dir")]
  pub upload_dir:          PathBuf,
  #[serde(default)]
  pub session_secret:      String,
  #[serde(default = "default_session_ttl_minutes")]
  pub session_ttl_minutes: i64,
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes:    u64,
  /// Whole-request limit; must leave room for several maximum-size files.
  #[serde(default = "default_max_request_bytes")]
  pub max_request_bytes:   usize,
  #[serde(default)]
  pub cookie_secure:       bool,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_base_url() -> String { "http://localhost:8080".to_owned() }
fn default_database_url() -> String { "crewdesk.db".to_owned() }
fn default_upload_dir() -> PathBuf { PathBuf::from("uploads") }
fn default_session_ttl_minutes() -> i64 { 480 }
fn default_max_upload_bytes() -> u64 { DEFAULT_MAX_UPLOAD_BYTES }
fn default_max_request_bytes() -> usize { 64 * 1024 * 1024 }

impl ServerConfig {
  /// Absolute link to a crew member's private profile.
  pub fn profile_url(&self, crew_id: i64, token: &str) -> String {
    format!(
      "{}/my-profile/{crew_id}/{token}",
      self.base_url.trim_end_matches('/')
    )
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything a handler needs from the storage backend.
pub trait Backend: RecruitmentStore + SessionStore + Clone + 'static {}

impl<T> Backend for T where T: RecruitmentStore + SessionStore + Clone + 'static {}

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: Backend> {
  pub store:   Arc<S>,
  pub config:  Arc<ServerConfig>,
  pub uploads: Arc<UploadPolicy>,
  pub keys:    Arc<SessionKeys>,
}

impl<S: Backend> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    let uploads = UploadPolicy::new(&config.upload_dir, config.max_upload_bytes);
    let keys = SessionKeys::new(
      &config.session_secret,
      config.session_ttl_minutes,
      config.cookie_secure,
    );
    Self {
      store:   Arc::new(store),
      config:  Arc::new(config),
      uploads: Arc::new(uploads),
      keys:    Arc::new(keys),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the whole site.
pub fn router<S: Backend>(state: AppState<S>) -> Router {
  let body_limit = state.config.max_request_bytes;

  Router::new()
    // Public
    .route("/",                    get(public::home))
    .route("/register/crew",       get(public::crew_form::<S>).post(public::register_crew::<S>))
    .route("/register/staff",      get(public::staff_form::<S>).post(public::register_staff::<S>))
    .route("/track",               get(public::track::<S>))
    .route("/static/app.js",       get(assets::app_js))
    // Private profile
    .route("/my-profile/{crew_id}/{token}",
           get(profile::show::<S>).post(profile::upload::<S>))
    .route("/my-profile/{crew_id}/{token}/documents/{document_id}",
           get(profile::document::<S>))
    // Admin
    .route("/admin/login",         get(admin::login_form).post(admin::login::<S>))
    .route("/admin/logout",        get(admin::logout::<S>).post(admin::logout::<S>))
    .route("/admin",               get(admin::dashboard::<S>))
    .route("/admin/crew",          get(admin::crew_list::<S>))
    .route("/admin/crew/{id}",     get(admin::crew_detail::<S>))
    .route("/admin/crew/{id}/status",       post(admin::crew_status::<S>))
    .route("/admin/crew/{id}/profile-link", post(admin::rotate_profile_link::<S>))
    .route("/admin/crew/{id}/export.csv",   get(admin::crew_export::<S>))
    .route("/admin/crew/{id}/documents/{document_id}", get(admin::crew_document::<S>))
    .route("/admin/staff",         get(admin::staff_list::<S>))
    .route("/admin/staff/{id}",    get(admin::staff_detail::<S>))
    .route("/admin/staff/{id}/status",      post(admin::staff_status::<S>))
    .route("/admin/staff/{id}/files/{which}", get(admin::staff_file::<S>))
    .fallback(handlers::not_found)
    .layer(DefaultBodyLimit::max(body_limit))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
