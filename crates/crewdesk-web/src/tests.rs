use std::path::Path;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use chrono::{DateTime, Duration, Utc};
use crewdesk_core::{
  admin::{Admin, DashboardStats, SessionRecord},
  crew::{CrewMember, CrewQuery, NewCrewMember},
  document::{CrewDocument, NewCrewDocument},
  staff::{NewStaffMember, StaffMember, StaffQuery},
  status::ApplicationStatus,
  store::{RecruitmentStore, SessionStore},
};
use crewdesk_store_sqlite::{Error as StoreError, SqliteStore};
use tempfile::TempDir;
use tower::ServiceExt as _;

use super::*;
use crate::{auth::hash_password, html};

const BOUNDARY: &str = "crewdesk-test-boundary";
const MB: usize = 1024 * 1024;

fn test_config(dir: &TempDir) -> ServerConfig {
  ServerConfig {
    host:                "127.0.0.1".to_owned(),
    port:                8080,
    base_url:            "http://crew.test".to_owned(),
    database_url:        "sqlite::memory:".to_owned(),
    upload_dir:          dir.path().to_path_buf(),
    session_secret:      "test-secret".to_owned(),
    session_ttl_minutes: 480,
    max_upload_bytes:    DEFAULT_MAX_UPLOAD_BYTES,
    max_request_bytes:   64 * MB,
    cookie_secure:       false,
  }
}

pub(crate) async fn make_state() -> (AppState<SqliteStore>, TempDir) {
  let dir = tempfile::tempdir().unwrap();
  let store = SqliteStore::open_in_memory().await.unwrap();
  (AppState::new(store, test_config(&dir)), dir)
}

// ── Interfering store ────────────────────────────────────────────────────────

/// What goes wrong when [`Interfering`] is asked to register a crew member.
#[derive(Clone, Copy)]
enum Interference {
  /// The write fails outright.
  FailWrite,
  /// Another registration with the same passport lands first.
  SamePassportFirst,
}

/// Wraps [`SqliteStore`] and interferes with `register_crew` only.
#[derive(Clone)]
struct Interfering {
  inner: SqliteStore,
  mode:  Interference,
}

impl RecruitmentStore for Interfering {
  type Error = StoreError;

  async fn register_crew(
    &self,
    crew: NewCrewMember,
    documents: Vec<NewCrewDocument>,
  ) -> Result<(CrewMember, Vec<CrewDocument>), StoreError> {
    match self.mode {
      Interference::FailWrite => {
        Err(StoreError::DateParse("write failed".to_owned()))
      }
      Interference::SamePassportFirst => {
        self.inner.register_crew(crew.clone(), Vec::new()).await?;
        self.inner.register_crew(crew, documents).await
      }
    }
  }

  async fn get_crew(&self, crew_id: i64) -> Result<Option<CrewMember>, StoreError> {
    self.inner.get_crew(crew_id).await
  }

  async fn find_crew_by_passport(
    &self,
    passport: String,
  ) -> Result<Option<CrewMember>, StoreError> {
    self.inner.find_crew_by_passport(passport).await
  }

  async fn list_crew(&self, query: &CrewQuery) -> Result<Vec<CrewMember>, StoreError> {
    self.inner.list_crew(query).await
  }

  async fn update_crew_status(
    &self,
    crew_id: i64,
    status: ApplicationStatus,
    notes: Option<String>,
  ) -> Result<CrewMember, StoreError> {
    self.inner.update_crew_status(crew_id, status, notes).await
  }

  async fn rotate_profile_token(&self, crew_id: i64) -> Result<CrewMember, StoreError> {
    self.inner.rotate_profile_token(crew_id).await
  }

  async fn add_crew_documents(
    &self,
    crew_id: i64,
    documents: Vec<NewCrewDocument>,
  ) -> Result<Vec<CrewDocument>, StoreError> {
    self.inner.add_crew_documents(crew_id, documents).await
  }

  async fn list_crew_documents(&self, crew_id: i64) -> Result<Vec<CrewDocument>, StoreError> {
    self.inner.list_crew_documents(crew_id).await
  }

  async fn get_crew_document(
    &self,
    crew_id: i64,
    document_id: i64,
  ) -> Result<Option<CrewDocument>, StoreError> {
    self.inner.get_crew_document(crew_id, document_id).await
  }

  async fn register_staff(&self, staff: NewStaffMember) -> Result<StaffMember, StoreError> {
    self.inner.register_staff(staff).await
  }

  async fn get_staff(&self, staff_id: i64) -> Result<Option<StaffMember>, StoreError> {
    self.inner.get_staff(staff_id).await
  }

  async fn list_staff(&self, query: &StaffQuery) -> Result<Vec<StaffMember>, StoreError> {
    self.inner.list_staff(query).await
  }

  async fn update_staff_status(
    &self,
    staff_id: i64,
    status: ApplicationStatus,
    notes: Option<String>,
  ) -> Result<StaffMember, StoreError> {
    self.inner.update_staff_status(staff_id, status, notes).await
  }

  async fn dashboard_stats(&self) -> Result<DashboardStats, StoreError> {
    self.inner.dashboard_stats().await
  }

  async fn create_admin(
    &self,
    username: String,
    password_hash: String,
  ) -> Result<Admin, StoreError> {
    self.inner.create_admin(username, password_hash).await
  }

  async fn find_admin(&self, username: String) -> Result<Option<Admin>, StoreError> {
    self.inner.find_admin(username).await
  }
}

impl SessionStore for Interfering {
  type Error = StoreError;

  async fn create_session(
    &self,
    admin_id: i64,
    ttl: Duration,
  ) -> Result<SessionRecord, StoreError> {
    self.inner.create_session(admin_id, ttl).await
  }

  async fn get_session(
    &self,
    session_id: String,
  ) -> Result<Option<(SessionRecord, Admin)>, StoreError> {
    self.inner.get_session(session_id).await
  }

  async fn delete_session(&self, session_id: String) -> Result<(), StoreError> {
    self.inner.delete_session(session_id).await
  }

  async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
    self.inner.purge_expired_sessions(now).await
  }
}

async fn interfering_state(mode: Interference) -> (AppState<Interfering>, TempDir) {
  let dir = tempfile::tempdir().unwrap();
  let inner = SqliteStore::open_in_memory().await.unwrap();
  (AppState::new(Interfering { inner, mode }, test_config(&dir)), dir)
}

// ── Request helpers ──────────────────────────────────────────────────────────

enum Part<'a> {
  Text(&'a str, &'a str),
  File { name: &'a str, filename: &'a str, data: Vec<u8> },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
  let mut body = Vec::new();
  for part in parts {
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    match part {
      Part::Text(name, value) => {
        body.extend_from_slice(
          format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
      }
      Part::File { name, filename, data } => {
        body.extend_from_slice(
          format!(
            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
          )
          .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
      }
    }
  }
  body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
  body
}

async fn post_multipart<S: Backend>(
  state: &AppState<S>,
  uri: &str,
  parts: &[Part<'_>],
) -> Response {
  let req = Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
    .body(Body::from(multipart_body(parts)))
    .unwrap();
  router(state.clone()).oneshot(req).await.unwrap()
}

async fn get(state: &AppState<SqliteStore>, uri: &str, cookie: Option<&str>) -> Response {
  let mut builder = Request::builder().uri(uri);
  if let Some(cookie) = cookie {
    builder = builder.header(header::COOKIE, cookie);
  }
  router(state.clone())
    .oneshot(builder.body(Body::empty()).unwrap())
    .await
    .unwrap()
}

async fn post_form(
  state: &AppState<SqliteStore>,
  uri: &str,
  body: &str,
  cookie: Option<&str>,
) -> Response {
  let mut builder = Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
  if let Some(cookie) = cookie {
    builder = builder.header(header::COOKIE, cookie);
  }
  router(state.clone())
    .oneshot(builder.body(Body::from(body.to_owned())).unwrap())
    .await
    .unwrap()
}

async fn body_text(resp: Response) -> String {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(resp: &Response) -> &str {
  resp.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

fn files_on_disk(root: &Path) -> usize {
  let Ok(entries) = std::fs::read_dir(root) else { return 0 };
  entries
    .map(|e| e.unwrap().path())
    .map(|p| if p.is_dir() { files_on_disk(&p) } else { 1 })
    .sum()
}

fn crew_fields<'a>(passport: &'a str) -> Vec<Part<'a>> {
  vec![
    Part::Text("name", "Ana Reyes"),
    Part::Text("nationality", "Filipino"),
    Part::Text("date_of_birth", "1990-04-12"),
    Part::Text("mobile_number", "+63 917 555 0101"),
    Part::Text("email", "ana@example.com"),
    Part::Text("rank", "Second Officer"),
    Part::Text("passport", passport),
    Part::Text("years_experience", "7"),
    Part::Text("availability_date", "2026-12-01"),
  ]
}

fn staff_fields() -> Vec<Part<'static>> {
  vec![
    Part::Text("full_name", "Ben Ortiz"),
    Part::Text("email_or_whatsapp", "ben@example.com"),
    Part::Text("mobile_number", "+63 917 555 0199"),
    Part::Text("location", "Manila"),
    Part::Text("position_applying", "Crewing Officer"),
    Part::Text("department", "crewing"),
    Part::Text("years_experience", "4"),
    Part::Text("availability_date", "2026-11-15"),
  ]
}

fn pdf(size: usize) -> Vec<u8> {
  let mut data = b"%PDF-1.4\n".to_vec();
  data.resize(size, b'x');
  data
}

async fn register_p12345(state: &AppState<SqliteStore>) -> Response {
  let mut parts = crew_fields("P12345");
  parts.push(Part::File { name: "passport_file", filename: "passport.pdf", data: pdf(2 * MB) });
  parts.push(Part::File { name: "photo_file", filename: "photo.png", data: vec![0x89; MB / 2] });
  post_multipart(state, "/register/crew", &parts).await
}

async fn login_cookie(state: &AppState<SqliteStore>) -> String {
  state
    .store
    .create_admin("admin".into(), hash_password("correct horse").unwrap())
    .await
    .unwrap();
  let resp = post_form(state, "/admin/login", "username=admin&password=correct+horse", None).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  let set_cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
  set_cookie.split(';').next().unwrap().to_owned()
}

// ── Crew registration ────────────────────────────────────────────────────────

#[tokio::test]
async fn crew_registration_stores_member_and_documents() {
  let (state, dir) = make_state().await;

  let resp = register_p12345(&state).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/track?passport=P12345&notice=registered");

  let crew = state.store.find_crew_by_passport("P12345".into()).await.unwrap().unwrap();
  assert_eq!(crew.status, ApplicationStatus::Registered);
  let docs = state.store.list_crew_documents(crew.crew_id).await.unwrap();
  assert_eq!(docs.len(), 2);
  assert!(docs.iter().any(|d| d.file_size == (2 * MB) as u64 && d.mime_type == "application/pdf"));
  assert_eq!(files_on_disk(dir.path()), 2);
}

#[tokio::test]
async fn uploads_are_filed_by_document_kind() {
  let (state, dir) = make_state().await;

  let mut parts = crew_fields("P77777");
  for (name, filename) in [
    ("passport_file", "passport.pdf"),
    ("cdc_file", "cdc.pdf"),
    ("resume_file", "cv.pdf"),
    ("photo_file", "photo.png"),
    ("medical_certificate_file", "medical.pdf"),
  ] {
    parts.push(Part::File { name, filename, data: pdf(1024) });
  }
  let resp = post_multipart(&state, "/register/crew", &parts).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let crew = state.store.find_crew_by_passport("P77777".into()).await.unwrap().unwrap();
  for doc in state.store.list_crew_documents(crew.crew_id).await.unwrap() {
    let dir_name = doc.stored_path.split('/').next().unwrap();
    assert_eq!(dir_name, doc.kind.as_str(), "{}", doc.original_filename);
  }

  let mut dirs: Vec<_> = std::fs::read_dir(dir.path())
    .unwrap()
    .map(|e| e.unwrap().file_name().into_string().unwrap())
    .collect();
  dirs.sort();
  assert_eq!(dirs, ["cdc", "medical_certificate", "passport", "photo", "resume"]);
}

#[tokio::test]
async fn duplicate_passport_is_rejected_without_side_effects() {
  let (state, dir) = make_state().await;
  register_p12345(&state).await;

  let mut parts = crew_fields(" p12345 ");
  parts.push(Part::File { name: "resume_file", filename: "cv.pdf", data: pdf(1024) });
  let resp = post_multipart(&state, "/register/crew", &parts).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  assert!(body_text(resp).await.contains(html::DUPLICATE_PASSPORT));

  let stats = state.store.dashboard_stats().await.unwrap();
  assert_eq!(stats.total_crew, 1);
  assert_eq!(files_on_disk(dir.path()), 2);
}

#[tokio::test]
async fn oversized_file_rejects_the_whole_registration() {
  let (state, dir) = make_state().await;

  let mut parts = crew_fields("P20000");
  parts.push(Part::File { name: "passport_file", filename: "passport.pdf", data: pdf(1024) });
  parts.push(Part::File {
    name:     "medical_certificate_file",
    filename: "medical.pdf",
    data:     pdf(20 * MB),
  });
  let resp = post_multipart(&state, "/register/crew", &parts).await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  assert!(body_text(resp).await.contains("File is too large"));

  assert!(state.store.find_crew_by_passport("P20000".into()).await.unwrap().is_none());
  assert_eq!(files_on_disk(dir.path()), 0);
}

#[tokio::test]
async fn disallowed_file_type_is_rejected() {
  let (state, dir) = make_state().await;

  let mut parts = crew_fields("P30000");
  parts.push(Part::File { name: "resume_file", filename: "cv.docx", data: vec![1; 128] });
  let resp = post_multipart(&state, "/register/crew", &parts).await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  assert!(body_text(resp).await.contains("File type not allowed"));
  assert!(state.store.find_crew_by_passport("P30000".into()).await.unwrap().is_none());
  assert_eq!(files_on_disk(dir.path()), 0);
}

#[tokio::test]
async fn invalid_fields_keep_values_and_write_nothing() {
  let (state, dir) = make_state().await;

  let mut parts = crew_fields("P40000");
  parts.retain(|p| !matches!(p, Part::Text("email", _)));
  parts.push(Part::Text("email", "not-an-email"));
  parts.push(Part::File { name: "passport_file", filename: "passport.pdf", data: pdf(1024) });
  let resp = post_multipart(&state, "/register/crew", &parts).await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let page = body_text(resp).await;
  assert!(page.contains("Please enter a valid email address."));
  assert!(page.contains("value=\"Ana Reyes\""));
  assert_eq!(files_on_disk(dir.path()), 0);
}

#[tokio::test]
async fn failed_write_removes_staged_files() {
  let (state, dir) = interfering_state(Interference::FailWrite).await;

  let mut parts = crew_fields("P88888");
  parts.push(Part::File { name: "passport_file", filename: "passport.pdf", data: pdf(4096) });
  parts.push(Part::File { name: "photo_file", filename: "photo.png", data: vec![0x89; 1024] });
  let resp = post_multipart(&state, "/register/crew", &parts).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

  assert_eq!(files_on_disk(dir.path()), 0);
  assert!(state.store.find_crew_by_passport("P88888".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn losing_a_passport_race_is_a_conflict() {
  let (state, dir) = interfering_state(Interference::SamePassportFirst).await;

  let mut parts = crew_fields("P99999");
  parts.push(Part::File { name: "passport_file", filename: "passport.pdf", data: pdf(4096) });
  let resp = post_multipart(&state, "/register/crew", &parts).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  assert!(body_text(resp).await.contains(html::DUPLICATE_PASSPORT));

  assert_eq!(files_on_disk(dir.path()), 0);
  let winner = state.store.find_crew_by_passport("P99999".into()).await.unwrap().unwrap();
  assert!(state.store.list_crew_documents(winner.crew_id).await.unwrap().is_empty());
}

// ── Tracking ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn track_reports_status_or_not_found() {
  let (state, _dir) = make_state().await;
  register_p12345(&state).await;

  let found = body_text(get(&state, "/track?passport=p12345", None).await).await;
  assert!(found.contains("Ana Reyes"));
  assert!(found.contains("Registered"));

  let resp = get(&state, "/track?passport=ZZ999", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(body_text(resp).await.contains("No crew member found with this passport number."));
}

// ── Staff ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn staff_application_enters_screening() {
  let (state, dir) = make_state().await;

  let mut parts = staff_fields();
  parts.push(Part::File { name: "resume_file", filename: "cv.pdf", data: pdf(4096) });
  let resp = post_multipart(&state, "/register/staff", &parts).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/register/staff?notice=staff-registered");
  assert_eq!(files_on_disk(&dir.path().join("staff")), 1);

  let cookie = login_cookie(&state).await;
  let page = body_text(get(&state, "/admin/staff?status=screening", Some(&cookie)).await).await;
  assert!(page.contains("Ben Ortiz"));
  assert!(page.contains("<span class=\"badge bg-warning\">Screening</span>"));
}

// ── Admin ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn anonymous_admin_request_redirects_to_login() {
  let (state, _dir) = make_state().await;
  let resp = get(&state, "/admin/crew", None).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/admin/login?next=%2Fadmin%2Fcrew");
}

#[tokio::test]
async fn bad_password_and_unknown_user_get_the_same_answer() {
  let (state, _dir) = make_state().await;
  state
    .store
    .create_admin("admin".into(), hash_password("correct horse").unwrap())
    .await
    .unwrap();

  let wrong = post_form(&state, "/admin/login", "username=admin&password=nope", None).await;
  let unknown = post_form(&state, "/admin/login", "username=ghost&password=nope", None).await;
  assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
  assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
  assert!(wrong.headers().get(header::SET_COOKIE).is_none());
  assert!(body_text(wrong).await.contains(html::INVALID_CREDENTIALS));
  assert!(body_text(unknown).await.contains(html::INVALID_CREDENTIALS));
}

#[tokio::test]
async fn admin_updates_crew_status() {
  let (state, _dir) = make_state().await;
  register_p12345(&state).await;
  let crew = state.store.find_crew_by_passport("P12345".into()).await.unwrap().unwrap();
  let cookie = login_cookie(&state).await;

  let page = body_text(get(&state, "/admin/crew", Some(&cookie)).await).await;
  assert!(page.contains("<span class=\"badge bg-secondary\">Registered</span>"));

  let uri = format!("/admin/crew/{}/status", crew.crew_id);
  let resp = post_form(&state, &uri, "status=approved&notes=Good+references", Some(&cookie)).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), format!("/admin/crew/{}?notice=status-updated", crew.crew_id));

  let page = body_text(get(&state, "/admin/crew?status=approved", Some(&cookie)).await).await;
  assert!(page.contains("P12345"));
  assert!(page.contains("<span class=\"badge bg-success\">Approved</span>"));

  let updated = state.store.get_crew(crew.crew_id).await.unwrap().unwrap();
  assert_eq!(updated.admin_notes.as_deref(), Some("Good references"));
}

#[tokio::test]
async fn unknown_status_filter_is_a_bad_request() {
  let (state, _dir) = make_state().await;
  let cookie = login_cookie(&state).await;
  let resp = get(&state, "/admin/crew?status=hired", Some(&cookie)).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_ends_the_session() {
  let (state, _dir) = make_state().await;
  let cookie = login_cookie(&state).await;
  assert_eq!(get(&state, "/admin", Some(&cookie)).await.status(), StatusCode::OK);

  let resp = post_form(&state, "/admin/logout", "", Some(&cookie)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(get(&state, "/admin", Some(&cookie)).await.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn csv_export_is_an_attachment() {
  let (state, _dir) = make_state().await;
  register_p12345(&state).await;
  let crew = state.store.find_crew_by_passport("P12345".into()).await.unwrap().unwrap();
  let cookie = login_cookie(&state).await;

  let resp = get(&state, &format!("/admin/crew/{}/export.csv", crew.crew_id), Some(&cookie)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(resp.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
  assert_eq!(
    resp.headers()[header::CONTENT_DISPOSITION],
    "attachment; filename=crew_P12345.csv"
  );
  let csv = body_text(resp).await;
  assert!(csv.starts_with("Name,Rank,Passport,"));
  assert!(csv.contains("Ana Reyes,Second Officer,P12345"));
}

// ── Private profile ──────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_requires_the_current_token() {
  let (state, _dir) = make_state().await;
  register_p12345(&state).await;
  let crew = state.store.find_crew_by_passport("P12345".into()).await.unwrap().unwrap();

  let wrong = get(&state, &format!("/my-profile/{}/not-the-token", crew.crew_id), None).await;
  assert_eq!(wrong.status(), StatusCode::NOT_FOUND);
  let missing = get(&state, &format!("/my-profile/9999/{}", crew.profile_token), None).await;
  assert_eq!(missing.status(), StatusCode::NOT_FOUND);

  let resp = get(&state, &format!("/my-profile/{}/{}", crew.crew_id, crew.profile_token), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let page = body_text(resp).await;
  assert!(page.contains("passport.pdf"));
  assert!(page.contains("Profile completion"));
}

#[tokio::test]
async fn profile_upload_adds_documents() {
  let (state, dir) = make_state().await;
  register_p12345(&state).await;
  let crew = state.store.find_crew_by_passport("P12345".into()).await.unwrap().unwrap();
  let base = format!("/my-profile/{}/{}", crew.crew_id, crew.profile_token);

  let resp = post_multipart(&state, &base, &[
    Part::File { name: "yellow_fever", filename: "yf.jpg", data: vec![0xff; 2048] },
    Part::File { name: "sea_agreement", filename: "sea.pdf", data: pdf(2048) },
  ])
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), format!("{base}?uploaded=2"));
  assert_eq!(state.store.list_crew_documents(crew.crew_id).await.unwrap().len(), 4);
  assert_eq!(files_on_disk(dir.path()), 4);

  let page = body_text(get(&state, &format!("{base}?uploaded=2"), None).await).await;
  assert!(page.contains("Successfully uploaded 2 files."));

  let empty = post_multipart(&state, &base, &[Part::Text("note", "")]).await;
  assert_eq!(empty.status(), StatusCode::UNPROCESSABLE_ENTITY);
  assert!(body_text(empty).await.contains(html::NO_FILES_SELECTED));
}

#[tokio::test]
async fn regenerated_link_disables_the_old_one() {
  let (state, _dir) = make_state().await;
  register_p12345(&state).await;
  let crew = state.store.find_crew_by_passport("P12345".into()).await.unwrap().unwrap();
  let cookie = login_cookie(&state).await;

  let resp = post_form(&state, &format!("/admin/crew/{}/profile-link", crew.crew_id), "", Some(&cookie)).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let old = get(&state, &format!("/my-profile/{}/{}", crew.crew_id, crew.profile_token), None).await;
  assert_eq!(old.status(), StatusCode::NOT_FOUND);

  let rotated = state.store.get_crew(crew.crew_id).await.unwrap().unwrap();
  assert_ne!(rotated.profile_token, crew.profile_token);
  let detail = body_text(get(&state, &format!("/admin/crew/{}", crew.crew_id), Some(&cookie)).await).await;
  assert!(detail.contains(&format!("http://crew.test/my-profile/{}/{}", crew.crew_id, rotated.profile_token)));
}

#[tokio::test]
async fn admin_can_download_crew_documents() {
  let (state, _dir) = make_state().await;
  register_p12345(&state).await;
  let crew = state.store.find_crew_by_passport("P12345".into()).await.unwrap().unwrap();
  let doc = state
    .store
    .list_crew_documents(crew.crew_id)
    .await
    .unwrap()
    .into_iter()
    .find(|d| d.original_filename == "passport.pdf")
    .unwrap();
  let cookie = login_cookie(&state).await;

  let uri = format!("/admin/crew/{}/documents/{}", crew.crew_id, doc.document_id);
  let resp = get(&state, &uri, Some(&cookie)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  assert_eq!(bytes.len(), 2 * MB);
}

// ── Misc ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn client_script_is_served() {
  let (state, _dir) = make_state().await;
  let resp = get(&state, "/static/app.js", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(resp.headers()[header::CONTENT_TYPE].to_str().unwrap().contains("javascript"));
  assert!(body_text(resp).await.contains("IntersectionObserver"));
}

#[tokio::test]
async fn non_numeric_ids_are_not_found() {
  let (state, _dir) = make_state().await;
  let cookie = login_cookie(&state).await;

  for (uri, cookie) in [
    ("/my-profile/abc/some-token", None),
    ("/my-profile/1/some-token/documents/x", None),
    ("/admin/crew/abc", Some(cookie.as_str())),
    ("/admin/staff/1e3", Some(cookie.as_str())),
  ] {
    let resp = get(&state, uri, cookie).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    assert!(body_text(resp).await.contains("The page you are looking for does not exist."));
  }
}

#[tokio::test]
async fn forms_advertise_the_configured_upload_limit() {
  let dir = tempfile::tempdir().unwrap();
  let store = SqliteStore::open_in_memory().await.unwrap();
  let config = ServerConfig { max_upload_bytes: 2 * MB as u64, ..test_config(&dir) };
  let state = AppState::new(store, config);

  for uri in ["/register/crew", "/register/staff"] {
    let page = body_text(get(&state, uri, None).await).await;
    assert!(page.contains("data-max-bytes=\"2097152\""), "{uri}");
    assert!(page.contains("up to 2.0 MB"), "{uri}");
  }
}

#[tokio::test]
async fn unknown_path_is_404() {
  let (state, _dir) = make_state().await;
  assert_eq!(get(&state, "/nope", None).await.status(), StatusCode::NOT_FOUND);
}
