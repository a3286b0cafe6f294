//! Admin login and dashboard.
//!
//! Every handler except login and logout takes an [`AdminSession`], so an
//! anonymous request is redirected to the login page before any data is read.

use axum::{
  Form,
  extract::{Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use crewdesk_core::{
  crew::{CrewMember, CrewQuery},
  form::{FormValues, LOGIN_FIELDS, validate},
  staff::{StaffFile, StaffQuery},
  status::ApplicationStatus,
};
use serde::Deserialize;

use crate::{
  AppState, Backend,
  auth::{self, AdminSession},
  error::Error,
  handlers::{
    RecordPath,
    files::{self, header_safe},
  },
  html::{self, Notice},
  uploads::mime_for,
};

const RECENT_LIMIT: usize = 5;

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
  pub next: Option<String>,
}

/// `GET /admin/login`
pub async fn login_form(Query(params): Query<LoginParams>) -> Html<String> {
  Html(html::login_page(auth::safe_next(params.next.as_deref()), None, None))
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub password: String,
  pub next:     Option<String>,
}

/// `POST /admin/login`
pub async fn login<S: Backend>(
  State(state): State<AppState<S>>,
  Form(form): Form<LoginForm>,
) -> Result<Response, Error> {
  let next = auth::safe_next(form.next.as_deref()).to_owned();
  let username = form.username.trim();

  let values: FormValues = [("username", username), ("password", form.password.as_str())]
    .into_iter()
    .collect();
  if !validate(LOGIN_FIELDS, &values).is_empty() {
    let page = html::login_page(&next, Some("Please enter your username and password."), Some(username));
    return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
  }

  let Some(admin) = auth::authenticate(&*state.store, username, &form.password).await? else {
    tracing::info!(username, "admin login failed");
    let page = html::login_page(&next, Some(html::INVALID_CREDENTIALS), Some(username));
    return Ok((StatusCode::UNAUTHORIZED, Html(page)).into_response());
  };

  let purged = state
    .store
    .purge_expired_sessions(Utc::now())
    .await
    .map_err(Error::store)?;
  let session = state
    .store
    .create_session(admin.admin_id, state.keys.ttl)
    .await
    .map_err(Error::store)?;
  tracing::info!(username = %admin.username, purged, "admin logged in");

  Ok(
    (
      [(header::SET_COOKIE, state.keys.set_cookie(&session.session_id))],
      Redirect::to(&next),
    )
      .into_response(),
  )
}

/// `GET|POST /admin/logout`
pub async fn logout<S: Backend>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Response, Error> {
  if let Some(session_id) = state.keys.session_id(&headers) {
    state
      .store
      .delete_session(session_id.to_owned())
      .await
      .map_err(Error::store)?;
  }
  Ok(
    (
      [(header::SET_COOKIE, state.keys.clear_cookie())],
      Html(html::logged_out_page()),
    )
      .into_response(),
  )
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

/// `GET /admin`
pub async fn dashboard<S: Backend>(
  session: AdminSession,
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error> {
  let stats = state.store.dashboard_stats().await.map_err(Error::store)?;
  let recent_crew = state
    .store
    .list_crew(&CrewQuery { limit: Some(RECENT_LIMIT), ..Default::default() })
    .await
    .map_err(Error::store)?;
  let recent_staff = state
    .store
    .list_staff(&StaffQuery { limit: Some(RECENT_LIMIT), ..Default::default() })
    .await
    .map_err(Error::store)?;
  Ok(Html(html::dashboard_page(&session.admin.username, &stats, &recent_crew, &recent_staff)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub status: Option<String>,
  pub search: Option<String>,
}

impl ListParams {
  fn status(&self) -> Result<Option<ApplicationStatus>, Error> {
    match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
      None => Ok(None),
      Some(raw) => raw
        .parse()
        .map(Some)
        .map_err(|e: crewdesk_core::Error| Error::BadRequest(e.to_string())),
    }
  }

  fn search(&self) -> Option<String> {
    self
      .search
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_owned)
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailParams {
  pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
  pub status: String,
  #[serde(default)]
  pub notes:  String,
}

impl StatusForm {
  fn parse(&self) -> Result<(ApplicationStatus, Option<String>), Error> {
    let status = self
      .status
      .parse()
      .map_err(|e: crewdesk_core::Error| Error::BadRequest(e.to_string()))?;
    let notes = Some(self.notes.trim())
      .filter(|n| !n.is_empty())
      .map(str::to_owned);
    Ok((status, notes))
  }
}

// ─── Crew ────────────────────────────────────────────────────────────────────

async fn load_crew<S: Backend>(state: &AppState<S>, crew_id: i64) -> Result<CrewMember, Error> {
  state
    .store
    .get_crew(crew_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)
}

/// `GET /admin/crew?status=&search=`
pub async fn crew_list<S: Backend>(
  session: AdminSession,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Html<String>, Error> {
  let query = CrewQuery { status: params.status()?, search: params.search(), limit: None };
  let crew = state.store.list_crew(&query).await.map_err(Error::store)?;
  Ok(Html(html::crew_list_page(
    &session.admin.username,
    &crew,
    query.status,
    query.search.as_deref().unwrap_or_default(),
  )))
}

/// `GET /admin/crew/{id}`
pub async fn crew_detail<S: Backend>(
  session: AdminSession,
  State(state): State<AppState<S>>,
  RecordPath(crew_id): RecordPath<i64>,
  Query(params): Query<DetailParams>,
) -> Result<Html<String>, Error> {
  let crew = load_crew(&state, crew_id).await?;
  let documents = state
    .store
    .list_crew_documents(crew_id)
    .await
    .map_err(Error::store)?;
  let profile_url = state.config.profile_url(crew_id, &crew.profile_token);
  let notice = params.notice.as_deref().and_then(Notice::parse);
  Ok(Html(html::crew_detail_page(
    &session.admin.username,
    &crew,
    &documents,
    &profile_url,
    notice,
  )))
}

/// `POST /admin/crew/{id}/status`
pub async fn crew_status<S: Backend>(
  session: AdminSession,
  State(state): State<AppState<S>>,
  RecordPath(crew_id): RecordPath<i64>,
  Form(form): Form<StatusForm>,
) -> Result<Redirect, Error> {
  let (status, notes) = form.parse()?;
  let before = load_crew(&state, crew_id).await?;
  let updated = state
    .store
    .update_crew_status(crew_id, status, notes)
    .await
    .map_err(Error::store)?;
  tracing::info!(
    crew_id,
    from = %before.status,
    to = %updated.status,
    admin = %session.admin.username,
    "crew status changed"
  );
  Ok(Redirect::to(&format!(
    "/admin/crew/{crew_id}?notice={}",
    Notice::StatusUpdated.as_str()
  )))
}

/// `POST /admin/crew/{id}/profile-link`
pub async fn rotate_profile_link<S: Backend>(
  session: AdminSession,
  State(state): State<AppState<S>>,
  RecordPath(crew_id): RecordPath<i64>,
) -> Result<Redirect, Error> {
  load_crew(&state, crew_id).await?;
  state
    .store
    .rotate_profile_token(crew_id)
    .await
    .map_err(Error::store)?;
  tracing::info!(crew_id, admin = %session.admin.username, "profile link regenerated");
  Ok(Redirect::to(&format!(
    "/admin/crew/{crew_id}?notice={}",
    Notice::LinkGenerated.as_str()
  )))
}

fn csv_field(value: &str) -> String {
  if value.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", value.replace('"', "\"\""))
  } else {
    value.to_owned()
  }
}

const CSV_HEADER: [&str; 10] = [
  "Name",
  "Rank",
  "Passport",
  "Nationality",
  "Date of Birth",
  "Years Experience",
  "Mobile",
  "Email",
  "Status",
  "Created At",
];

/// Header plus one row describing `crew`.
pub fn crew_csv(crew: &CrewMember) -> String {
  let row = [
    crew.name.clone(),
    crew.rank.clone(),
    crew.passport.clone(),
    crew.nationality.clone(),
    crew.date_of_birth.to_string(),
    crew.years_experience.to_string(),
    crew.mobile_number.clone(),
    crew.email.clone(),
    crew.status.label().to_owned(),
    crew.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
  ];
  let row: Vec<String> = row.iter().map(|f| csv_field(f)).collect();
  format!("{}\r\n{}\r\n", CSV_HEADER.join(","), row.join(","))
}

/// `GET /admin/crew/{id}/export.csv`
pub async fn crew_export<S: Backend>(
  _session: AdminSession,
  State(state): State<AppState<S>>,
  RecordPath(crew_id): RecordPath<i64>,
) -> Result<Response, Error> {
  let crew = load_crew(&state, crew_id).await?;
  Ok(
    (
      [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
        (
          header::CONTENT_DISPOSITION,
          format!("attachment; filename=crew_{}.csv", header_safe(&crew.passport)),
        ),
      ],
      crew_csv(&crew),
    )
      .into_response(),
  )
}

/// `GET /admin/crew/{id}/documents/{document_id}`
pub async fn crew_document<S: Backend>(
  _session: AdminSession,
  State(state): State<AppState<S>>,
  RecordPath((crew_id, document_id)): RecordPath<(i64, i64)>,
) -> Result<Response, Error> {
  let doc = state
    .store
    .get_crew_document(crew_id, document_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  files::send_stored(&state.uploads, &doc.stored_path, &doc.mime_type, &doc.original_filename).await
}

// ─── Staff ───────────────────────────────────────────────────────────────────

/// `GET /admin/staff?status=&search=`
pub async fn staff_list<S: Backend>(
  session: AdminSession,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Html<String>, Error> {
  let query = StaffQuery { status: params.status()?, search: params.search(), limit: None };
  let staff = state.store.list_staff(&query).await.map_err(Error::store)?;
  Ok(Html(html::staff_list_page(
    &session.admin.username,
    &staff,
    query.status,
    query.search.as_deref().unwrap_or_default(),
  )))
}

/// `GET /admin/staff/{id}`
pub async fn staff_detail<S: Backend>(
  session: AdminSession,
  State(state): State<AppState<S>>,
  RecordPath(staff_id): RecordPath<i64>,
  Query(params): Query<DetailParams>,
) -> Result<Html<String>, Error> {
  let staff = state
    .store
    .get_staff(staff_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  let notice = params.notice.as_deref().and_then(Notice::parse);
  Ok(Html(html::staff_detail_page(&session.admin.username, &staff, notice)))
}

/// `POST /admin/staff/{id}/status`
pub async fn staff_status<S: Backend>(
  session: AdminSession,
  State(state): State<AppState<S>>,
  RecordPath(staff_id): RecordPath<i64>,
  Form(form): Form<StatusForm>,
) -> Result<Redirect, Error> {
  let (status, notes) = form.parse()?;
  let before = state
    .store
    .get_staff(staff_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  let updated = state
    .store
    .update_staff_status(staff_id, status, notes)
    .await
    .map_err(Error::store)?;
  tracing::info!(
    staff_id,
    from = %before.status,
    to = %updated.status,
    admin = %session.admin.username,
    "staff status changed"
  );
  Ok(Redirect::to(&format!(
    "/admin/staff/{staff_id}?notice={}",
    Notice::StatusUpdated.as_str()
  )))
}

/// `GET /admin/staff/{id}/files/{resume|photo}`
pub async fn staff_file<S: Backend>(
  _session: AdminSession,
  State(state): State<AppState<S>>,
  RecordPath((staff_id, which)): RecordPath<(i64, String)>,
) -> Result<Response, Error> {
  let which: StaffFile = which.parse().map_err(|_| Error::NotFound)?;
  let staff = state
    .store
    .get_staff(staff_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  let stored = staff.file(which).ok_or(Error::NotFound)?;
  let ext = stored.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
  let name = stored.rsplit('/').next().unwrap_or(stored);
  files::send_stored(&state.uploads, stored, mime_for(ext), name).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{NaiveDate, TimeZone};

  #[test]
  fn csv_quotes_only_when_needed() {
    assert_eq!(csv_field("plain"), "plain");
    assert_eq!(csv_field("Reyes, Ana"), "\"Reyes, Ana\"");
    assert_eq!(csv_field("the \"Chief\""), "\"the \"\"Chief\"\"\"");
  }

  #[test]
  fn csv_has_header_and_one_row() {
    let crew = CrewMember {
      crew_id:                        1,
      name:                           "Reyes, Ana".into(),
      nationality:                    "Filipino".into(),
      date_of_birth:                  NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
      mobile_number:                  "+63 917 555 0101".into(),
      email:                          "ana@example.com".into(),
      rank:                           "Second Officer".into(),
      passport:                       "P12345".into(),
      years_experience:               8,
      last_vessel_type:               None,
      availability_date:              NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
      available_port_city:            None,
      emergency_contact_name:         None,
      emergency_contact_phone:        None,
      emergency_contact_relationship: None,
      status:                         ApplicationStatus::DocumentsVerified,
      admin_notes:                    None,
      profile_token:                  "t".into(),
      created_at:                     Utc.with_ymd_and_hms(2026, 10, 1, 8, 30, 0).unwrap(),
      updated_at:                     Utc.with_ymd_and_hms(2026, 10, 1, 8, 30, 0).unwrap(),
    };
    let csv = crew_csv(&crew);
    let lines: Vec<&str> = csv.split("\r\n").collect();
    assert_eq!(
      lines[0],
      "Name,Rank,Passport,Nationality,Date of Birth,Years Experience,Mobile,Email,Status,Created At"
    );
    assert_eq!(
      lines[1],
      "\"Reyes, Ana\",Second Officer,P12345,Filipino,1990-04-12,8,+63 917 555 0101,ana@example.com,Documents Verified,2026-10-01 08:30:00"
    );
  }

  #[test]
  fn empty_status_filter_means_all() {
    let params = ListParams { status: Some(" ".into()), search: Some("  ".into()) };
    assert_eq!(params.status().unwrap(), None);
    assert_eq!(params.search(), None);

    let bad = ListParams { status: Some("sunk".into()), search: None };
    assert!(matches!(bad.status(), Err(Error::BadRequest(_))));

    let code = ListParams { status: Some("3".into()), search: None };
    assert_eq!(code.status().unwrap(), Some(ApplicationStatus::Approved));
  }
}
