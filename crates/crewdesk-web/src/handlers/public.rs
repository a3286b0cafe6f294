//! Public pages: home, crew and staff registration, status tracking.

use axum::{
  extract::{Multipart, Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
};
use crewdesk_core::{
  crew::normalize_passport,
  form::{CREW_FILE_FIELDS, FormErrors, FormValues, STAFF_FILE_FIELDS, crew_from_form, staff_from_form},
  staff::StaffFile,
};
use serde::Deserialize;

use crate::{
  AppState, Backend,
  error::Error,
  handlers::new_document,
  html::{self, Notice, TrackResult, url_encode},
  multipart::{Submission, read_submission},
  uploads::Staging,
};

/// Directory below the upload root for staff attachments.
const STAFF_UPLOAD_DIR: &str = "staff";

pub async fn home() -> Html<String> { Html(html::home_page()) }

// ─── Crew ────────────────────────────────────────────────────────────────────

pub async fn crew_form<S: Backend>(State(state): State<AppState<S>>) -> Html<String> {
  Html(html::crew_form_page(
    &FormValues::new(),
    &FormErrors::default(),
    None,
    state.uploads.max_bytes,
  ))
}

fn crew_form_response(
  status: StatusCode,
  values: &FormValues,
  errors: &FormErrors,
  form_error: Option<&str>,
  max_bytes: u64,
) -> Response {
  (status, Html(html::crew_form_page(values, errors, form_error, max_bytes))).into_response()
}

fn duplicate_passport(values: &FormValues, max_bytes: u64) -> Response {
  crew_form_response(
    StatusCode::CONFLICT,
    values,
    &FormErrors::default(),
    Some(html::DUPLICATE_PASSPORT),
    max_bytes,
  )
}

/// `POST /register/crew`
///
/// Text fields are validated before anything touches the disk. Accepted files
/// are then staged, and the crew row plus its documents are written in one
/// transaction; staged files are removed if that write fails.
pub async fn register_crew<S: Backend>(
  State(state): State<AppState<S>>,
  multipart: Multipart,
) -> Result<Response, Error> {
  let submission = read_submission(multipart, &state.uploads).await?;
  let mut errors = submission.rejected.clone();
  let max_bytes = state.uploads.max_bytes;

  let crew = match crew_from_form(&submission.values) {
    Ok(crew) if errors.is_empty() => crew,
    Ok(_) => {
      return Ok(crew_form_response(StatusCode::UNPROCESSABLE_ENTITY, &submission.values, &errors, None, max_bytes));
    }
    Err(field_errors) => {
      errors.merge(field_errors);
      return Ok(crew_form_response(StatusCode::UNPROCESSABLE_ENTITY, &submission.values, &errors, None, max_bytes));
    }
  };

  let taken = state
    .store
    .find_crew_by_passport(crew.passport.clone())
    .await
    .map_err(Error::store)?;
  if taken.is_some() {
    tracing::info!(passport = %crew.passport, "registration rejected: duplicate passport");
    return Ok(duplicate_passport(&submission.values, max_bytes));
  }

  let mut staging = Staging::new(&state.uploads);
  let mut documents = Vec::new();
  for (field, kind) in CREW_FILE_FIELDS {
    for file in submission.files_for(field) {
      let staged = staging
        .write(field, kind.dir_name(), &file.filename, &file.extension, &file.data)
        .await?;
      documents.push(new_document(*kind, staged));
    }
  }

  let passport = crew.passport.clone();
  match state.store.register_crew(crew, documents).await {
    Ok((member, docs)) => {
      staging.commit();
      tracing::info!(crew_id = member.crew_id, documents = docs.len(), "crew member registered");
      Ok(
        Redirect::to(&format!(
          "/track?passport={}&notice={}",
          url_encode(&member.passport),
          Notice::CrewRegistered.as_str()
        ))
        .into_response(),
      )
    }
    Err(e) => {
      drop(staging);
      // Lost a race with a concurrent registration of the same passport.
      let raced = state
        .store
        .find_crew_by_passport(passport.clone())
        .await
        .map_err(Error::store)?;
      if raced.is_some() {
        tracing::info!(%passport, "registration rejected: duplicate passport");
        return Ok(duplicate_passport(&submission.values, max_bytes));
      }
      Err(Error::store(e))
    }
  }
}

// ─── Staff ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct NoticeParams {
  pub notice: Option<String>,
}

pub async fn staff_form<S: Backend>(
  State(state): State<AppState<S>>,
  Query(params): Query<NoticeParams>,
) -> Html<String> {
  let notice = params.notice.as_deref().and_then(Notice::parse);
  Html(html::staff_form_page(
    &FormValues::new(),
    &FormErrors::default(),
    notice,
    state.uploads.max_bytes,
  ))
}

async fn stage_first(
  staging: &mut Staging<'_>,
  submission: &Submission,
  field: &str,
) -> Result<Option<String>, Error> {
  let Some(file) = submission.files_for(field).next() else {
    return Ok(None);
  };
  let staged = staging
    .write(field, STAFF_UPLOAD_DIR, &file.filename, &file.extension, &file.data)
    .await?;
  Ok(Some(staged.relative_path.clone()))
}

/// `POST /register/staff`
pub async fn register_staff<S: Backend>(
  State(state): State<AppState<S>>,
  multipart: Multipart,
) -> Result<Response, Error> {
  let submission = read_submission(multipart, &state.uploads).await?;
  let mut errors = submission.rejected.clone();

  let mut staff = match staff_from_form(&submission.values) {
    Ok(staff) if errors.is_empty() => staff,
    result => {
      if let Err(field_errors) = result {
        errors.merge(field_errors);
      }
      let page = html::staff_form_page(&submission.values, &errors, None, state.uploads.max_bytes);
      return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
    }
  };

  let mut staging = Staging::new(&state.uploads);
  for (field, which) in STAFF_FILE_FIELDS {
    let path = stage_first(&mut staging, &submission, field).await?;
    match which {
      StaffFile::Resume => staff.resume_file = path,
      StaffFile::Photo => staff.photo_file = path,
    }
  }

  let member = state.store.register_staff(staff).await.map_err(Error::store)?;
  staging.commit();
  tracing::info!(staff_id = member.staff_id, department = %member.department, "staff member registered");

  Ok(
    Redirect::to(&format!("/register/staff?notice={}", Notice::StaffRegistered.as_str()))
      .into_response(),
  )
}

// ─── Tracking ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct TrackParams {
  #[serde(default)]
  pub passport: String,
  pub notice:   Option<String>,
}

/// `GET /track?passport=`
pub async fn track<S: Backend>(
  State(state): State<AppState<S>>,
  Query(params): Query<TrackParams>,
) -> Result<Html<String>, Error> {
  let passport = normalize_passport(&params.passport);
  let notice = params.notice.as_deref().and_then(Notice::parse);

  if passport.is_empty() {
    return Ok(Html(html::track_page("", TrackResult::NotSearched, notice)));
  }

  let found = state
    .store
    .find_crew_by_passport(passport.clone())
    .await
    .map_err(Error::store)?;
  let result = match &found {
    Some(crew) => TrackResult::Found(crew),
    None => TrackResult::NotFound,
  };
  Ok(Html(html::track_page(&passport, result, notice)))
}
