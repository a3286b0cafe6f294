//! The crew member's private profile, reached through a tokenised link.
//!
//! An unknown id and a wrong token both produce the same 404.

use axum::{
  extract::{Multipart, Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
};
use crewdesk_core::{
  crew::CrewMember,
  document::{CrewDocument, DocumentKind},
  token::constant_time_eq,
};
use serde::Deserialize;

use crate::{
  AppState, Backend,
  error::Error,
  handlers::{RecordPath, files, new_document},
  html::{self, ProfileNotice},
  multipart::read_submission,
  uploads::Staging,
};

async fn authorise<S: Backend>(
  state: &AppState<S>,
  crew_id: i64,
  token: &str,
) -> Result<CrewMember, Error> {
  let crew = state
    .store
    .get_crew(crew_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  if !constant_time_eq(token.as_bytes(), crew.profile_token.as_bytes()) {
    return Err(Error::NotFound);
  }
  Ok(crew)
}

fn rerender<S: Backend>(
  state: &AppState<S>,
  crew: &CrewMember,
  documents: &[CrewDocument],
  notice: ProfileNotice<'_>,
) -> Response {
  let page = html::profile_page(crew, documents, notice, state.uploads.max_bytes);
  (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileParams {
  pub uploaded: Option<usize>,
}

/// `GET /my-profile/{crew_id}/{token}`
pub async fn show<S: Backend>(
  State(state): State<AppState<S>>,
  RecordPath((crew_id, token)): RecordPath<(i64, String)>,
  Query(params): Query<ProfileParams>,
) -> Result<Html<String>, Error> {
  let crew = authorise(&state, crew_id, &token).await?;
  let documents = state
    .store
    .list_crew_documents(crew_id)
    .await
    .map_err(Error::store)?;
  let notice = params.uploaded.map_or(ProfileNotice::None, ProfileNotice::Uploaded);
  Ok(Html(html::profile_page(&crew, &documents, notice, state.uploads.max_bytes)))
}

/// `POST /my-profile/{crew_id}/{token}`: each file field is named after the
/// document kind it provides.
pub async fn upload<S: Backend>(
  State(state): State<AppState<S>>,
  RecordPath((crew_id, token)): RecordPath<(i64, String)>,
  multipart: Multipart,
) -> Result<Response, Error> {
  let crew = authorise(&state, crew_id, &token).await?;
  let submission = read_submission(multipart, &state.uploads).await?;

  if !submission.rejected.is_empty() {
    let documents = state.store.list_crew_documents(crew_id).await.map_err(Error::store)?;
    return Ok(rerender(&state, &crew, &documents, ProfileNotice::Rejected(&submission.rejected)));
  }

  let mut staging = Staging::new(&state.uploads);
  let mut documents = Vec::new();
  for file in &submission.files {
    let Ok(kind) = file.field.parse::<DocumentKind>() else { continue };
    let staged = staging
      .write(&file.field, kind.dir_name(), &file.filename, &file.extension, &file.data)
      .await?;
    documents.push(new_document(kind, staged));
  }

  if documents.is_empty() {
    drop(staging);
    let existing = state.store.list_crew_documents(crew_id).await.map_err(Error::store)?;
    return Ok(rerender(&state, &crew, &existing, ProfileNotice::NoFiles));
  }

  let count = documents.len();
  state
    .store
    .add_crew_documents(crew_id, documents)
    .await
    .map_err(Error::store)?;
  staging.commit();
  tracing::info!(crew_id, documents = count, "crew documents uploaded");

  Ok(Redirect::to(&format!("/my-profile/{crew_id}/{token}?uploaded={count}")).into_response())
}

/// `GET /my-profile/{crew_id}/{token}/documents/{document_id}`
pub async fn document<S: Backend>(
  State(state): State<AppState<S>>,
  RecordPath((crew_id, token, document_id)): RecordPath<(i64, String, i64)>,
) -> Result<Response, Error> {
  authorise(&state, crew_id, &token).await?;
  let doc = state
    .store
    .get_crew_document(crew_id, document_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  files::send_stored(&state.uploads, &doc.stored_path, &doc.mime_type, &doc.original_filename).await
}
