//! Error types and axum `IntoResponse` implementation.

use axum::{
  extract::multipart::MultipartError,
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::{html, uploads::UploadError};

#[derive(Debug, Error)]
pub enum Error {
  /// No valid admin session; carries the path to return to after login.
  #[error("unauthorized")]
  Unauthorized { next: String },
  #[error("not found")]
  NotFound,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("upload error: {0}")]
  Upload(#[from] UploadError),
  #[error("multipart error: {0}")]
  Multipart(#[from] MultipartError),
  #[error("password hashing error: {0}")]
  PasswordHash(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Store(Box::new(e))
  }
}

fn server_error() -> Response {
  (
    StatusCode::INTERNAL_SERVER_ERROR,
    Html(html::error_page(
      "Something went wrong",
      "An unexpected error occurred. Please try again later.",
    )),
  )
    .into_response()
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized { next } => {
        Redirect::to(&format!("/admin/login?next={}", html::url_encode(&next)))
          .into_response()
      }
      Error::NotFound => (
        StatusCode::NOT_FOUND,
        Html(html::error_page(
          "Not Found",
          "The page you are looking for does not exist.",
        )),
      )
        .into_response(),
      Error::BadRequest(msg) => (
        StatusCode::BAD_REQUEST,
        Html(html::error_page("Bad Request", &msg)),
      )
        .into_response(),
      Error::Upload(UploadError::Io(e)) => {
        tracing::error!(error = %e, "upload write failed");
        server_error()
      }
      Error::Upload(e) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(html::error_page("Upload rejected", &e.to_string())),
      )
        .into_response(),
      Error::Multipart(e) => {
        let status = e.status();
        (status, Html(html::error_page("Bad Request", &e.body_text())))
          .into_response()
      }
      Error::PasswordHash(e) => {
        tracing::error!(error = %e, "password hashing failed");
        server_error()
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "store error");
        server_error()
      }
    }
  }
}
