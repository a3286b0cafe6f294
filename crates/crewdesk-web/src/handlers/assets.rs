//! Static assets compiled into the binary.

use axum::{http::header, response::IntoResponse};

const APP_JS: &str = include_str!("../../static/app.js");

pub async fn app_js() -> impl IntoResponse {
  (
    [
      (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
      (header::CACHE_CONTROL, "public, max-age=3600"),
    ],
    APP_JS,
  )
}
