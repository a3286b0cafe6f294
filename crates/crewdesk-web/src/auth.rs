//! Admin authentication: password verification, signed session cookies and
//! the [`AdminSession`] extractor.

use std::sync::LazyLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, Method, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, Utc};
use crewdesk_core::{
  admin::Admin,
  store::{RecruitmentStore, SessionStore},
};
use hmac::{Hmac, Mac};
use rand_core::OsRng;
use sha2::Sha256;

use crate::{AppState, Backend, error::Error};

pub const SESSION_COOKIE: &str = "crewdesk_session";

type HmacSha256 = Hmac<Sha256>;

/// Produce an argon2 PHC string for `password`.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Verified against when the username is unknown, so both failure paths do
/// the same work.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
  hash_password("crewdesk-unknown-user").unwrap_or_default()
});

fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .map(|parsed| {
      Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
    })
    .unwrap_or(false)
}

/// Check a username/password pair against the store.
///
/// Unknown users and wrong passwords both yield `None`, after the same amount
/// of hashing work.
pub async fn authenticate<S>(
  store: &S,
  username: &str,
  password: &str,
) -> Result<Option<Admin>, Error>
where
  S: RecruitmentStore,
{
  let admin = store
    .find_admin(username.to_owned())
    .await
    .map_err(Error::store)?;

  match admin {
    Some(admin) if verify_password(password, &admin.password_hash) => Ok(Some(admin)),
    Some(_) => Ok(None),
    None => {
      verify_password(password, &DUMMY_HASH);
      Ok(None)
    }
  }
}

// ─── Cookies ─────────────────────────────────────────────────────────────────

/// Secret and attributes for session cookies.
#[derive(Clone)]
pub struct SessionKeys {
  secret:     Vec<u8>,
  pub ttl:    Duration,
  pub secure: bool,
}

impl SessionKeys {
  pub fn new(secret: &str, ttl_minutes: i64, secure: bool) -> Self {
    Self {
      secret: secret.as_bytes().to_vec(),
      ttl: Duration::minutes(ttl_minutes),
      secure,
    }
  }

  fn mac(&self) -> HmacSha256 {
    // HMAC accepts keys of any length.
    <HmacSha256 as Mac>::new_from_slice(&self.secret)
      .unwrap_or_else(|_| unreachable!("hmac key of any size is valid"))
  }

  /// `<id>.<base64url(HMAC-SHA256(secret, id))>`
  pub fn sign(&self, session_id: &str) -> String {
    let mut mac = self.mac();
    mac.update(session_id.as_bytes());
    let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{session_id}.{sig}")
  }

  /// The session id inside `value` if its signature checks out.
  pub fn verify<'a>(&self, value: &'a str) -> Option<&'a str> {
    let (id, sig) = value.rsplit_once('.')?;
    let sig = URL_SAFE_NO_PAD.decode(sig).ok()?;
    let mut mac = self.mac();
    mac.update(id.as_bytes());
    mac.verify_slice(&sig).ok()?;
    Some(id)
  }

  pub fn set_cookie(&self, session_id: &str) -> String {
    format!(
      "{SESSION_COOKIE}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
      self.sign(session_id),
      self.ttl.num_seconds(),
      if self.secure { "; Secure" } else { "" },
    )
  }

  pub fn clear_cookie(&self) -> String {
    format!(
      "{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0{}",
      if self.secure { "; Secure" } else { "" },
    )
  }

  /// The verified session id from the request's cookie header, if any.
  pub fn session_id<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
    cookie_value(headers, SESSION_COOKIE).and_then(|v| self.verify(v))
  }
}

/// The value of cookie `name`, searching every `Cookie` header.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(k, _)| *k == name)
    .map(|(_, v)| v)
}

/// `next` if it is a local path, else the dashboard.
pub fn safe_next(next: Option<&str>) -> &str {
  match next {
    Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains('\\') => n,
    _ => "/admin",
  }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// Present in a handler means the request carries a live admin session.
pub struct AdminSession {
  pub admin:      Admin,
  pub session_id: String,
}

impl<S> FromRequestParts<AppState<S>> for AdminSession
where
  S: Backend,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    // Only a GET can be replayed after login.
    let next = match parts.uri.path_and_query() {
      Some(pq) if parts.method == Method::GET => pq.as_str().to_owned(),
      _ => "/admin".to_owned(),
    };
    let unauthorized = || Error::Unauthorized { next: next.clone() };

    let session_id = state
      .keys
      .session_id(&parts.headers)
      .ok_or_else(unauthorized)?
      .to_owned();

    let (session, admin) = SessionStore::get_session(&*state.store, session_id.clone())
      .await
      .map_err(Error::store)?
      .ok_or_else(unauthorized)?;

    if session.is_expired(Utc::now()) {
      return Err(unauthorized());
    }
    Ok(AdminSession { admin, session_id })
  }
}
