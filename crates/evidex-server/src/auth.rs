//! HTTP Basic-auth session provider and the middleware that enforces it.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::{self, SaltString},
};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use evidex_api::ApiError;
use evidex_core::{
  Error,
  session::{Credentials, Session, SessionProvider},
};
use rand_core::OsRng;

/// Hash `password` into the PHC string expected in `auth_password_hash`.
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)?
      .to_string(),
  )
}

/// A single account whose password is checked against an argon2 hash.
#[derive(Clone)]
pub struct PasswordSessions {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

impl SessionProvider for PasswordSessions {
  fn authenticate(&self, credentials: &Credentials) -> evidex_core::Result<Session> {
    if credentials.username != self.username {
      return Err(Error::Unauthorized);
    }

    let parsed_hash =
      PasswordHash::new(&self.password_hash).map_err(|_| Error::Unauthorized)?;

    Argon2::default()
      .verify_password(credentials.password.as_bytes(), &parsed_hash)
      .map_err(|_| Error::Unauthorized)?;

    Ok(Session {
      username: credentials.username.clone(),
    })
  }
}

/// Decode `Authorization: Basic …` into credentials.
pub fn basic_credentials(headers: &HeaderMap) -> Option<Credentials> {
  let encoded = headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Basic ")?;
  let decoded = B64.decode(encoded).ok()?;
  let creds = String::from_utf8(decoded).ok()?;
  let (username, password) = creds.split_once(':')?;
  Some(Credentials {
    username: username.to_owned(),
    password: password.to_owned(),
  })
}

/// Reject requests without a valid session; otherwise attach the [`Session`]
/// as a request extension.
pub async fn require_session(
  State(sessions): State<Arc<dyn SessionProvider>>,
  mut req: Request,
  next: Next,
) -> Result<Response, ApiError> {
  let credentials = basic_credentials(req.headers()).ok_or(ApiError::Unauthorized)?;
  let session = sessions.authenticate(&credentials).map_err(|e| {
    tracing::warn!(username = %credentials.username, "rejected credentials");
    ApiError::from(e)
  })?;
  req.extensions_mut().insert(session);
  Ok(next.run(req).await)
}
