//! Session provider seam.
//!
//! Route protection depends on this trait only; how credentials are checked
//! is up to the implementation.

use serde::Serialize;

use crate::Result;

/// Username/password pair presented by a client.
#[derive(Clone)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

impl std::fmt::Debug for Credentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Credentials")
      .field("username", &self.username)
      .field("password", &"<redacted>")
      .finish()
  }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
  pub username: String,
}

pub trait SessionProvider: Send + Sync {
  /// Return a [`Session`] for valid credentials, or
  /// [`crate::Error::Unauthorized`].
  fn authenticate(&self, credentials: &Credentials) -> Result<Session>;
}
