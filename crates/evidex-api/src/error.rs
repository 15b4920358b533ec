//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use evidex_core::repository::RepositoryError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a repository failure. Broken domain rules keep their client
  /// status; anything else is a 500.
  pub fn store<E: RepositoryError>(e: E) -> Self {
    if let Some(core) = e.domain() {
      return Self::from_core(core);
    }
    if e.is_not_found() {
      return Self::NotFound(e.to_string());
    }
    Self::Store(Box::new(e))
  }

  fn from_core(e: &evidex_core::Error) -> Self {
    use evidex_core::Error as Core;
    match e {
      Core::InvalidTransition { .. } => Self::Conflict(e.to_string()),
      Core::Unauthorized => Self::Unauthorized,
      Core::UnknownValue { .. }
      | Core::InvalidRecord(_)
      | Core::MissingConfidence
      | Core::ConfidenceOutOfRange(_) => Self::BadRequest(e.to_string()),
    }
  }
}

impl From<evidex_core::Error> for ApiError {
  fn from(e: evidex_core::Error) -> Self { Self::from_core(&e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"evidex\""),
      );
    }
    res
  }
}
