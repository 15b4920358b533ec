//! HTTP server for Evidex.
//!
//! Mounts the JSON API under `/api` behind a session check, plus an
//! unauthenticated `/health` check. Requests are traced with `tower-http`.

pub mod auth;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Extension, Json, Router, middleware, routing::get};
use evidex_core::{
  repository::EvidenceRepository,
  session::{Session, SessionProvider},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `EVIDEX_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  /// JSON snapshot to load at startup; the store starts empty without one.
  #[serde(default)]
  pub seed_path:          Option<PathBuf>,
  pub auth_username:      String,
  pub auth_password_hash: String,
}

impl ServerConfig {
  /// Layer defaults, the optional TOML file at `path` and `EVIDEX_*`
  /// environment variables, in that order.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("EVIDEX"))
      .build()?
      .try_deserialize()
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<R>(repo: Arc<R>, sessions: Arc<dyn SessionProvider>) -> Router
where
  R: EvidenceRepository + 'static,
{
  let api = evidex_api::api_router(repo)
    .route("/session", get(current_session))
    .layer(middleware::from_fn_with_state(sessions, auth::require_session));

  Router::new()
    .route("/health", get(health))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "ok" }

/// `GET /api/session`: the caller's session, as established by the
/// middleware.
async fn current_session(Extension(session): Extension<Session>) -> Json<Session> {
  Json(session)
}

// ─── Integration tests ────────────────────────────────────────────────────────
