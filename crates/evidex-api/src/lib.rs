//! JSON REST API for Evidex.
//!
//! Exposes an axum [`Router`] backed by any
//! [`evidex_core::repository::EvidenceRepository`]. Every list endpoint runs
//! the shared query engine over a repository snapshot. Auth, TLS, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", evidex_api::api_router(store.clone()))
//! ```

pub mod cases;
pub mod error;
pub mod evidence;
pub mod params;
pub mod search;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use evidex_core::{query::Page, repository::EvidenceRepository};
use serde::Serialize;

pub use error::ApiError;

/// One page of a filtered list, with the size of the full match set.
#[derive(Debug, Serialize)]
pub struct Listing<T> {
  pub total: usize,
  pub items: Vec<T>,
}

impl<T: Clone> Listing<T> {
  fn paged(matched: Vec<&T>, page: Page) -> Self {
    Self {
      total: matched.len(),
      items: page.apply(matched).into_iter().cloned().collect(),
    }
  }
}

/// Build a fully-materialised API router for `repo`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<R>(repo: Arc<R>) -> Router<()>
where
  R: EvidenceRepository + 'static,
{
  Router::new()
    // Evidence
    .route("/evidence", get(evidence::list::<R>).post(evidence::create::<R>))
    .route("/evidence/{id}", get(evidence::get_one::<R>))
    .route("/evidence/{id}/status", post(evidence::update_status::<R>))
    // Search
    .route("/search", get(search::handler::<R>))
    .route("/facets", get(search::facets::<R>))
    // Cases
    .route("/cases", get(cases::list::<R>).post(cases::create::<R>))
    .route("/cases/{id}", get(cases::get_one::<R>))
    .route("/stats", get(cases::stats::<R>))
    .with_state(repo)
}

// ─── Router tests ─────────────────────────────────────────────────────────────
