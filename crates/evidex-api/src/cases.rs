//! Handlers for `/cases` and `/stats`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/cases` | Optional `?text=...&status=active\|in-progress\|pending` |
//! | `POST` | `/cases` | Body: `{"name":"..."}` |
//! | `GET`  | `/cases/{id}` | 404 if not found |
//! | `GET`  | `/stats` | Dashboard headline numbers |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use evidex_core::{
  case::{CaseQuery, CaseStatus, NewCase, filter_cases},
  facets::{CaseSummary, DashboardStats},
  query::parse_value,
  repository::EvidenceRepository,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub text:   Option<String>,
  pub status: Option<String>,
}

/// `GET /cases[?text=...][&status=...]`
pub async fn list<R>(
  State(repo): State<Arc<R>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<CaseSummary>>, ApiError>
where
  R: EvidenceRepository,
{
  let query = CaseQuery {
    text:   params.text,
    status: params
      .status
      .as_deref()
      .filter(|s| !s.is_empty())
      .map(|s| parse_value::<CaseStatus>("status", s))
      .transpose()?,
  };
  let cases = repo.list_cases().await.map_err(ApiError::store)?;
  let records = repo.list_evidence().await.map_err(ApiError::store)?;
  let matched = filter_cases(&cases, &query);
  Ok(Json(CaseSummary::summarize(&matched, &records)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /cases`, body: `{"name":"Doe v. Roe"}`
pub async fn create<R>(
  State(repo): State<Arc<R>>,
  Json(body): Json<NewCase>,
) -> Result<impl IntoResponse, ApiError>
where
  R: EvidenceRepository,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }
  let case = repo.add_case(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(case)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /cases/{id}`
pub async fn get_one<R>(
  State(repo): State<Arc<R>>,
  Path(id): Path<String>,
) -> Result<Json<CaseSummary>, ApiError>
where
  R: EvidenceRepository,
{
  let case = repo
    .get_case(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("case {id} not found")))?;
  let records = repo.list_evidence().await.map_err(ApiError::store)?;
  Ok(Json(CaseSummary::of(case, &records)))
}

// ─── Stats ────────────────────────────────────────────────────────────────────

/// `GET /stats`
pub async fn stats<R>(
  State(repo): State<Arc<R>>,
) -> Result<Json<DashboardStats>, ApiError>
where
  R: EvidenceRepository,
{
  let cases = repo.list_cases().await.map_err(ApiError::store)?;
  let records = repo.list_evidence().await.map_err(ApiError::store)?;
  Ok(Json(DashboardStats::compute(&cases, &records)))
}
