//! Handlers for `/evidence` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/evidence` | Filter params, see [`QueryParams`] |
//! | `GET`  | `/evidence/{id}` | Single record |
//! | `POST` | `/evidence` | Body: [`NewEvidence`]; returns 201 + stored record |
//! | `POST` | `/evidence/{id}/status` | Body: [`StatusUpdate`]; 409 on a non-forward move |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use evidex_core::{
  evidence::{EvidenceId, EvidenceRecord, NewEvidence, StatusUpdate},
  filter,
  repository::EvidenceRepository,
};

use crate::{Listing, error::ApiError, params::QueryParams};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /evidence[?text=...][&kinds=...][&case=...][&date_from=...]...`
pub async fn list<R>(
  State(repo): State<Arc<R>>,
  Query(params): Query<QueryParams>,
) -> Result<Json<Listing<EvidenceRecord>>, ApiError>
where
  R: EvidenceRepository,
{
  let (spec, page) = params.to_query()?;
  let records = repo.list_evidence().await.map_err(ApiError::store)?;
  let matched = filter(&records, &spec);
  tracing::debug!(matched = matched.len(), of = records.len(), "evidence query");
  Ok(Json(Listing::paged(matched, page)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /evidence/{id}`
pub async fn get_one<R>(
  State(repo): State<Arc<R>>,
  Path(id): Path<String>,
) -> Result<Json<EvidenceRecord>, ApiError>
where
  R: EvidenceRepository,
{
  let id = EvidenceId(id);
  let record = repo
    .get_evidence(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("evidence {id} not found")))?;
  Ok(Json(record))
}

// ─── Ingest ───────────────────────────────────────────────────────────────────

/// `POST /evidence`: returns 201 + the stored, `pending` record.
pub async fn create<R>(
  State(repo): State<Arc<R>>,
  Json(body): Json<NewEvidence>,
) -> Result<impl IntoResponse, ApiError>
where
  R: EvidenceRepository,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title must not be empty".into()));
  }
  if repo
    .get_case(&body.case_ref)
    .await
    .map_err(ApiError::store)?
    .is_none()
  {
    return Err(ApiError::BadRequest(format!(
      "unknown case {}",
      body.case_ref
    )));
  }
  let record = repo.ingest(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Status ───────────────────────────────────────────────────────────────────

/// `POST /evidence/{id}/status`, body: `{"status":"analyzed","confidence":0.9}`
///
/// The store applies the transition under its write lock; a non-forward move
/// comes back as 409 and an unknown id as 404.
pub async fn update_status<R>(
  State(repo): State<Arc<R>>,
  Path(id): Path<String>,
  Json(body): Json<StatusUpdate>,
) -> Result<Json<EvidenceRecord>, ApiError>
where
  R: EvidenceRepository,
{
  let id = EvidenceId(id);
  let record = repo
    .update_status(&id, body)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(record))
}
