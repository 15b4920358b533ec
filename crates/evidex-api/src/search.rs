//! Handlers for `GET /search` and `GET /facets`.
//!
//! Both accept the same [`QueryParams`] as `/evidence`. `/search` runs over
//! search hits, so free text also matches excerpts, and it sorts by
//! relevance unless told otherwise.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use evidex_core::{
  evidence::SearchHit,
  facets::FacetCounts,
  filter,
  query::SortBy,
  repository::EvidenceRepository,
};

use crate::{Listing, error::ApiError, params::QueryParams};

/// `GET /search[?text=...][&kinds=...][&sort=...]...`
pub async fn handler<R>(
  State(repo): State<Arc<R>>,
  Query(params): Query<QueryParams>,
) -> Result<Json<Listing<SearchHit>>, ApiError>
where
  R: EvidenceRepository,
{
  let (mut spec, page) = params.to_query()?;
  spec.sort_by.get_or_insert(SortBy::Relevance);

  let hits = repo.search_hits().await.map_err(ApiError::store)?;
  let matched = filter(&hits, &spec);
  tracing::debug!(matched = matched.len(), text = ?spec.text, "search");
  Ok(Json(Listing::paged(matched, page)))
}

/// `GET /facets[?...]`: counts over the evidence matching the query.
pub async fn facets<R>(
  State(repo): State<Arc<R>>,
  Query(params): Query<QueryParams>,
) -> Result<Json<FacetCounts>, ApiError>
where
  R: EvidenceRepository,
{
  let (spec, _page) = params.to_query()?;
  let records = repo.list_evidence().await.map_err(ApiError::store)?;
  let matched = filter(&records, &spec);
  Ok(Json(FacetCounts::tally(&matched)))
}
