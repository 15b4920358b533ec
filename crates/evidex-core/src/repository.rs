//! The `EvidenceRepository` trait.
//!
//! Implemented by record sources (e.g. `evidex-store-memory`). The API layer
//! depends on this abstraction, not on any concrete backend. Repositories
//! hand out snapshots; filtering happens afterwards in [`crate::query`].

use std::future::Future;

use crate::{
  Error,
  case::{Case, NewCase},
  evidence::{EvidenceId, EvidenceRecord, NewEvidence, SearchHit, StatusUpdate},
};

/// Backend errors, classified so callers can tell a broken domain rule or a
/// missing record apart from an infrastructure failure.
pub trait RepositoryError: std::error::Error + Send + Sync + 'static {
  /// The domain rule the operation broke, if that is why it failed.
  fn domain(&self) -> Option<&Error> { None }

  /// Whether the operation named a case or record that does not exist.
  fn is_not_found(&self) -> bool { false }
}

/// Abstraction over where cases and evidence come from.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait EvidenceRepository: Send + Sync {
  type Error: RepositoryError;

  // ── Cases ─────────────────────────────────────────────────────────────

  fn list_cases(
    &self,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_;

  /// Retrieve a case by id. Returns `None` if not found.
  fn get_case<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + 'a;

  /// Open a new case in `pending` status.
  fn add_case(
    &self,
    input: NewCase,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  // ── Evidence ──────────────────────────────────────────────────────────

  /// Every record, in ingestion order.
  fn list_evidence(
    &self,
  ) -> impl Future<Output = Result<Vec<EvidenceRecord>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get_evidence<'a>(
    &'a self,
    id: &'a EvidenceId,
  ) -> impl Future<Output = Result<Option<EvidenceRecord>, Self::Error>>
  + Send
  + 'a;

  /// Store a newly uploaded record. The repository assigns the id and upload
  /// date; the record starts `pending` with no confidence.
  ///
  /// Returns an error if `input.case_ref` names no known case.
  fn ingest(
    &self,
    input: NewEvidence,
  ) -> impl Future<Output = Result<EvidenceRecord, Self::Error>> + Send + '_;

  /// Apply an analysis status change to a record.
  ///
  /// Returns an error for unknown ids and for non-forward transitions.
  fn update_status<'a>(
    &'a self,
    id: &'a EvidenceId,
    update: StatusUpdate,
  ) -> impl Future<Output = Result<EvidenceRecord, Self::Error>> + Send + 'a;

  // ── Search ────────────────────────────────────────────────────────────

  /// Every record decorated with whatever search data (relevance, excerpt)
  /// the backend holds for it.
  fn search_hits(
    &self,
  ) -> impl Future<Output = Result<Vec<SearchHit>, Self::Error>> + Send + '_;
}
