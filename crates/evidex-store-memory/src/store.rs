//! [`MemoryStore`], the in-memory implementation of [`EvidenceRepository`].

use std::{collections::HashMap, path::Path, sync::Arc};

use chrono::Utc;
use evidex_core::{
  case::{Case, CaseStatus, NewCase},
  evidence::{EvidenceId, EvidenceRecord, NewEvidence, SearchHit, StatusUpdate},
  repository::EvidenceRepository,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
  Error, Result,
  seed::{SearchAnnotation, Seed},
};

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Snapshot {
  cases:       Vec<Case>,
  evidence:    Vec<EvidenceRecord>,
  annotations: HashMap<EvidenceId, SearchAnnotation>,
}

/// An evidence repository held entirely in memory.
///
/// Clones share the same snapshot.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Snapshot>>,
}

impl MemoryStore {
  /// An empty store.
  pub fn new() -> Self { Self::default() }

  /// Build a store from an already-parsed seed, checking it first.
  pub fn from_seed(seed: Seed) -> Result<Self> {
    seed.check()?;
    let annotations = seed
      .search
      .into_iter()
      .map(|a| (a.evidence_id.clone(), a))
      .collect();
    let snapshot = Snapshot {
      cases: seed.cases,
      evidence: seed.evidence,
      annotations,
    };
    Ok(Self {
      inner: Arc::new(RwLock::new(snapshot)),
    })
  }

  /// Load a JSON seed file.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path).await?;
    let seed = Seed::from_json(&raw)?;
    tracing::debug!(
      path = %path.display(),
      cases = seed.cases.len(),
      evidence = seed.evidence.len(),
      "loaded seed"
    );
    Self::from_seed(seed)
  }
}

fn new_id(prefix: &str) -> String {
  format!("{prefix}-{}", Uuid::new_v4().simple())
}

// ─── EvidenceRepository impl ─────────────────────────────────────────────────

impl EvidenceRepository for MemoryStore {
  type Error = Error;

  // ── Cases ─────────────────────────────────────────────────────────────────

  async fn list_cases(&self) -> Result<Vec<Case>> {
    Ok(self.inner.read().await.cases.clone())
  }

  async fn get_case(&self, id: &str) -> Result<Option<Case>> {
    let snapshot = self.inner.read().await;
    Ok(snapshot.cases.iter().find(|c| c.id == id).cloned())
  }

  async fn add_case(&self, input: NewCase) -> Result<Case> {
    let case = Case {
      id:          new_id("case"),
      name:        input.name,
      status:      CaseStatus::Pending,
      created_at:  Utc::now().date_naive(),
      next_review: input.next_review,
    };
    self.inner.write().await.cases.push(case.clone());
    tracing::info!(case_id = %case.id, name = %case.name, "opened case");
    Ok(case)
  }

  // ── Evidence ──────────────────────────────────────────────────────────────

  async fn list_evidence(&self) -> Result<Vec<EvidenceRecord>> {
    Ok(self.inner.read().await.evidence.clone())
  }

  async fn get_evidence(&self, id: &EvidenceId) -> Result<Option<EvidenceRecord>> {
    let snapshot = self.inner.read().await;
    Ok(snapshot.evidence.iter().find(|r| &r.id == id).cloned())
  }

  async fn ingest(&self, input: NewEvidence) -> Result<EvidenceRecord> {
    let mut snapshot = self.inner.write().await;
    if !snapshot.cases.iter().any(|c| c.id == input.case_ref) {
      return Err(Error::CaseNotFound(input.case_ref));
    }
    let record = EvidenceRecord::ingested(
      EvidenceId(new_id("ev")),
      input,
      Utc::now().date_naive(),
    );
    snapshot.evidence.push(record.clone());
    tracing::info!(
      evidence_id = %record.id,
      case_ref = %record.case_ref,
      kind = %record.kind,
      "ingested evidence"
    );
    Ok(record)
  }

  async fn update_status(
    &self,
    id: &EvidenceId,
    update: StatusUpdate,
  ) -> Result<EvidenceRecord> {
    let mut snapshot = self.inner.write().await;
    let record = snapshot
      .evidence
      .iter_mut()
      .find(|r| &r.id == id)
      .ok_or_else(|| Error::EvidenceNotFound(id.clone()))?;
    let from = record.status;
    record.advance(update)?;
    tracing::info!(evidence_id = %id, %from, to = %record.status, "status advanced");
    Ok(record.clone())
  }

  // ── Search ────────────────────────────────────────────────────────────────

  async fn search_hits(&self) -> Result<Vec<SearchHit>> {
    let snapshot = self.inner.read().await;
    Ok(
      snapshot
        .evidence
        .iter()
        .map(|record| {
          let annotation = snapshot.annotations.get(&record.id);
          SearchHit {
            record:    record.clone(),
            relevance: annotation.and_then(|a| a.relevance),
            excerpt:   annotation.and_then(|a| a.excerpt.clone()),
          }
        })
        .collect(),
    )
  }
}
