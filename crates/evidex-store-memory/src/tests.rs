//! Tests for `MemoryStore` against small in-process seeds.

use std::collections::BTreeSet;

use evidex_core::{
  case::NewCase,
  evidence::{AnalysisStatus, EvidenceId, EvidenceKind, NewEvidence, StatusUpdate},
  repository::{EvidenceRepository, RepositoryError},
};

use crate::{Error, MemoryStore, Seed};

const SEED: &str = r#"{
  "cases": [
    { "id": "case-001", "name": "Smith vs. Jones", "status": "active", "created_at": "2025-01-15" }
  ],
  "evidence": [
    { "id": "ev-001", "title": "Interview Transcript - John Smith", "kind": "document",
      "case_ref": "case-001", "uploaded_at": "2025-01-20", "status": "analyzed",
      "confidence": 0.95, "tags": ["witness"] },
    { "id": "ev-002", "title": "CCTV Recording - Jan 15", "kind": "video",
      "case_ref": "case-001", "uploaded_at": "2025-01-18", "status": "pending" }
  ],
  "search": [
    { "evidence_id": "ev-002", "relevance": 0.94, "excerpt": "three individuals entering" }
  ]
}"#;

fn store() -> MemoryStore {
  MemoryStore::from_seed(Seed::from_json(SEED).expect("seed parses"))
    .expect("seed is consistent")
}

fn upload(case_ref: &str) -> NewEvidence {
  NewEvidence {
    title:      "Deposition Video".into(),
    kind:       EvidenceKind::Video,
    case_ref:   case_ref.into(),
    tags:       BTreeSet::new(),
    size_bytes: Some(1024),
  }
}

// ─── Seeds ───────────────────────────────────────────────────────────────────

#[test]
fn seed_rejects_unknown_case_reference() {
  let raw = SEED.replace("\"case_ref\": \"case-001\", \"uploaded_at\": \"2025-01-18\"", "\"case_ref\": \"case-999\", \"uploaded_at\": \"2025-01-18\"");
  assert!(matches!(Seed::from_json(&raw), Err(Error::InvalidSeed(_))));
}

#[test]
fn seed_rejects_duplicate_evidence_ids() {
  let raw = SEED.replace("\"ev-002\", \"title\"", "\"ev-001\", \"title\"");
  assert!(matches!(Seed::from_json(&raw), Err(Error::DuplicateId(_))));
}

#[test]
fn seed_rejects_record_breaking_confidence_invariant() {
  let raw = SEED.replace(
    "\"status\": \"pending\" }",
    "\"status\": \"pending\", \"confidence\": 0.3 }",
  );
  assert!(matches!(Seed::from_json(&raw), Err(Error::Json(_))));
}

#[test]
fn seed_rejects_out_of_range_relevance() {
  let raw = SEED.replace("0.94", "1.94");
  assert!(matches!(Seed::from_json(&raw), Err(Error::InvalidSeed(_))));
}

#[tokio::test]
async fn shipped_seed_loads() {
  let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/seed.json");
  let s = MemoryStore::open(path).await.unwrap();
  assert_eq!(s.list_cases().await.unwrap().len(), 4);
  assert_eq!(s.list_evidence().await.unwrap().len(), 6);
  let hits = s.search_hits().await.unwrap();
  assert!(hits.iter().any(|h| h.relevance.is_some()));
}

#[tokio::test]
async fn open_missing_file_is_io_error() {
  let result = MemoryStore::open("/nonexistent/evidex-seed.json").await;
  assert!(matches!(result, Err(Error::Io(_))));
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn lists_seeded_records_in_order() {
  let s = store();
  let records = s.list_evidence().await.unwrap();
  let ids: Vec<_> = records.iter().map(|r| r.id.0.as_str()).collect();
  assert_eq!(ids, vec!["ev-001", "ev-002"]);
}

#[tokio::test]
async fn get_missing_evidence_returns_none() {
  let s = store();
  let got = s.get_evidence(&EvidenceId::from("ev-404")).await.unwrap();
  assert!(got.is_none());
}

#[tokio::test]
async fn search_hits_carry_annotations_only_where_present() {
  let s = store();
  let hits = s.search_hits().await.unwrap();
  assert_eq!(hits.len(), 2);
  assert_eq!(hits[0].relevance, None);
  assert_eq!(hits[1].relevance, Some(0.94));
  assert_eq!(hits[1].excerpt.as_deref(), Some("three individuals entering"));
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ingest_creates_pending_record_without_confidence() {
  let s = store();
  let record = s.ingest(upload("case-001")).await.unwrap();
  assert_eq!(record.status, AnalysisStatus::Pending);
  assert!(record.confidence.is_none());
  assert!(record.id.0.starts_with("ev-"));

  let fetched = s.get_evidence(&record.id).await.unwrap().unwrap();
  assert_eq!(fetched, record);
  assert_eq!(s.list_evidence().await.unwrap().len(), 3);
}

#[tokio::test]
async fn ingest_into_unknown_case_fails() {
  let s = store();
  let err = s.ingest(upload("case-404")).await.unwrap_err();
  assert!(matches!(err, Error::CaseNotFound(_)));
}

#[tokio::test]
async fn add_case_then_ingest_into_it() {
  let s = store();
  let case = s
    .add_case(NewCase {
      name:        "Doe v. Roe".into(),
      next_review: None,
    })
    .await
    .unwrap();
  assert!(s.get_case(&case.id).await.unwrap().is_some());
  s.ingest(upload(&case.id)).await.unwrap();
}

#[tokio::test]
async fn update_status_moves_forward() {
  let s = store();
  let id = EvidenceId::from("ev-002");
  s.update_status(&id, StatusUpdate {
    status:     AnalysisStatus::Analyzing,
    confidence: None,
  })
  .await
  .unwrap();
  let done = s
    .update_status(&id, StatusUpdate {
      status:     AnalysisStatus::Analyzed,
      confidence: Some(0.81),
    })
    .await
    .unwrap();
  assert_eq!(done.status, AnalysisStatus::Analyzed);
  assert_eq!(done.confidence, Some(0.81));
}

#[tokio::test]
async fn update_status_rejects_regression() {
  let s = store();
  let err = s
    .update_status(&EvidenceId::from("ev-001"), StatusUpdate {
      status:     AnalysisStatus::Pending,
      confidence: None,
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(evidex_core::Error::InvalidTransition { .. })
  ));
  assert!(matches!(
    err.domain(),
    Some(evidex_core::Error::InvalidTransition { .. })
  ));
  assert!(!err.is_not_found());
}

#[tokio::test]
async fn update_status_unknown_id_is_not_found() {
  let s = store();
  let err = s
    .update_status(&EvidenceId::from("ev-404"), StatusUpdate {
      status:     AnalysisStatus::Analyzing,
      confidence: None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EvidenceNotFound(_)));
  assert!(err.is_not_found());
  assert!(err.domain().is_none());
}

#[tokio::test]
async fn clones_share_the_snapshot() {
  let s = store();
  let other = s.clone();
  s.ingest(upload("case-001")).await.unwrap();
  assert_eq!(other.list_evidence().await.unwrap().len(), 3);
}
