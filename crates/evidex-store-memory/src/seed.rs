//! JSON seed format and its consistency checks.
//!
//! A seed is a snapshot handed over by the ingestion side: cases, the
//! evidence that references them, and optional search annotations keyed by
//! evidence id. Record-level invariants are already enforced when each
//! [`EvidenceRecord`] deserialises; this module checks the cross-references.

use std::collections::HashSet;

use evidex_core::{
  case::Case,
  evidence::{EvidenceId, EvidenceRecord},
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Search data for one record. Relevance lives here, never on the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAnnotation {
  pub evidence_id: EvidenceId,
  #[serde(default)]
  pub relevance:   Option<f64>,
  #[serde(default)]
  pub excerpt:     Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
  #[serde(default)]
  pub cases:    Vec<Case>,
  #[serde(default)]
  pub evidence: Vec<EvidenceRecord>,
  #[serde(default)]
  pub search:   Vec<SearchAnnotation>,
}

impl Seed {
  pub fn from_json(raw: &str) -> Result<Self> {
    let seed: Self = serde_json::from_str(raw)?;
    seed.check()?;
    Ok(seed)
  }

  /// Unique ids, evidence pointing at known cases, annotations pointing at
  /// known evidence, relevance inside [0, 1].
  pub fn check(&self) -> Result<()> {
    let mut case_ids = HashSet::new();
    for case in &self.cases {
      if !case_ids.insert(case.id.as_str()) {
        return Err(Error::DuplicateId(case.id.clone()));
      }
    }

    let mut evidence_ids = HashSet::new();
    for record in &self.evidence {
      if !evidence_ids.insert(&record.id) {
        return Err(Error::DuplicateId(record.id.to_string()));
      }
      if !case_ids.contains(record.case_ref.as_str()) {
        return Err(Error::InvalidSeed(format!(
          "{} references unknown case {}",
          record.id, record.case_ref
        )));
      }
    }

    for annotation in &self.search {
      if !evidence_ids.contains(&annotation.evidence_id) {
        return Err(Error::InvalidSeed(format!(
          "search annotation for unknown evidence {}",
          annotation.evidence_id
        )));
      }
      if let Some(r) = annotation.relevance
        && !(0.0..=1.0).contains(&r)
      {
        return Err(Error::InvalidSeed(format!(
          "relevance {r} for {} is outside [0, 1]",
          annotation.evidence_id
        )));
      }
    }
    Ok(())
  }
}
