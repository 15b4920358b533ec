//! Evidence records, the unit the query engine filters.
//!
//! A record is created by ingestion in [`AnalysisStatus::Pending`] and only
//! ever moves forward through analysis. The confidence score is a product of
//! analysis, so it exists exactly when the record has been analyzed.

use std::{collections::BTreeSet, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{Error, Result};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Opaque, immutable evidence identifier (e.g. `ev-001`).
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EvidenceId(pub String);

impl fmt::Display for EvidenceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for EvidenceId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The media type of a piece of evidence. Closed set.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EvidenceKind {
  Document,
  Audio,
  Video,
}

// ─── Analysis status ─────────────────────────────────────────────────────────

/// Where a record is in the analysis pipeline. Declaration order is the
/// progression order; the derived `Ord` relies on it.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AnalysisStatus {
  Pending,
  Analyzing,
  Analyzed,
}

impl AnalysisStatus {
  /// Only strictly forward moves are allowed; skipping a stage is forward.
  pub fn can_advance_to(self, next: Self) -> bool { next > self }

  /// Pending and analyzing records are both awaiting a result.
  pub fn is_awaiting_analysis(self) -> bool { self != Self::Analyzed }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A single piece of evidence attached to a case.
///
/// Deserialisation goes through [`EvidenceRecord::validate`], so a record
/// obtained from JSON always satisfies the confidence invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvidenceRecord")]
pub struct EvidenceRecord {
  pub id:          EvidenceId,
  pub title:       String,
  pub kind:        EvidenceKind,
  /// Identifier of the owning case.
  pub case_ref:    String,
  pub uploaded_at: NaiveDate,
  pub status:      AnalysisStatus,
  /// Present only when `status` is [`AnalysisStatus::Analyzed`].
  pub confidence:  Option<f64>,
  pub tags:        BTreeSet<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub size_bytes:  Option<u64>,
}

impl EvidenceRecord {
  /// Build a freshly ingested record: pending, no confidence.
  pub fn ingested(id: EvidenceId, input: NewEvidence, uploaded_at: NaiveDate) -> Self {
    Self {
      id,
      title: input.title,
      kind: input.kind,
      case_ref: input.case_ref,
      uploaded_at,
      status: AnalysisStatus::Pending,
      confidence: None,
      tags: input.tags,
      size_bytes: input.size_bytes,
    }
  }

  /// Check the range and status invariants on `confidence`.
  pub fn validate(&self) -> Result<()> {
    if let Some(c) = self.confidence {
      check_unit_interval(c)?;
      if self.status != AnalysisStatus::Analyzed {
        return Err(Error::InvalidRecord(format!(
          "{} has a confidence score but is {}",
          self.id, self.status
        )));
      }
    }
    Ok(())
  }

  /// Apply an analysis status change, enforcing forward-only progression.
  ///
  /// Moving to `analyzed` requires a confidence; any other target must not
  /// carry one. On error the record is left untouched.
  pub fn advance(&mut self, update: StatusUpdate) -> Result<()> {
    if !self.status.can_advance_to(update.status) {
      return Err(Error::InvalidTransition {
        from: self.status,
        to:   update.status,
      });
    }
    match (update.status, update.confidence) {
      (AnalysisStatus::Analyzed, None) => return Err(Error::MissingConfidence),
      (AnalysisStatus::Analyzed, Some(c)) => check_unit_interval(c)?,
      (other, Some(_)) => {
        return Err(Error::InvalidRecord(format!(
          "confidence cannot be set while {other}"
        )));
      }
      (_, None) => {}
    }
    self.status = update.status;
    self.confidence = update.confidence;
    Ok(())
  }

  /// Whether `tag` is attached to this record, ignoring case.
  pub fn has_tag(&self, tag: &str) -> bool {
    self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
  }
}

pub(crate) fn check_unit_interval(value: f64) -> Result<()> {
  if (0.0..=1.0).contains(&value) {
    Ok(())
  } else {
    Err(Error::ConfidenceOutOfRange(value))
  }
}

/// Wire shape of [`EvidenceRecord`] before validation.
#[derive(Deserialize)]
struct RawEvidenceRecord {
  id:          EvidenceId,
  title:       String,
  kind:        EvidenceKind,
  case_ref:    String,
  uploaded_at: NaiveDate,
  status:      AnalysisStatus,
  #[serde(default)]
  confidence:  Option<f64>,
  #[serde(default)]
  tags:        BTreeSet<String>,
  #[serde(default)]
  size_bytes:  Option<u64>,
}

impl TryFrom<RawEvidenceRecord> for EvidenceRecord {
  type Error = Error;

  fn try_from(raw: RawEvidenceRecord) -> Result<Self> {
    let record = Self {
      id:          raw.id,
      title:       raw.title,
      kind:        raw.kind,
      case_ref:    raw.case_ref,
      uploaded_at: raw.uploaded_at,
      status:      raw.status,
      confidence:  raw.confidence,
      tags:        raw.tags,
      size_bytes:  raw.size_bytes,
    };
    record.validate()?;
    Ok(record)
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::repository::EvidenceRepository::ingest`].
/// The id, upload date and status are assigned by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvidence {
  pub title:      String,
  pub kind:       EvidenceKind,
  pub case_ref:   String,
  #[serde(default)]
  pub tags:       BTreeSet<String>,
  #[serde(default)]
  pub size_bytes: Option<u64>,
}

/// A status change reported by the analysis collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusUpdate {
  pub status:     AnalysisStatus,
  #[serde(default)]
  pub confidence: Option<f64>,
}

// ─── Search hits ─────────────────────────────────────────────────────────────

/// A record decorated with query-time search data. Neither `relevance` nor
/// `excerpt` is part of the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
  #[serde(flatten)]
  pub record:    EvidenceRecord,
  /// Ranking score in [0, 1] supplied by the search collaborator.
  pub relevance: Option<f64>,
  /// Body snippet; matched by free-text queries alongside the title.
  pub excerpt:   Option<String>,
}
