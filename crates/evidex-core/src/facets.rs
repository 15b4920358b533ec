//! Facet counts and dashboard aggregates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{
  case::Case,
  evidence::{AnalysisStatus, EvidenceKind, EvidenceRecord},
  query::{ConfidenceBand, Filterable},
};

/// How many items fall under each facet value.
///
/// Every kind, status and specific confidence band is present, with zero
/// when nothing matches, so a view can render a stable set of checkboxes.
/// Tags are lower-cased. Unscored records are not counted in `bands`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCounts {
  pub total:    usize,
  pub kinds:    BTreeMap<EvidenceKind, usize>,
  pub statuses: BTreeMap<AnalysisStatus, usize>,
  pub bands:    BTreeMap<ConfidenceBand, usize>,
  pub cases:    BTreeMap<String, usize>,
  pub tags:     BTreeMap<String, usize>,
}

impl FacetCounts {
  pub fn tally<T: Filterable>(items: &[T]) -> Self {
    let mut counts = Self {
      total:    items.len(),
      kinds:    EvidenceKind::iter().map(|k| (k, 0)).collect(),
      statuses: AnalysisStatus::iter().map(|s| (s, 0)).collect(),
      bands:    ConfidenceBand::iter()
        .filter(|b| *b != ConfidenceBand::Any)
        .map(|b| (b, 0))
        .collect(),
      cases:    BTreeMap::new(),
      tags:     BTreeMap::new(),
    };
    for item in items {
      let r = item.record();
      *counts.kinds.entry(r.kind).or_default() += 1;
      *counts.statuses.entry(r.status).or_default() += 1;
      if let Some(band) = ConfidenceBand::of(r.confidence) {
        *counts.bands.entry(band).or_default() += 1;
      }
      *counts.cases.entry(r.case_ref.clone()).or_default() += 1;
      for tag in &r.tags {
        *counts.tags.entry(tag.to_lowercase()).or_default() += 1;
      }
    }
    counts
  }
}

/// Mean of the scores present, or `None` when there are none.
fn mean_confidence<'a>(records: impl IntoIterator<Item = &'a EvidenceRecord>) -> Option<f64> {
  let (sum, n) = records
    .into_iter()
    .filter_map(|r| r.confidence)
    .fold((0.0, 0usize), |(sum, n), c| (sum + c, n + 1));
  (n > 0).then(|| sum / n as f64)
}

/// A case together with the evidence records that reference it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSummary {
  #[serde(flatten)]
  pub case:            Case,
  pub evidence_count:  usize,
  /// Mean over the case's scored records.
  pub mean_confidence: Option<f64>,
}

impl CaseSummary {
  pub fn of(case: Case, records: &[EvidenceRecord]) -> Self {
    let own: Vec<&EvidenceRecord> =
      records.iter().filter(|r| r.case_ref == case.id).collect();
    Self {
      evidence_count: own.len(),
      mean_confidence: mean_confidence(own.iter().copied()),
      case,
    }
  }

  pub fn summarize(cases: &[&Case], records: &[EvidenceRecord]) -> Vec<Self> {
    cases
      .iter()
      .map(|case| Self::of((*case).clone(), records))
      .collect()
  }
}

/// Headline numbers for the dashboard landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
  pub open_cases:       usize,
  pub evidence_items:   usize,
  /// Pending plus analyzing.
  pub pending_analysis: usize,
  pub analyzed:         usize,
  /// Mean confidence over analyzed records that carry a score.
  pub mean_confidence:  Option<f64>,
}

impl DashboardStats {
  pub fn compute(cases: &[Case], records: &[EvidenceRecord]) -> Self {
    Self {
      open_cases: cases.iter().filter(|c| c.status.is_open()).count(),
      evidence_items: records.len(),
      pending_analysis: records
        .iter()
        .filter(|r| r.status.is_awaiting_analysis())
        .count(),
      analyzed: records
        .iter()
        .filter(|r| r.status == AnalysisStatus::Analyzed)
        .count(),
      mean_confidence: mean_confidence(records),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use chrono::NaiveDate;

  use super::*;
  use crate::case::CaseStatus;

  fn rec(id: &str, kind: EvidenceKind, case_ref: &str, confidence: Option<f64>, tags: &[&str]) -> EvidenceRecord {
    EvidenceRecord {
      id: id.into(),
      title: id.into(),
      kind,
      case_ref: case_ref.into(),
      uploaded_at: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
      status: if confidence.is_some() {
        AnalysisStatus::Analyzed
      } else {
        AnalysisStatus::Pending
      },
      confidence,
      tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
      size_bytes: None,
    }
  }

  fn case(id: &str, status: CaseStatus) -> Case {
    Case {
      id: id.into(),
      name: id.into(),
      status,
      created_at: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
      next_review: None,
    }
  }

  #[test]
  fn tally_reports_zero_for_absent_kinds() {
    let records = vec![
      rec("a", EvidenceKind::Document, "c1", None, &["Timeline"]),
      rec("b", EvidenceKind::Document, "c2", Some(0.9), &["timeline", "video"]),
    ];
    let counts = FacetCounts::tally(&records);
    assert_eq!(counts.total, 2);
    assert_eq!(counts.kinds[&EvidenceKind::Document], 2);
    assert_eq!(counts.kinds[&EvidenceKind::Audio], 0);
    assert_eq!(counts.statuses[&AnalysisStatus::Analyzing], 0);
    assert_eq!(counts.cases["c1"], 1);
    assert_eq!(counts.tags["timeline"], 2);
  }

  #[test]
  fn tally_buckets_scores_into_bands() {
    let records = vec![
      rec("a", EvidenceKind::Audio, "c1", Some(0.8), &[]),
      rec("b", EvidenceKind::Audio, "c1", Some(0.95), &[]),
      rec("c", EvidenceKind::Video, "c1", Some(0.6), &[]),
      rec("d", EvidenceKind::Video, "c2", None, &[]),
    ];
    let counts = FacetCounts::tally(&records);
    assert_eq!(counts.bands[&ConfidenceBand::High], 2);
    assert_eq!(counts.bands[&ConfidenceBand::Medium], 1);
    assert_eq!(counts.bands[&ConfidenceBand::Low], 0);
    assert!(!counts.bands.contains_key(&ConfidenceBand::Any));
  }

  #[test]
  fn dashboard_stats_count_open_cases_and_pending_work() {
    let cases = vec![
      case("c1", CaseStatus::Active),
      case("c2", CaseStatus::InProgress),
      case("c3", CaseStatus::Pending),
    ];
    let records = vec![
      rec("a", EvidenceKind::Audio, "c1", Some(0.9), &[]),
      rec("b", EvidenceKind::Video, "c1", Some(0.7), &[]),
      rec("c", EvidenceKind::Video, "c2", None, &[]),
    ];
    let stats = DashboardStats::compute(&cases, &records);
    assert_eq!(stats.open_cases, 2);
    assert_eq!(stats.evidence_items, 3);
    assert_eq!(stats.pending_analysis, 1);
    assert_eq!(stats.analyzed, 2);
    let mean = stats.mean_confidence.unwrap();
    assert!((mean - 0.8).abs() < 1e-9);
  }

  #[test]
  fn dashboard_stats_without_scores_have_no_mean() {
    let stats = DashboardStats::compute(&[], &[]);
    assert_eq!(stats.mean_confidence, None);
  }

  #[test]
  fn case_summary_counts_referencing_records() {
    let cases = [case("c1", CaseStatus::Active), case("c2", CaseStatus::Active)];
    let refs: Vec<&Case> = cases.iter().collect();
    let records = vec![
      rec("a", EvidenceKind::Audio, "c1", None, &[]),
      rec("b", EvidenceKind::Audio, "c1", None, &[]),
    ];
    let summaries = CaseSummary::summarize(&refs, &records);
    assert_eq!(summaries[0].evidence_count, 2);
    assert_eq!(summaries[1].evidence_count, 0);
  }

  #[test]
  fn case_summary_averages_scored_records_only() {
    let records = vec![
      rec("a", EvidenceKind::Audio, "c1", Some(0.9), &[]),
      rec("b", EvidenceKind::Audio, "c1", Some(0.6), &[]),
      rec("c", EvidenceKind::Audio, "c1", None, &[]),
      rec("d", EvidenceKind::Audio, "c2", Some(0.1), &[]),
    ];
    let summary = CaseSummary::of(case("c1", CaseStatus::Active), &records);
    assert_eq!(summary.evidence_count, 3);
    assert!((summary.mean_confidence.unwrap() - 0.75).abs() < 1e-9);

    let empty = CaseSummary::of(case("c3", CaseStatus::Pending), &records);
    assert_eq!(empty.mean_confidence, None);
  }
}
