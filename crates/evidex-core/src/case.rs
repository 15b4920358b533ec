//! Cases, the owners of evidence records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Where a case stands in the firm's workflow.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CaseStatus {
  Active,
  InProgress,
  Pending,
}

impl CaseStatus {
  /// Active and in-progress cases count as open work on the dashboard.
  pub fn is_open(self) -> bool { matches!(self, Self::Active | Self::InProgress) }
}

/// A legal matter. Evidence counts are derived from the records that point at
/// it, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
  pub id:          String,
  pub name:        String,
  pub status:      CaseStatus,
  pub created_at:  NaiveDate,
  #[serde(default)]
  pub next_review: Option<NaiveDate>,
}

/// Input to [`crate::repository::EvidenceRepository::add_case`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCase {
  pub name:        String,
  #[serde(default)]
  pub next_review: Option<NaiveDate>,
}

/// Filter for the case list: name substring plus optional status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseQuery {
  pub text:   Option<String>,
  pub status: Option<CaseStatus>,
}

impl CaseQuery {
  pub fn matches(&self, case: &Case) -> bool {
    let text_ok = match self.text.as_deref() {
      None | Some("") => true,
      Some(needle) => case.name.to_lowercase().contains(&needle.to_lowercase()),
    };
    text_ok && self.status.is_none_or(|s| s == case.status)
  }
}

/// Cases matching `query`, in input order.
pub fn filter_cases<'a>(cases: &'a [Case], query: &CaseQuery) -> Vec<&'a Case> {
  cases.iter().filter(|c| query.matches(c)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn case(id: &str, name: &str, status: CaseStatus) -> Case {
    Case {
      id: id.into(),
      name: name.into(),
      status,
      created_at: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
      next_review: None,
    }
  }

  #[test]
  fn name_search_is_case_insensitive() {
    let cases = vec![
      case("case-001", "Smith vs. Jones", CaseStatus::Active),
      case("case-002", "Johnson Estate Dispute", CaseStatus::Active),
    ];
    let q = CaseQuery {
      text:   Some("JONES".into()),
      status: None,
    };
    let hits = filter_cases(&cases, &q);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "case-001");
  }

  #[test]
  fn status_and_text_combine() {
    let cases = vec![
      case("case-003", "ABC Corp v. XYZ Inc", CaseStatus::InProgress),
      case("case-004", "Criminal State v. Davis", CaseStatus::Pending),
    ];
    let q = CaseQuery {
      text:   Some("v.".into()),
      status: Some(CaseStatus::Pending),
    };
    let hits = filter_cases(&cases, &q);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "case-004");
  }

  #[test]
  fn status_uses_kebab_case_on_the_wire() {
    assert_eq!(
      serde_json::to_string(&CaseStatus::InProgress).unwrap(),
      "\"in-progress\""
    );
    assert_eq!(
      "in-progress".parse::<CaseStatus>().unwrap(),
      CaseStatus::InProgress
    );
  }
}
