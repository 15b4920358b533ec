//! Query-string parameters shared by `/evidence`, `/search` and `/facets`.
//!
//! Everything arrives as text so that an untouched form field (`date_from=`)
//! reads as "unconstrained" instead of failing to deserialise. Multi-valued
//! facets are comma-separated.

use chrono::NaiveDate;
use evidex_core::{
  evidence::{AnalysisStatus, EvidenceKind},
  query::{
    CaseFilter, ConfidenceBand, Facet, Page, QuerySpec, SortBy, parse_selection,
    parse_value,
  },
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct QueryParams {
  /// Free-text filter over title (and excerpt, for `/search`). Surrounding
  /// whitespace is dropped.
  pub text:       Option<String>,
  /// Comma-separated kinds, e.g. `document,video`.
  pub kinds:      Option<String>,
  /// `all` or a case id.
  pub case:       Option<String>,
  /// `YYYY-MM-DD`, inclusive.
  pub date_from:  Option<String>,
  /// `YYYY-MM-DD`, inclusive.
  pub date_to:    Option<String>,
  /// `any|high|medium|low`
  pub confidence: Option<String>,
  pub status:     Option<String>,
  /// Comma-separated tags; all must be present.
  pub tags:       Option<String>,
  /// `relevance|date_newest|date_oldest|confidence`
  pub sort:       Option<String>,
  pub offset:     Option<usize>,
  pub limit:      Option<usize>,
}

/// A text parameter that the UI may send as an empty string.
fn present(v: &Option<String>) -> Option<&str> {
  v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ApiError> {
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .map_err(|_| ApiError::BadRequest(format!("{field} must be YYYY-MM-DD, got {raw:?}")))
}

impl QueryParams {
  pub fn to_query(&self) -> Result<(QuerySpec, Page), ApiError> {
    let kinds: Vec<EvidenceKind> = match present(&self.kinds) {
      Some(raw) => parse_selection("kind", raw)?,
      None => Vec::new(),
    };
    let tags: Vec<String> = match present(&self.tags) {
      Some(raw) => parse_selection("tag", raw)?,
      None => Vec::new(),
    };

    let spec = QuerySpec {
      text: present(&self.text).map(str::to_owned),
      kinds: Facet::from_selection(kinds),
      case_ref: present(&self.case)
        .map(|c| c.parse::<CaseFilter>().unwrap_or_default())
        .unwrap_or(CaseFilter::All),
      date_from: present(&self.date_from)
        .map(|d| parse_date("date_from", d))
        .transpose()?,
      date_to: present(&self.date_to)
        .map(|d| parse_date("date_to", d))
        .transpose()?,
      confidence_band: present(&self.confidence)
        .map(|c| parse_value::<ConfidenceBand>("confidence", c))
        .transpose()?
        .unwrap_or_default(),
      status: present(&self.status)
        .map(|s| parse_value::<AnalysisStatus>("status", s))
        .transpose()?,
      tags,
      sort_by: present(&self.sort)
        .map(|s| parse_value::<SortBy>("sort", s))
        .transpose()?,
    };
    let page = Page {
      offset: self.offset.unwrap_or(0),
      limit:  self.limit,
    };
    Ok((spec, page))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn untouched_form_fields_are_unconstrained() {
    let params = QueryParams {
      text: Some(String::new()),
      kinds: Some(String::new()),
      case: Some("all".into()),
      date_from: Some(String::new()),
      date_to: Some(" ".into()),
      ..Default::default()
    };
    let (spec, page) = params.to_query().unwrap();
    assert_eq!(spec, QuerySpec::default());
    assert_eq!(page, Page::default());
  }

  #[test]
  fn blank_text_is_unconstrained_and_text_is_trimmed() {
    let blank = QueryParams {
      text: Some("   ".into()),
      ..Default::default()
    };
    assert_eq!(blank.to_query().unwrap().0.text, None);

    let padded = QueryParams {
      text: Some(" smith ".into()),
      ..Default::default()
    };
    assert_eq!(padded.to_query().unwrap().0.text.as_deref(), Some("smith"));
  }

  #[test]
  fn populated_fields_map_onto_the_query() {
    let params = QueryParams {
      kinds: Some("document,audio".into()),
      case: Some("case-001".into()),
      date_from: Some("2025-01-01".into()),
      confidence: Some("medium".into()),
      status: Some("analyzed".into()),
      tags: Some("witness, timeline".into()),
      sort: Some("date_oldest".into()),
      limit: Some(5),
      ..Default::default()
    };
    let (spec, page) = params.to_query().unwrap();
    assert_eq!(
      spec.kinds,
      Facet::from_selection([EvidenceKind::Document, EvidenceKind::Audio])
    );
    assert_eq!(spec.case_ref, CaseFilter::Only("case-001".into()));
    assert_eq!(spec.date_from, NaiveDate::from_ymd_opt(2025, 1, 1));
    assert_eq!(spec.confidence_band, ConfidenceBand::Medium);
    assert_eq!(spec.status, Some(AnalysisStatus::Analyzed));
    assert_eq!(spec.tags, vec!["witness".to_string(), "timeline".to_string()]);
    assert_eq!(spec.sort_by, Some(SortBy::DateOldest));
    assert_eq!(page.limit, Some(5));
  }

  #[test]
  fn malformed_values_are_bad_requests() {
    for params in [
      QueryParams {
        kinds: Some("image".into()),
        ..Default::default()
      },
      QueryParams {
        date_to: Some("15/01/2025".into()),
        ..Default::default()
      },
      QueryParams {
        sort: Some("random".into()),
        ..Default::default()
      },
    ] {
      assert!(matches!(params.to_query(), Err(ApiError::BadRequest(_))));
    }
  }
}
