//! The evidence query engine.
//!
//! [`filter`] maps a slice of records and a [`QuerySpec`] to the ordered
//! subset that satisfies every active constraint. It borrows from its input,
//! performs no I/O and keeps no state between calls, so every view can share
//! one engine and pass its UI state in as a plain `QuerySpec`.
//!
//! Absent fields never constrain. Contradictory constraints (an inverted date
//! range, say) are not errors; they simply match nothing.

use std::{cmp::Ordering, collections::BTreeSet, convert::Infallible, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{
  Error, Result,
  evidence::{AnalysisStatus, EvidenceKind, EvidenceRecord, SearchHit},
};

/// Lower bound of the `high` confidence band.
pub const HIGH_CONFIDENCE: f64 = 0.8;
/// Lower bound of the `medium` confidence band.
pub const MEDIUM_CONFIDENCE: f64 = 0.6;

// ─── Filterable ──────────────────────────────────────────────────────────────

/// Anything the engine can filter: a bare record, or a record decorated with
/// search data.
pub trait Filterable {
  fn record(&self) -> &EvidenceRecord;

  /// Extra text matched by free-text queries, if any.
  fn excerpt(&self) -> Option<&str> { None }

  /// Query-time ranking score, if this item came from a search.
  fn relevance(&self) -> Option<f64> { None }
}

impl Filterable for EvidenceRecord {
  fn record(&self) -> &EvidenceRecord { self }
}

impl Filterable for SearchHit {
  fn record(&self) -> &EvidenceRecord { &self.record }

  fn excerpt(&self) -> Option<&str> { self.excerpt.as_deref() }

  fn relevance(&self) -> Option<f64> { self.relevance }
}

impl<T: Filterable + ?Sized> Filterable for &T {
  fn record(&self) -> &EvidenceRecord { (**self).record() }

  fn excerpt(&self) -> Option<&str> { (**self).excerpt() }

  fn relevance(&self) -> Option<f64> { (**self).relevance() }
}

// ─── Facet ───────────────────────────────────────────────────────────────────

/// A categorical constraint.
///
/// An empty selection means "no constraint", not "nothing allowed": an
/// unchecked set of checkboxes shows everything. [`Facet::from_selection`]
/// normalises an empty selection to [`Facet::Any`], and [`Facet::allows`]
/// treats a hand-built empty `OneOf` the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Facet<T: Ord> {
  Any,
  OneOf(BTreeSet<T>),
}

impl<T: Ord> Default for Facet<T> {
  fn default() -> Self { Self::Any }
}

impl<T: Ord> Facet<T> {
  pub fn from_selection(selection: impl IntoIterator<Item = T>) -> Self {
    let set: BTreeSet<T> = selection.into_iter().collect();
    if set.is_empty() { Self::Any } else { Self::OneOf(set) }
  }

  pub fn allows(&self, value: &T) -> bool {
    match self {
      Self::Any => true,
      Self::OneOf(set) => set.is_empty() || set.contains(value),
    }
  }

  pub fn is_any(&self) -> bool {
    match self {
      Self::Any => true,
      Self::OneOf(set) => set.is_empty(),
    }
  }
}

// ─── Case filter ─────────────────────────────────────────────────────────────

/// Single-valued case constraint. On the wire `"all"` (or an empty string)
/// is the unconstrained sentinel; anything else is an exact case id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CaseFilter {
  #[default]
  All,
  Only(String),
}

impl CaseFilter {
  pub fn allows(&self, case_ref: &str) -> bool {
    match self {
      Self::All => true,
      Self::Only(id) => id == case_ref,
    }
  }
}

impl FromStr for CaseFilter {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(match s.trim() {
      "" | "all" => Self::All,
      id => Self::Only(id.to_owned()),
    })
  }
}

impl fmt::Display for CaseFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str("all"),
      Self::Only(id) => f.write_str(id),
    }
  }
}

// ─── Confidence band ─────────────────────────────────────────────────────────

/// Named bucket over the confidence score.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
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
pub enum ConfidenceBand {
  #[default]
  Any,
  /// `c >= 0.8`
  High,
  /// `0.6 <= c < 0.8`
  Medium,
  /// `c < 0.6`
  Low,
}

impl ConfidenceBand {
  /// The band a score falls in; `None` for unscored records.
  pub fn of(confidence: Option<f64>) -> Option<Self> {
    let c = confidence?;
    Some(if c >= HIGH_CONFIDENCE {
      Self::High
    } else if c >= MEDIUM_CONFIDENCE {
      Self::Medium
    } else {
      Self::Low
    })
  }

  /// Records without a score only pass [`ConfidenceBand::Any`].
  pub fn contains(self, confidence: Option<f64>) -> bool {
    match (self, confidence) {
      (Self::Any, _) => true,
      (_, None) => false,
      (Self::High, Some(c)) => c >= HIGH_CONFIDENCE,
      (Self::Medium, Some(c)) => (MEDIUM_CONFIDENCE..HIGH_CONFIDENCE).contains(&c),
      (Self::Low, Some(c)) => c < MEDIUM_CONFIDENCE,
    }
  }
}

// ─── Sort ────────────────────────────────────────────────────────────────────

/// Result ordering. Without one the input order is kept.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SortBy {
  /// Highest relevance first; items without a score last.
  Relevance,
  DateNewest,
  DateOldest,
  /// Highest confidence first; unscored items last.
  Confidence,
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Parameters for [`filter`]. `QuerySpec::default()` matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
  /// Case-insensitive substring over the title and any excerpt.
  pub text:            Option<String>,
  pub kinds:           Facet<EvidenceKind>,
  pub case_ref:        CaseFilter,
  /// Inclusive lower bound on `uploaded_at`.
  pub date_from:       Option<NaiveDate>,
  /// Inclusive upper bound on `uploaded_at`.
  pub date_to:         Option<NaiveDate>,
  pub confidence_band: ConfidenceBand,
  pub status:          Option<AnalysisStatus>,
  /// Every tag listed must be on the record (ignoring case).
  pub tags:            Vec<String>,
  pub sort_by:         Option<SortBy>,
}

impl QuerySpec {
  /// Whether a single item satisfies every constraint.
  pub fn matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
    Matcher::new(self).matches(item)
  }

  fn date_range_is_empty(&self) -> bool {
    matches!((self.date_from, self.date_to), (Some(from), Some(to)) if from > to)
  }
}

/// Per-call matcher; lower-cases the needle once instead of once per record.
struct Matcher<'q> {
  query:  &'q QuerySpec,
  needle: Option<String>,
}

impl<'q> Matcher<'q> {
  fn new(query: &'q QuerySpec) -> Self {
    let needle = query
      .text
      .as_deref()
      .filter(|t| !t.is_empty())
      .map(str::to_lowercase);
    Self { query, needle }
  }

  fn matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
    let q = self.query;
    let r = item.record();

    q.kinds.allows(&r.kind)
      && q.case_ref.allows(&r.case_ref)
      && q.date_from.is_none_or(|from| r.uploaded_at >= from)
      && q.date_to.is_none_or(|to| r.uploaded_at <= to)
      && q.confidence_band.contains(r.confidence)
      && q.status.is_none_or(|s| s == r.status)
      && q.tags.iter().all(|t| r.has_tag(t))
      && self.text_matches(item)
  }

  fn text_matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
    let Some(needle) = &self.needle else {
      return true;
    };
    item.record().title.to_lowercase().contains(needle.as_str())
      || item
        .excerpt()
        .is_some_and(|e| e.to_lowercase().contains(needle.as_str()))
  }
}

/// Return the items of `items` matching `query`, in input order unless
/// `query.sort_by` is set. Sorting is stable.
pub fn filter<'a, T: Filterable>(items: &'a [T], query: &QuerySpec) -> Vec<&'a T> {
  if query.date_range_is_empty() {
    return Vec::new();
  }

  let matcher = Matcher::new(query);
  let mut out: Vec<&T> = items.iter().filter(|i| matcher.matches(*i)).collect();

  if let Some(sort) = query.sort_by {
    // `sort_by` is a stable merge sort; ties keep input order.
    out.sort_by(|a, b| compare(sort, *a, *b));
  }
  out
}

fn compare<T: Filterable + ?Sized>(sort: SortBy, a: &T, b: &T) -> Ordering {
  match sort {
    SortBy::Relevance => descending_scored(a.relevance(), b.relevance()),
    SortBy::DateNewest => b.record().uploaded_at.cmp(&a.record().uploaded_at),
    SortBy::DateOldest => a.record().uploaded_at.cmp(&b.record().uploaded_at),
    SortBy::Confidence => {
      descending_scored(a.record().confidence, b.record().confidence)
    }
  }
}

fn descending_scored(a: Option<f64>, b: Option<f64>) -> Ordering {
  match (a, b) {
    (Some(x), Some(y)) => y.total_cmp(&x),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse a comma-separated selection such as `document,video`. Blank entries
/// are skipped, so `""` yields an empty selection.
pub fn parse_selection<T: FromStr>(field: &'static str, raw: &str) -> Result<Vec<T>> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(|s| {
      s.parse().map_err(|_| Error::UnknownValue {
        field,
        value: s.to_owned(),
      })
    })
    .collect()
}

/// Parse a single enum-valued parameter, naming `field` on failure.
pub fn parse_value<T: FromStr>(field: &'static str, raw: &str) -> Result<T> {
  raw.trim().parse().map_err(|_| Error::UnknownValue {
    field,
    value: raw.to_owned(),
  })
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// Offset/limit window applied after filtering. Kept out of [`QuerySpec`] so
/// that filtering stays idempotent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
  pub offset: usize,
  pub limit:  Option<usize>,
}

impl Page {
  pub fn apply<T>(self, items: Vec<T>) -> Vec<T> {
    items
      .into_iter()
      .skip(self.offset)
      .take(self.limit.unwrap_or(usize::MAX))
      .collect()
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
