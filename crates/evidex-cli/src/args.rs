//! Command-line arguments and their mapping onto API query strings.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use evidex_core::{
  case::CaseStatus,
  evidence::{AnalysisStatus, EvidenceKind},
  query::{ConfidenceBand, SortBy},
};

use crate::client::Pairs;

#[derive(Parser, Debug)]
#[command(name = "evidex", about = "Query an Evidex evidence server")]
pub struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE", global = true)]
  pub config: Option<PathBuf>,

  /// Base URL of the evidex server (default: http://localhost:8080).
  #[arg(long, env = "EVIDEX_URL", global = true)]
  pub url: Option<String>,

  /// API username.
  #[arg(long, env = "EVIDEX_USER", global = true)]
  pub user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "EVIDEX_PASSWORD", global = true, hide_env_values = true)]
  pub password: Option<String>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// List evidence records matching the filters.
  List(FilterArgs),
  /// Search evidence; results carry relevance and an excerpt.
  Search(FilterArgs),
  /// Show one evidence record and the case it belongs to.
  Show { id: String },
  /// Count matching records per kind, status, case and tag.
  Facets(FilterArgs),
  /// List cases, or show one when an id is given.
  Cases {
    id:     Option<String>,
    /// Case-insensitive substring of the case name.
    #[arg(long)]
    text:   Option<String>,
    #[arg(long)]
    status: Option<CaseStatus>,
  },
  /// Dashboard headline numbers.
  Stats,
}

/// Filters shared by `list`, `search` and `facets`.
#[derive(ClapArgs, Debug, Default)]
pub struct FilterArgs {
  /// Substring of the title (or excerpt, for search).
  #[arg(short, long)]
  pub text:       Option<String>,
  /// Evidence kinds, comma-separated.
  #[arg(short, long, value_delimiter = ',')]
  pub kind:       Vec<EvidenceKind>,
  /// Case id, or `all`.
  #[arg(long)]
  pub case:       Option<String>,
  /// Earliest upload date (YYYY-MM-DD).
  #[arg(long)]
  pub from:       Option<NaiveDate>,
  /// Latest upload date (YYYY-MM-DD).
  #[arg(long)]
  pub to:         Option<NaiveDate>,
  /// any, high, medium or low.
  #[arg(long)]
  pub confidence: Option<ConfidenceBand>,
  #[arg(long)]
  pub status:     Option<AnalysisStatus>,
  /// Required tags, comma-separated.
  #[arg(long, value_delimiter = ',')]
  pub tag:        Vec<String>,
  /// relevance, date_newest, date_oldest or confidence.
  #[arg(long)]
  pub sort:       Option<SortBy>,
  #[arg(long)]
  pub offset:     Option<usize>,
  #[arg(long)]
  pub limit:      Option<usize>,
}

impl FilterArgs {
  /// Encode the filters the way the server's query parameters expect them.
  /// Unset filters are omitted.
  pub fn query_pairs(&self) -> Pairs {
    let mut pairs = Pairs::new();
    let mut push = |key: &'static str, value: Option<String>| {
      if let Some(v) = value {
        pairs.push((key, v));
      }
    };

    push("text", self.text.clone());
    push("kinds", join(&self.kind));
    push("case", self.case.clone());
    push("date_from", self.from.map(|d| d.format("%Y-%m-%d").to_string()));
    push("date_to", self.to.map(|d| d.format("%Y-%m-%d").to_string()));
    push("confidence", self.confidence.map(|c| c.to_string()));
    push("status", self.status.map(|s| s.to_string()));
    push("tags", join(&self.tag));
    push("sort", self.sort.map(|s| s.to_string()));
    push("offset", self.offset.map(|o| o.to_string()));
    push("limit", self.limit.map(|l| l.to_string()));
    pairs
  }
}

fn join<T: ToString>(values: &[T]) -> Option<String> {
  (!values.is_empty()).then(|| {
    values
      .iter()
      .map(ToString::to_string)
      .collect::<Vec<_>>()
      .join(",")
  })
}

/// Query pairs for `GET /cases`.
pub fn case_pairs(text: Option<&str>, status: Option<CaseStatus>) -> Pairs {
  let mut pairs = Pairs::new();
  if let Some(t) = text {
    pairs.push(("text", t.to_owned()));
  }
  if let Some(s) = status {
    pairs.push(("status", s.to_string()));
  }
  pairs
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(argv: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("evidex").chain(argv.iter().copied())).unwrap()
  }

  #[test]
  fn no_filters_means_no_pairs() {
    assert!(FilterArgs::default().query_pairs().is_empty());
  }

  #[test]
  fn list_flags_map_to_query_parameters() {
    let args = parse(&[
      "list",
      "--kind",
      "document,video",
      "--case",
      "case-001",
      "--from",
      "2025-01-01",
      "--confidence",
      "high",
      "--sort",
      "date_newest",
      "--limit",
      "5",
    ]);
    let Command::List(filters) = args.command else {
      panic!("expected list");
    };
    assert_eq!(
      filters.query_pairs(),
      vec![
        ("kinds", "document,video".to_string()),
        ("case", "case-001".to_string()),
        ("date_from", "2025-01-01".to_string()),
        ("confidence", "high".to_string()),
        ("sort", "date_newest".to_string()),
        ("limit", "5".to_string()),
      ]
    );
  }

  #[test]
  fn repeated_tags_are_joined() {
    let args = parse(&["search", "--tag", "Witness", "--tag", "audio", "-t", "call"]);
    let Command::Search(filters) = args.command else {
      panic!("expected search");
    };
    assert_eq!(
      filters.query_pairs(),
      vec![
        ("text", "call".to_string()),
        ("tags", "Witness,audio".to_string()),
      ]
    );
  }

  #[test]
  fn unknown_kind_is_rejected_before_any_request() {
    let argv = ["evidex", "list", "--kind", "image"];
    assert!(Args::try_parse_from(argv).is_err());
  }

  #[test]
  fn case_status_uses_kebab_case() {
    let args = parse(&["cases", "--status", "in-progress"]);
    let Command::Cases { status, .. } = args.command else {
      panic!("expected cases");
    };
    assert_eq!(
      case_pairs(None, status),
      vec![("status", "in-progress".to_string())]
    );
  }
}
