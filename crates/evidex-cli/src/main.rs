//! `evidex`: command-line client for the Evidex evidence server.
//!
//! # Usage
//!
//! ```
//! evidex --url http://localhost:8080 --user counsel --password secret list --kind audio
//! evidex --config ~/.config/evidex/config.toml search -t transcript --sort relevance
//! ```

mod args;
mod client;

use anyhow::{Context, Result};
use args::{Args, Command, case_pairs};
use clap::Parser;
use client::{ApiClient, ApiConfig, Listing, case_label};
use evidex_core::{
  evidence::{EvidenceRecord, SearchHit},
  facets::{CaseSummary, DashboardStats, FacetCounts},
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags (and their env vars) override the config file.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };

  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::List(filters) => {
      let listing = client.list_evidence(&filters.query_pairs()).await?;
      print_records(&listing);
    }
    Command::Search(filters) => {
      let hits = client.search(&filters.query_pairs()).await?;
      print_hits(&hits);
    }
    Command::Show { id } => {
      let record = client.get_evidence(&id).await?;
      let case = client.get_case(&record.case_ref).await?;
      print_record_detail(&record);
      println!("case:       {}", case_label(&case.case));
    }
    Command::Facets(filters) => {
      let counts = client.facets(&filters.query_pairs()).await?;
      print_facets(&counts);
    }
    Command::Cases { id: Some(id), .. } => {
      let summary = client.get_case(&id).await?;
      print_cases(std::slice::from_ref(&summary));
    }
    Command::Cases { id: None, text, status } => {
      let cases = client.list_cases(&case_pairs(text.as_deref(), status)).await?;
      print_cases(&cases);
    }
    Command::Stats => {
      let stats = client.stats().await?;
      print_stats(&stats);
    }
  }

  Ok(())
}

// ─── Output ───────────────────────────────────────────────────────────────────

fn confidence(c: Option<f64>) -> String {
  c.map(|c| format!("{:.0}%", c * 100.0))
    .unwrap_or_else(|| "-".to_string())
}

fn record_row(r: &EvidenceRecord) -> String {
  format!(
    "{:<8} {:<9} {:<10} {:<10} {:>5}  {}",
    r.id.to_string(),
    r.kind.to_string(),
    r.status.to_string(),
    r.uploaded_at.to_string(),
    confidence(r.confidence),
    r.title
  )
}

fn print_records(listing: &Listing<EvidenceRecord>) {
  for r in &listing.items {
    println!("{}", record_row(r));
  }
  println!("{} of {} records", listing.items.len(), listing.total);
}

fn print_hits(listing: &Listing<SearchHit>) {
  for hit in &listing.items {
    println!("{}", record_row(&hit.record));
    if let Some(relevance) = hit.relevance {
      println!("         relevance {}", confidence(Some(relevance)));
    }
    if let Some(excerpt) = &hit.excerpt {
      println!("         \"{excerpt}\"");
    }
  }
  println!("{} of {} hits", listing.items.len(), listing.total);
}

fn print_record_detail(r: &EvidenceRecord) {
  println!("id:         {}", r.id);
  println!("title:      {}", r.title);
  println!("kind:       {}", r.kind);
  println!("uploaded:   {}", r.uploaded_at);
  println!("status:     {}", r.status);
  println!("confidence: {}", confidence(r.confidence));
  if !r.tags.is_empty() {
    let tags: Vec<&str> = r.tags.iter().map(String::as_str).collect();
    println!("tags:       {}", tags.join(", "));
  }
  if let Some(size) = r.size_bytes {
    println!("size:       {size} bytes");
  }
}

fn print_facets(counts: &FacetCounts) {
  println!("total: {}", counts.total);
  println!("kinds:");
  for (kind, n) in &counts.kinds {
    println!("  {:<10} {n}", kind.to_string());
  }
  println!("statuses:");
  for (status, n) in &counts.statuses {
    println!("  {:<10} {n}", status.to_string());
  }
  println!("confidence:");
  for (band, n) in &counts.bands {
    println!("  {:<10} {n}", band.to_string());
  }
  println!("cases:");
  for (case, n) in &counts.cases {
    println!("  {case:<10} {n}");
  }
  if !counts.tags.is_empty() {
    println!("tags:");
    for (tag, n) in &counts.tags {
      println!("  {tag:<10} {n}");
    }
  }
}

fn print_cases(cases: &[CaseSummary]) {
  for s in cases {
    let review = s
      .case
      .next_review
      .map(|d| format!("  review {d}"))
      .unwrap_or_default();
    println!(
      "{:<9} {:<12} {:>3} items {:>5}  {}{review}",
      s.case.id,
      s.case.status.to_string(),
      s.evidence_count,
      confidence(s.mean_confidence),
      s.case.name
    );
  }
}

fn print_stats(stats: &DashboardStats) {
  println!("open cases:       {}", stats.open_cases);
  println!("evidence items:   {}", stats.evidence_items);
  println!("pending analysis: {}", stats.pending_analysis);
  println!("analyzed:         {}", stats.analyzed);
  println!("mean confidence:  {}", confidence(stats.mean_confidence));
}
