//! Async HTTP client wrapping the evidex JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use evidex_core::{
  case::Case,
  evidence::{EvidenceRecord, SearchHit},
  facets::{CaseSummary, DashboardStats, FacetCounts},
};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

/// Connection settings for the evidex API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// One page of a server-side listing.
#[derive(Debug, Deserialize)]
pub struct Listing<T> {
  pub total: usize,
  pub items: Vec<T>,
}

/// Query-string pairs, as produced by [`crate::args::FilterArgs::query_pairs`].
pub type Pairs = Vec<(&'static str, String)>;

/// Async HTTP client for the evidex JSON REST API.
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  async fn get<T: DeserializeOwned>(&self, path: &str, query: &Pairs) -> Result<T> {
    tracing::debug!(path, ?query, "GET");
    let resp = self
      .auth(self.client.get(self.url(path)))
      .query(query)
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;

    let status = resp.status();
    if !status.is_success() {
      // The API reports failures as `{"error": "..."}`.
      let detail = resp
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_owned))
        .unwrap_or_default();
      return Err(anyhow!("GET {path} → {status} {detail}"));
    }
    resp
      .json()
      .await
      .with_context(|| format!("deserialising {path}"))
  }

  // ── Evidence ──────────────────────────────────────────────────────────────

  /// `GET /api/evidence`
  pub async fn list_evidence(&self, query: &Pairs) -> Result<Listing<EvidenceRecord>> {
    self.get("/evidence", query).await
  }

  /// `GET /api/evidence/{id}`
  pub async fn get_evidence(&self, id: &str) -> Result<EvidenceRecord> {
    self.get(&format!("/evidence/{id}"), &Pairs::new()).await
  }

  /// `GET /api/search`
  pub async fn search(&self, query: &Pairs) -> Result<Listing<SearchHit>> {
    self.get("/search", query).await
  }

  /// `GET /api/facets`
  pub async fn facets(&self, query: &Pairs) -> Result<FacetCounts> {
    self.get("/facets", query).await
  }

  // ── Cases ─────────────────────────────────────────────────────────────────

  /// `GET /api/cases`
  pub async fn list_cases(&self, query: &Pairs) -> Result<Vec<CaseSummary>> {
    self.get("/cases", query).await
  }

  /// `GET /api/cases/{id}`
  pub async fn get_case(&self, id: &str) -> Result<CaseSummary> {
    self.get(&format!("/cases/{id}"), &Pairs::new()).await
  }

  /// `GET /api/stats`
  pub async fn stats(&self) -> Result<DashboardStats> {
    self.get("/stats", &Pairs::new()).await
  }
}

/// Short label for a case, used when printing evidence rows.
pub fn case_label(case: &Case) -> String { format!("{} ({})", case.name, case.id) }
