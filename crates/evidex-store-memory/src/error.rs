//! Error type for `evidex-store-memory`.

use evidex_core::{evidence::EvidenceId, repository::RepositoryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] evidex_core::Error),

  #[error("evidence not found: {0}")]
  EvidenceNotFound(EvidenceId),

  #[error("case not found: {0}")]
  CaseNotFound(String),

  #[error("duplicate id in seed: {0}")]
  DuplicateId(String),

  #[error("invalid seed: {0}")]
  InvalidSeed(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl RepositoryError for Error {
  fn domain(&self) -> Option<&evidex_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }

  fn is_not_found(&self) -> bool {
    matches!(self, Error::EvidenceNotFound(_) | Error::CaseNotFound(_))
  }
}
