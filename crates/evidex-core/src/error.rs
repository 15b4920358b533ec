//! Error types for `evidex-core`.

use thiserror::Error;

use crate::evidence::AnalysisStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown {field} value: {value:?}")]
  UnknownValue { field: &'static str, value: String },

  #[error("invalid evidence record: {0}")]
  InvalidRecord(String),

  #[error("cannot move evidence from {from} to {to}")]
  InvalidTransition {
    from: AnalysisStatus,
    to:   AnalysisStatus,
  },

  #[error("analyzed evidence requires a confidence score")]
  MissingConfidence,

  #[error("confidence {0} is outside [0, 1]")]
  ConfidenceOutOfRange(f64),

  #[error("unauthorized")]
  Unauthorized,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
