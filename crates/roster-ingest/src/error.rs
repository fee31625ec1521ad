//! Error types for `roster-ingest`.

use std::fmt;

use roster_core::{ServiceError, ValidationError};
use thiserror::Error;

/// Which upstream lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
  Age,
  Gender,
  Nationality,
}

impl fmt::Display for Lookup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Age => "age",
      Self::Gender => "gender",
      Self::Nationality => "nationality",
    })
  }
}

#[derive(Debug, Error)]
pub enum EnrichError {
  #[error("error getting {lookup} response: {source}")]
  UpstreamUnavailable {
    lookup: Lookup,
    source: reqwest::Error,
  },

  #[error("failed {lookup} response: status {status}")]
  UpstreamBadStatus {
    lookup: Lookup,
    status: reqwest::StatusCode,
  },

  #[error("error decoding {lookup} response: {source}")]
  UpstreamBadPayload {
    lookup: Lookup,
    source: serde_json::Error,
  },

  #[error("no nationality data available")]
  NoCandidate,

  #[error("failed to build http client: {0}")]
  Client(#[source] reqwest::Error),
}

impl EnrichError {
  /// The lookup that failed, if the failure is tied to one upstream.
  pub fn lookup(&self) -> Option<Lookup> {
    match self {
      Self::UpstreamUnavailable { lookup, .. }
      | Self::UpstreamBadStatus { lookup, .. }
      | Self::UpstreamBadPayload { lookup, .. } => Some(*lookup),
      Self::NoCandidate => Some(Lookup::Nationality),
      Self::Client(_) => None,
    }
  }
}

/// Why a queue message was dead-lettered. The display text becomes the prefix
/// of the dead-letter body.
#[derive(Debug, Error)]
pub enum IngestError {
  #[error("error decoding message: {0}")]
  Decode(#[from] serde_json::Error),

  #[error(transparent)]
  Enrich(#[from] EnrichError),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("error adding person to database: {0}")]
  Store(#[source] ServiceError),
}
