//! Error types for `roster-core`.

use thiserror::Error;

use crate::person::PersonId;

/// A component could not be built from its configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("invalid age bounds: min {min} is greater than max {max}")]
  InvertedAgeBounds { min: i64, max: i64 },

  #[error("invalid age bounds: {0} is outside the storable range 0..=255")]
  AgeBoundTooLarge(i64),
}

/// An error returned by [`PeopleService`](crate::service::PeopleService).
#[derive(Debug, Error)]
pub enum ServiceError {
  #[error("person {0} not found")]
  NotFound(PersonId),

  #[error("{0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ServiceError {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
