//! Queue-driven enrichment for the Roster people directory.
//!
//! Raw name-only records arrive on a queue, are enriched from three external
//! lookup services, validated, and persisted. Anything that fails along the
//! way is forwarded to a dead-letter sink.
//!
//! - [`enrich`]: concurrent age / gender / nationality lookups.
//! - [`queue`]: message source and dead-letter sink abstractions.
//! - [`pipeline`]: the consumer loop tying them together.

#![allow(async_fn_in_trait)]

pub mod enrich;
pub mod error;
pub mod pipeline;
pub mod queue;

pub use enrich::{EnrichmentClient, EnrichmentConfig};
pub use error::{EnrichError, IngestError};
pub use pipeline::{Outcome, Pipeline, RunStats};
