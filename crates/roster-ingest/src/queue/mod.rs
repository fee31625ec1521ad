//! Message source and dead-letter sink abstractions.
//!
//! The pipeline consumes from one [`MessageSource`] and publishes failures to
//! one [`DeadLetterSink`]. Two adapters are provided:
//!
//! - [`channel`]: in-process tokio channels, for local runs and tests.
//! - `kafka` (feature `kafka`): a single-partition Kafka consumer and a
//!   producer for the failure topic.

use std::future::Future;

use serde::Deserialize;

pub mod channel;
#[cfg(feature = "kafka")]
pub mod kafka;

/// A stream of raw message payloads.
pub trait MessageSource: Send {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Wait for the next delivery.
  ///
  /// - `Some(Ok(payload))`: a message.
  /// - `Some(Err(e))`: a transport-level error; the source stays usable.
  /// - `None`: the source is closed and will yield nothing more.
  fn recv(&mut self) -> impl Future<Output = Option<Result<Vec<u8>, Self::Error>>> + Send + '_;
}

/// Terminal sink for messages the pipeline could not commit.
pub trait DeadLetterSink: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn publish(&self, body: Vec<u8>) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
  pub brokers:              Vec<String>,
  pub group_id:             String,
  /// Topic carrying raw name-only records.
  pub fio_topic:            String,
  /// Dead-letter topic.
  pub fio_failed_topic:     String,
  pub publish_timeout_secs: u64,
}

impl Default for QueueConfig {
  fn default() -> Self {
    Self {
      brokers:              vec!["localhost:9092".to_string()],
      group_id:             "roster".to_string(),
      fio_topic:            "fio".to_string(),
      fio_failed_topic:     "fio-failed".to_string(),
      publish_timeout_secs: 5,
    }
  }
}
