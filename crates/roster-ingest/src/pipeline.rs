//! The consumer loop: decode, enrich, validate, persist.
//!
//! Every message ends in exactly one of two states. It is either committed to
//! the store or published once to the dead-letter sink, never both. Messages
//! are processed one at a time in delivery order.
//!
//! Dead-letter bodies are `"<error text>: "` followed by the raw payload
//! bytes. A failed dead-letter publish is logged and the message is dropped.

use std::sync::Arc;

use roster_core::{
  PeopleService,
  cache::ListingCache,
  person::{Person, PersonDraft},
  store::PersonStore,
  validate::Validator,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
  enrich::EnrichmentClient,
  error::IngestError,
  queue::{DeadLetterSink, MessageSource},
};

/// What happened to one message.
#[derive(Debug)]
pub enum Outcome {
  Committed(Person),
  DeadLettered(IngestError),
}

/// Counters reported when [`Pipeline::run`] returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
  pub committed:        u64,
  pub dead_lettered:    u64,
  pub transport_errors: u64,
}

pub struct Pipeline<S, C, D> {
  enricher:  EnrichmentClient,
  validator: Arc<Validator>,
  service:   PeopleService<S, C>,
  sink:      D,
}

impl<S, C, D> Pipeline<S, C, D>
where
  S: PersonStore,
  C: ListingCache,
  D: DeadLetterSink,
{
  pub fn new(
    enricher:  EnrichmentClient,
    validator: Arc<Validator>,
    service:   PeopleService<S, C>,
    sink:      D,
  ) -> Self {
    Self { enricher, validator, service, sink }
  }

  /// Consume `source` until it closes or `shutdown` fires.
  ///
  /// Cancellation is only observed between messages; a message already being
  /// processed runs to completion.
  pub async fn run<M: MessageSource>(&self, mut source: M, shutdown: CancellationToken) -> RunStats {
    let mut stats = RunStats::default();
    loop {
      let delivery = tokio::select! {
        biased;
        _ = shutdown.cancelled() => {
          info!("ingestion pipeline shutting down");
          break;
        }
        delivery = source.recv() => delivery,
      };

      match delivery {
        None => {
          info!("message source closed");
          break;
        }
        Some(Err(e)) => {
          stats.transport_errors += 1;
          error!(error = %e, "error receiving message");
        }
        Some(Ok(payload)) => {
          info!(bytes = payload.len(), "received message");
          match self.process(&payload).await {
            Outcome::Committed(_) => stats.committed += 1,
            Outcome::DeadLettered(_) => stats.dead_lettered += 1,
          }
        }
      }
    }
    stats
  }

  /// Drive one payload to its terminal state.
  pub async fn process(&self, payload: &[u8]) -> Outcome {
    match self.commit(payload).await {
      Ok(person) => {
        info!(id = %person.id, name = %person.name, "person added");
        Outcome::Committed(person)
      }
      Err(err) => {
        let lookup = match &err {
          IngestError::Enrich(e) => e.lookup(),
          _ => None,
        };
        warn!(error = %err, lookup = ?lookup, "dead-lettering message");
        if let Err(e) = self.sink.publish(dead_letter_body(&err, payload)).await {
          error!(error = %e, "error publishing to dead-letter sink");
        }
        Outcome::DeadLettered(err)
      }
    }
  }

  async fn commit(&self, payload: &[u8]) -> Result<Person, IngestError> {
    let mut draft: PersonDraft = serde_json::from_slice(payload)?;
    self.enricher.enrich(&mut draft).await?;
    debug!(?draft, "enriched draft");

    let person = self.validator.validate(&draft)?;
    self.service.create(person).await.map_err(IngestError::Store)
  }
}

/// `"<err>: <payload>"`, with the payload copied byte for byte.
pub fn dead_letter_body(err: &IngestError, payload: &[u8]) -> Vec<u8> {
  let mut body = format!("{err}: ").into_bytes();
  body.extend_from_slice(payload);
  body
}
