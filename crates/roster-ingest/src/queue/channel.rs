//! In-process queue adapters backed by tokio mpsc channels.

use thiserror::Error;
use tokio::sync::mpsc;

use super::{DeadLetterSink, MessageSource};

/// A transport error injected through [`ChannelProducer::fail`].
#[derive(Debug, Clone, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

#[derive(Debug, Error)]
#[error("dead-letter receiver dropped")]
pub struct SinkClosed;

type Delivery = Result<Vec<u8>, TransportError>;

/// Sending half returned by [`channel`].
#[derive(Clone)]
pub struct ChannelProducer {
  tx: mpsc::Sender<Delivery>,
}

impl ChannelProducer {
  /// Returns `false` if the source has been dropped.
  pub async fn send(&self, payload: impl Into<Vec<u8>>) -> bool {
    self.tx.send(Ok(payload.into())).await.is_ok()
  }

  /// Deliver a transport error instead of a message.
  pub async fn fail(&self, reason: impl Into<String>) -> bool {
    self.tx.send(Err(TransportError(reason.into()))).await.is_ok()
  }
}

/// Receiving half returned by [`channel`]. Closes once every producer is
/// dropped.
pub struct ChannelSource {
  rx: mpsc::Receiver<Delivery>,
}

/// A bounded in-process queue.
pub fn channel(capacity: usize) -> (ChannelProducer, ChannelSource) {
  let (tx, rx) = mpsc::channel(capacity);
  (ChannelProducer { tx }, ChannelSource { rx })
}

impl MessageSource for ChannelSource {
  type Error = TransportError;

  async fn recv(&mut self) -> Option<Delivery> { self.rx.recv().await }
}

/// Dead-letter sink that forwards bodies to an unbounded receiver.
#[derive(Clone)]
pub struct ChannelSink {
  tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl ChannelSink {
  pub fn new() -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Self { tx }, rx)
  }
}

impl DeadLetterSink for ChannelSink {
  type Error = SinkClosed;

  async fn publish(&self, body: Vec<u8>) -> Result<(), SinkClosed> {
    self.tx.send(body).map_err(|_| SinkClosed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn source_yields_messages_errors_then_closes() {
    let (producer, mut source) = channel(4);
    assert!(producer.send(b"one".to_vec()).await);
    assert!(producer.fail("partition offline").await);
    drop(producer);

    assert_eq!(source.recv().await.unwrap().unwrap(), b"one");
    let err = source.recv().await.unwrap().unwrap_err();
    assert_eq!(err.to_string(), "transport error: partition offline");
    assert!(source.recv().await.is_none());
  }

  #[tokio::test]
  async fn sink_reports_dropped_receiver() {
    let (sink, rx) = ChannelSink::new();
    drop(rx);
    assert!(sink.publish(b"x".to_vec()).await.is_err());
  }
}
