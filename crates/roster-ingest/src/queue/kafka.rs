//! Kafka adapters on [`rdkafka`].
//!
//! The consumer reads partition 0 of the fio topic starting at the newest
//! offset; partition assignment across replicas is out of scope.

use std::time::Duration;

use rdkafka::{
  ClientConfig, Message as _, Offset, TopicPartitionList,
  consumer::{Consumer as _, StreamConsumer},
  error::KafkaError,
  producer::{FutureProducer, FutureRecord},
};

use super::{DeadLetterSink, MessageSource, QueueConfig};

fn client_config(config: &QueueConfig) -> ClientConfig {
  let mut client = ClientConfig::new();
  client.set("bootstrap.servers", config.brokers.join(","));
  client
}

// ─── Source ──────────────────────────────────────────────────────────────────

pub struct KafkaSource {
  consumer: StreamConsumer,
}

impl KafkaSource {
  pub fn new(config: &QueueConfig) -> Result<Self, KafkaError> {
    let consumer: StreamConsumer = client_config(config)
      .set("group.id", &config.group_id)
      .set("enable.partition.eof", "false")
      .create()?;

    let mut assignment = TopicPartitionList::new();
    assignment.add_partition_offset(&config.fio_topic, 0, Offset::End)?;
    consumer.assign(&assignment)?;

    tracing::info!(topic = %config.fio_topic, "assigned kafka partition 0");
    Ok(Self { consumer })
  }
}

impl MessageSource for KafkaSource {
  type Error = KafkaError;

  async fn recv(&mut self) -> Option<Result<Vec<u8>, KafkaError>> {
    let delivery = self
      .consumer
      .recv()
      .await
      .map(|msg| msg.payload().map(<[u8]>::to_vec).unwrap_or_default());
    Some(delivery)
  }
}

// ─── Sink ────────────────────────────────────────────────────────────────────

pub struct KafkaSink {
  producer: FutureProducer,
  topic:    String,
  timeout:  Duration,
}

impl KafkaSink {
  pub fn new(config: &QueueConfig) -> Result<Self, KafkaError> {
    let producer: FutureProducer = client_config(config).set("acks", "all").create()?;
    Ok(Self {
      producer,
      topic: config.fio_failed_topic.clone(),
      timeout: Duration::from_secs(config.publish_timeout_secs),
    })
  }
}

impl DeadLetterSink for KafkaSink {
  type Error = KafkaError;

  async fn publish(&self, body: Vec<u8>) -> Result<(), KafkaError> {
    let record = FutureRecord::<(), _>::to(&self.topic).payload(&body);
    self
      .producer
      .send(record, self.timeout)
      .await
      .map(|_| ())
      .map_err(|(e, _)| e)
  }
}
