//! Kafka producer wrapper.

use super::config::KafkaSinkConfig;
use crate::error::SinkError;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::{debug, info};

/// Fire-and-forget producer: `send` enqueues, `flush` waits for delivery.
pub struct KafkaProducer {
    producer: FutureProducer,
}

impl KafkaProducer {
    /// Create a producer and check that the cluster answers a metadata request.
    ///
    /// The metadata request blocks for at most `config.probe_timeout`.
    pub fn connect(config: &KafkaSinkConfig) -> Result<Self, SinkError> {
        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", config.bootstrap_servers_joined())
            .set("message.timeout.ms", "30000")
            .set("queue.buffering.max.messages", "100000");

        for (property, value) in &config.producer_settings {
            client_config.set(property, value);
        }

        let producer: FutureProducer = client_config.create()?;

        let metadata = producer
            .client()
            .fetch_metadata(None, config.probe_timeout)?;
        info!(
            "Connected to Kafka cluster at {} ({} brokers)",
            config.bootstrap_servers_joined(),
            metadata.brokers().len()
        );

        Ok(Self { producer })
    }

    /// Enqueue one message without waiting for its acknowledgment.
    pub fn send(&self, topic: &str, key: Option<&str>, payload: &str) -> Result<(), SinkError> {
        let record: FutureRecord<'_, str, str> = FutureRecord::to(topic).payload(payload);
        let record = match key {
            Some(key) => record.key(key),
            None => record,
        };

        // The delivery future is dropped; delivery is confirmed by `flush`
        self.producer
            .send_result(record)
            .map(drop)
            .map_err(|(err, _)| SinkError::Kafka(err))
    }

    /// Wait for all in-flight messages to be delivered.
    pub fn flush(&self, timeout: Duration) -> Result<(), SinkError> {
        debug!("Flushing {} in-flight Kafka messages", self.producer.in_flight_count());
        self.producer.flush(timeout)?;
        Ok(())
    }
}
