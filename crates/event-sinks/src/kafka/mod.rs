//! Kafka sink.
//!
//! Records are published as JSON with an optional message key taken from one
//! record field. Publishing does not wait for acknowledgments; `close` flushes
//! everything still in flight.
//!
//! When the producer cannot be built (the crate was compiled without the
//! `kafka` feature, or the cluster did not answer the connectivity probe) the
//! sink degrades to logging what it would have sent instead of failing the run.

pub mod config;
#[cfg(feature = "kafka")]
pub mod producer;

pub use config::KafkaSinkConfig;

use crate::error::SinkError;
use crate::registry::SinkKind;
use crate::sink::Sink;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

enum Publisher {
    #[cfg(feature = "kafka")]
    Connected(producer::KafkaProducer),
    Logging,
}

/// Sink publishing records to a Kafka topic.
pub struct KafkaSink {
    config: KafkaSinkConfig,
    publisher: Publisher,
    closed: bool,
}

impl KafkaSink {
    /// Build the sink, degrading to the logging no-op if no producer can be created.
    ///
    /// The connectivity probe blocks, so this runs on the blocking pool when
    /// called from [`crate::SinkConfig::open`].
    pub fn connect(config: KafkaSinkConfig) -> Self {
        let publisher = Self::build_publisher(&config);
        Self {
            config,
            publisher,
            closed: false,
        }
    }

    /// Build a sink that only logs what it would send.
    pub fn logging(config: KafkaSinkConfig) -> Self {
        Self {
            config,
            publisher: Publisher::Logging,
            closed: false,
        }
    }

    #[cfg(feature = "kafka")]
    fn build_publisher(config: &KafkaSinkConfig) -> Publisher {
        match producer::KafkaProducer::connect(config) {
            Ok(producer) => Publisher::Connected(producer),
            Err(e) => {
                warn!(
                    "Kafka unavailable at {} ({e}); events will be logged instead of sent",
                    config.bootstrap_servers_joined()
                );
                Publisher::Logging
            }
        }
    }

    #[cfg(not(feature = "kafka"))]
    fn build_publisher(_config: &KafkaSinkConfig) -> Publisher {
        warn!("Built without Kafka support; events will be logged instead of sent");
        Publisher::Logging
    }

    /// Whether the sink fell back to logging.
    pub fn is_degraded(&self) -> bool {
        matches!(self.publisher, Publisher::Logging)
    }

    /// The sink configuration.
    pub fn config(&self) -> &KafkaSinkConfig {
        &self.config
    }
}

/// Extract the message key from `record`.
///
/// A missing or null field yields no key; non-string values use their JSON text.
pub fn extract_key(record: &Value, key_field: Option<&str>) -> Option<String> {
    match record.get(key_field?)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl Sink for KafkaSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Kafka
    }

    fn is_logging_only(&self) -> bool {
        self.is_degraded()
    }

    async fn emit(&mut self, record: &Value) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }

        let payload = serde_json::to_string(record)?;
        match &self.publisher {
            #[cfg(feature = "kafka")]
            Publisher::Connected(producer) => {
                let key = extract_key(record, self.config.key_field.as_deref());
                producer.send(&self.config.topic, key.as_deref(), &payload)
            }
            Publisher::Logging => {
                info!(
                    topic = %self.config.topic,
                    "[Kafka Output] Would send to topic '{}': {}",
                    self.config.topic,
                    payload
                );
                Ok(())
            }
        }
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        match &self.publisher {
            #[cfg(feature = "kafka")]
            Publisher::Connected(producer) => producer.flush(self.config.flush_timeout),
            Publisher::Logging => Ok(()),
        }
    }
}
