//! Error types for sinks.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building, writing to or closing a sink.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The destination file could not be opened.
    #[error("Cannot open output file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parse error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse error in a broker configuration document.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Kafka client error.
    #[cfg(feature = "kafka")]
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// Invalid sink configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The sink was already closed.
    #[error("Sink is closed")]
    Closed,
}

impl SinkError {
    /// Whether the error was caused by configuration rather than the destination.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            SinkError::Open { .. } | SinkError::InvalidConfig(_) | SinkError::Yaml(_)
        )
    }
}
