//! Kafka sink configuration and the broker configuration document.
//!
//! A document is a JSON (or YAML) object such as:
//!
//! ```json
//! {
//!   "bootstrap_servers": ["broker-1:9092", "broker-2:9092"],
//!   "topic": "person-events",
//!   "key_field": "id",
//!   "acks": "all",
//!   "linger_ms": 5,
//!   "security_protocol": "SASL_SSL"
//! }
//! ```
//!
//! Only the keys in [`PRODUCER_SETTINGS`] reach the producer; everything else
//! is ignored.

use crate::error::SinkError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default bootstrap servers.
pub const DEFAULT_BOOTSTRAP_SERVERS: &str = "localhost:9092";

/// Default topic.
pub const DEFAULT_TOPIC: &str = "events";

/// Default time allowed for the connectivity probe at construction.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default time allowed for flushing in-flight sends at close.
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(30);

/// Allow-listed document keys and the producer property each maps to.
pub const PRODUCER_SETTINGS: &[(&str, &str)] = &[
    ("retries", "retries"),
    ("batch_size", "batch.size"),
    ("linger_ms", "linger.ms"),
    ("compression_type", "compression.type"),
    ("acks", "acks"),
    ("client_id", "client.id"),
    ("request_timeout_ms", "request.timeout.ms"),
    ("message_timeout_ms", "message.timeout.ms"),
    (
        "max_in_flight_requests_per_connection",
        "max.in.flight.requests.per.connection",
    ),
    ("security_protocol", "security.protocol"),
    ("sasl_mechanism", "sasl.mechanisms"),
    ("sasl_plain_username", "sasl.username"),
    ("sasl_plain_password", "sasl.password"),
    ("ssl_cafile", "ssl.ca.location"),
    ("ssl_certfile", "ssl.certificate.location"),
    ("ssl_keyfile", "ssl.key.location"),
    ("ssl_password", "ssl.key.password"),
];

/// Resolve a document key to a producer property, if it is allow-listed.
///
/// Both the snake_case document spelling and the producer property name
/// itself are accepted.
pub fn producer_property(key: &str) -> Option<&'static str> {
    PRODUCER_SETTINGS
        .iter()
        .find(|(doc_key, property)| *doc_key == key || *property == key)
        .map(|(_, property)| *property)
}

/// Configuration for the Kafka sink.
#[derive(Debug, Clone, PartialEq)]
pub struct KafkaSinkConfig {
    /// Broker addresses.
    pub bootstrap_servers: Vec<String>,
    /// Topic to publish to.
    pub topic: String,
    /// Record field used as the message key.
    pub key_field: Option<String>,
    /// Producer properties taken from the allow-list.
    pub producer_settings: BTreeMap<String, String>,
    /// Time allowed for the connectivity probe at construction.
    pub probe_timeout: Duration,
    /// Time allowed for flushing in-flight sends at close.
    pub flush_timeout: Duration,
}

impl Default for KafkaSinkConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BOOTSTRAP_SERVERS, DEFAULT_TOPIC)
    }
}

impl KafkaSinkConfig {
    /// Create a config from inline parameters.
    ///
    /// `bootstrap_servers` is a comma-separated list of broker addresses.
    pub fn new(bootstrap_servers: &str, topic: impl Into<String>) -> Self {
        Self {
            bootstrap_servers: split_servers(bootstrap_servers),
            topic: topic.into(),
            key_field: None,
            producer_settings: BTreeMap::new(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
        }
    }

    /// Set the record field used as the message key.
    pub fn with_key_field(mut self, key_field: Option<String>) -> Self {
        self.key_field = key_field.filter(|k| !k.is_empty());
        self
    }

    /// Set the connectivity probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Comma-joined broker list, as the producer expects it.
    pub fn bootstrap_servers_joined(&self) -> String {
        self.bootstrap_servers.join(",")
    }

    /// Overlay a configuration document on top of this config.
    ///
    /// Values present in the document win over the inline ones.
    pub fn apply_document(mut self, document: &Value) -> Result<Self, SinkError> {
        let object = document.as_object().ok_or_else(|| {
            SinkError::InvalidConfig("broker configuration must be an object".to_string())
        })?;

        for (key, value) in object {
            match key.as_str() {
                "bootstrap_servers" | "bootstrap.servers" => {
                    self.bootstrap_servers = servers_from_value(value)?;
                }
                "topic" => {
                    self.topic = value
                        .as_str()
                        .ok_or_else(|| {
                            SinkError::InvalidConfig("'topic' must be a string".to_string())
                        })?
                        .to_string();
                }
                "key_field" => {
                    self.key_field = match value {
                        Value::Null => None,
                        Value::String(s) if s.is_empty() => None,
                        Value::String(s) => Some(s.clone()),
                        _ => {
                            return Err(SinkError::InvalidConfig(
                                "'key_field' must be a string".to_string(),
                            ))
                        }
                    };
                }
                _ => match (producer_property(key), scalar_to_string(value)) {
                    (Some(property), Some(value)) => {
                        self.producer_settings.insert(property.to_string(), value);
                    }
                    (Some(_), None) => {
                        debug!("Ignoring non-scalar value for producer setting '{key}'");
                    }
                    (None, _) => {
                        debug!("Ignoring unrecognized broker setting '{key}'");
                    }
                },
            }
        }

        Ok(self)
    }

    /// Load a configuration document from disk and overlay it on this config.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, anything else as JSON.
    pub fn apply_file(self, path: &Path) -> Result<Self, SinkError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SinkError::InvalidConfig(format!(
                "cannot read broker config {}: {e}",
                path.display()
            ))
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let document: Value = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content).map_err(|e| {
                SinkError::InvalidConfig(format!("bad broker config {}: {e}", path.display()))
            })?
        };

        self.apply_document(&document)
    }

    /// Check that the config names a topic and at least one broker.
    pub fn validate(&self) -> Result<(), SinkError> {
        if self.topic.trim().is_empty() {
            return Err(SinkError::InvalidConfig(
                "a topic is required for kafka output".to_string(),
            ));
        }
        if self.bootstrap_servers.is_empty() {
            return Err(SinkError::InvalidConfig(
                "at least one bootstrap server is required for kafka output".to_string(),
            ));
        }
        Ok(())
    }
}

fn split_servers(servers: &str) -> Vec<String> {
    servers
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn servers_from_value(value: &Value) -> Result<Vec<String>, SinkError> {
    match value {
        Value::String(s) => Ok(split_servers(s)),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(|s| s.trim().to_string()).ok_or_else(|| {
                    SinkError::InvalidConfig(
                        "'bootstrap_servers' entries must be strings".to_string(),
                    )
                })
            })
            .filter(|s| !matches!(s, Ok(s) if s.is_empty()))
            .collect(),
        _ => Err(SinkError::InvalidConfig(
            "'bootstrap_servers' must be a string or a list of strings".to_string(),
        )),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
