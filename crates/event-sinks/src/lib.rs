//! Record sinks for person-events.
//!
//! A sink owns exactly one destination resource and exposes two operations:
//! `emit` one record and `close` the destination. The engine holds the sink
//! as `Box<dyn Sink>` for the whole run and closes it exactly once.
//!
//! # Sink kinds
//!
//! | Kind       | Destination                          | `close`                       |
//! |------------|--------------------------------------|-------------------------------|
//! | `terminal` | pretty-printed JSON on stdout        | flush stdout                  |
//! | `file`     | newline-delimited JSON, one per line | flush and release the file    |
//! | `kafka`    | Kafka topic, optional message key    | flush in-flight sends         |
//!
//! Kinds are a closed enum ([`SinkKind`]) resolved once at startup through the
//! registration table in [`registry`].
//!
//! # Example
//!
//! ```rust,no_run
//! use event_sinks::{FileSinkConfig, SinkConfig};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), event_sinks::SinkError> {
//! let config = SinkConfig::File(FileSinkConfig::new("events.jsonl"));
//! let mut sink = config.open().await?;
//! sink.emit(&json!({"id": "p1234"})).await?;
//! sink.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod file;
pub mod kafka;
pub mod registry;
pub mod sink;
pub mod terminal;

// Re-exports for convenience
pub use error::SinkError;
pub use file::{FileSink, FileSinkConfig};
pub use kafka::{KafkaSink, KafkaSinkConfig};
pub use registry::{SinkConfig, SinkKind, SinkRegistration, REGISTRY};
pub use sink::Sink;
pub use terminal::TerminalSink;
