//! person-events library
//!
//! A rate-controlled emission engine: records pulled from a
//! [`RecordFactory`](person_generator::RecordFactory) are written to one
//! [`Sink`](event_sinks::Sink) at a sustained target rate, with live
//! throughput statistics and a cooperative shutdown on SIGINT/SIGTERM.
//!
//! # Components
//!
//! - [`rate::RateController`] - deadline-based pacing (`start + n / rate`)
//! - [`stats::StatsReporter`] - interval-driven throughput/memory block
//! - [`shutdown::ShutdownCoordinator`] - run-scoped signal listener setting a [`shutdown::StopFlag`]
//! - [`engine::EmissionEngine`] - the run loop tying the above together
//!
//! # CLI Usage
//!
//! ```bash
//! # 50 events at 50/s into a JSONL file
//! person-events --count 50 --rate 50 --output file --output-path events.jsonl
//!
//! # Unbounded stream to Kafka, keyed by the record id
//! person-events --rate 200 --output kafka \
//!   --kafka-bootstrap-servers localhost:9092 --kafka-topic people
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod rate;
pub mod shutdown;
pub mod stats;

pub use config::{ConfigError, RunConfig};
pub use engine::{EmissionEngine, EngineError, RunOutcome, RunSummary};
pub use rate::RateController;
pub use shutdown::{ShutdownCoordinator, SignalSource, StopFlag};
pub use stats::{ReportStyle, RunStats, StatsReporter};
