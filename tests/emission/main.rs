//! Emission engine integration tests.
//!
//! These tests drive the public engine API end to end:
//! 1. Build a validated `RunConfig`
//! 2. Run the engine against a real sink (file, terminal writer, degraded Kafka)
//! 3. Check what reached the sink and what the summary and reporter printed
//!
//! Timing-sensitive tests run on a paused tokio clock so deadlines are exact.

mod bounded_run;
mod cancellation;
mod common;
mod kafka_degraded;
mod pacing;
mod suppression;
