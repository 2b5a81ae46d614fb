//! Synthetic person record factory for person-events.
//!
//! This crate provides the `RecordFactory` seam the emission engine pulls
//! records from, and `PersonGenerator`, the factory used by the CLI. Records
//! are plain `serde_json::Value` objects; the engine never looks inside them
//! except to pull a routing key for the broker sink.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ PersonGenerator  │
//! │                  │
//! │  - rng (StdRng)  │
//! │  - index         │
//! └────────┬─────────┘
//!          │ next_record()
//!          ▼
//!   { id, name, age, contactInfo, tags, metadata, timestamp }
//! ```
//!
//! # Example
//!
//! ```rust
//! use person_generator::{PersonGenerator, RecordFactory};
//!
//! let mut generator = PersonGenerator::with_seed(42);
//! let record = generator.next_record().unwrap();
//! assert!(record.get("id").is_some());
//! ```
//!
//! # Fields
//!
//! - `id` - `p` followed by four digits
//! - `name` - first and last name drawn from fixed pools
//! - `age` - integer in `18..=80`
//! - `contactInfo` - one of an email, phone or postal address contact
//! - `tags` - one to three distinct tags
//! - `metadata` - employee or contractor dates, optional status and update time
//! - `timestamp` - local wall-clock time of generation (ISO 8601)

pub mod generator;
pub mod generators;

// Re-exports for convenience
pub use generator::{GeneratorError, PersonGenerator, Record, RecordFactory};
