//! Person record generator.

use crate::generators::{contact, identity, metadata};
use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

/// An opaque, serializable record produced by a [`RecordFactory`].
pub type Record = Value;

/// Error type for record factories.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The factory could not produce a record
    #[error("Record factory failed: {0}")]
    Failed(String),
}

/// Produces one record per call.
///
/// Implementations carry no state that matters to pacing; the engine calls
/// `next_record` exactly once per loop iteration.
pub trait RecordFactory: Send {
    /// Produce the next record.
    fn next_record(&mut self) -> Result<Record, GeneratorError>;
}

impl<F> RecordFactory for F
where
    F: FnMut() -> Result<Record, GeneratorError> + Send,
{
    fn next_record(&mut self) -> Result<Record, GeneratorError> {
        self()
    }
}

/// Generator of random person records.
///
/// With [`PersonGenerator::with_seed`] every field except `timestamp` (and the
/// dates relative to today) is reproducible across runs.
pub struct PersonGenerator {
    /// Random number generator, seeded or drawn from the OS
    rng: StdRng,
    /// Number of records generated so far
    index: u64,
}

impl PersonGenerator {
    /// Create a generator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            index: 0,
        }
    }

    /// Create a generator with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            index: 0,
        }
    }

    /// Number of records generated so far.
    pub fn current_index(&self) -> u64 {
        self.index
    }

    /// Generate one person record.
    pub fn generate_person(&mut self) -> Record {
        let now = Local::now().naive_local();
        let rng = &mut self.rng;

        let record = json!({
            "id": identity::generate_id(rng),
            "name": identity::generate_name(rng),
            "age": identity::generate_age(rng),
            "contactInfo": contact::generate_contact_info(rng),
            "tags": identity::generate_tags(rng),
            "metadata": metadata::generate_metadata(rng, now),
            "timestamp": now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        });

        self.index += 1;
        record
    }
}

impl Default for PersonGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordFactory for PersonGenerator {
    fn next_record(&mut self) -> Result<Record, GeneratorError> {
        Ok(self.generate_person())
    }
}
