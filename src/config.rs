//! Run configuration and its validation.

use event_sinks::{SinkConfig, SinkError, SinkKind};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors detected before a run starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Rate must be greater than 0 (got {0})")]
    InvalidRate(f64),

    #[error("Stats interval must be greater than 0 seconds (got {0})")]
    InvalidStatsInterval(f64),

    #[error("{0}")]
    Sink(#[from] SinkError),
}

/// Immutable configuration for one engine run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Target rate in records per second.
    pub rate: f64,
    /// Total number of records, `None` for an unbounded run.
    pub count: Option<u64>,
    /// Wall-clock interval between statistics reports.
    pub stats_interval: Duration,
    /// Sink selection and sink-specific configuration.
    pub sink: SinkConfig,
}

impl RunConfig {
    /// Build and validate a run configuration.
    pub fn new(
        rate: f64,
        count: Option<u64>,
        stats_interval_secs: f64,
        sink: SinkConfig,
    ) -> Result<Self, ConfigError> {
        if !stats_interval_secs.is_finite() || stats_interval_secs <= 0.0 {
            return Err(ConfigError::InvalidStatsInterval(stats_interval_secs));
        }
        let stats_interval = Duration::try_from_secs_f64(stats_interval_secs)
            .map_err(|_| ConfigError::InvalidStatsInterval(stats_interval_secs))?;

        let config = Self {
            rate,
            count,
            stats_interval,
            sink,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check rate, interval and sink settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(ConfigError::InvalidRate(self.rate));
        }
        if self.stats_interval.is_zero() {
            return Err(ConfigError::InvalidStatsInterval(0.0));
        }
        self.sink.validate()?;
        Ok(())
    }

    /// Kind of the configured sink.
    pub fn sink_kind(&self) -> SinkKind {
        self.sink.kind()
    }

    /// Whether the run stops by itself after `count` records.
    pub fn is_bounded(&self) -> bool {
        self.count.is_some()
    }
}
