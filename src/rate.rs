//! Deadline-based pacing.
//!
//! The deadline for the `n`-th record is `start + n / rate`, computed from the
//! fixed start time and the absolute count. A slow iteration only shortens the
//! following sleeps; it never pushes later deadlines back.

use crate::shutdown::StopFlag;
use std::time::Duration;
use tokio::time::Instant;

/// How a pacing sleep ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// The deadline was reached (or had already passed).
    OnTime,
    /// The stop flag was raised while sleeping.
    Interrupted,
}

/// Computes and enforces inter-record delays for a target rate.
#[derive(Debug, Clone)]
pub struct RateController {
    rate: f64,
    start: Instant,
}

impl RateController {
    /// Start pacing now.
    pub fn new(rate: f64) -> Self {
        Self::starting_at(rate, Instant::now())
    }

    /// Start pacing from a given instant.
    pub fn starting_at(rate: f64, start: Instant) -> Self {
        Self { rate, start }
    }

    /// Target rate in records per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Instant pacing started from.
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Deadline after `emitted` records, `None` if it lies beyond the clock's range.
    pub fn deadline(&self, emitted: u64) -> Option<Instant> {
        let offset = Duration::try_from_secs_f64(emitted as f64 / self.rate).ok()?;
        self.start.checked_add(offset)
    }

    /// Time left until the deadline after `emitted` records, zero if it has passed.
    pub fn delay(&self, emitted: u64, now: Instant) -> Duration {
        match self.deadline(emitted) {
            Some(deadline) => deadline.saturating_duration_since(now),
            None => Duration::MAX,
        }
    }

    /// Sleep until the deadline after `emitted` records, waking early if `stop` is raised.
    pub async fn pace(&self, emitted: u64, stop: &StopFlag) -> Pace {
        if stop.is_set() {
            return Pace::Interrupted;
        }

        let Some(deadline) = self.deadline(emitted) else {
            stop.wait().await;
            return Pace::Interrupted;
        };

        if deadline <= Instant::now() {
            return Pace::OnTime;
        }

        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => {
                if stop.is_set() { Pace::Interrupted } else { Pace::OnTime }
            }
            _ = stop.wait() => Pace::Interrupted,
        }
    }
}
