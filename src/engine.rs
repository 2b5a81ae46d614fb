//! The emission engine.
//!
//! One run moves through `Idle -> Running -> Draining -> Done`:
//!
//! ```text
//!   open sink ─► install signals ─► loop { stop? count? ─► next_record ─► emit
//!                                          ─► pace ─► maybe report }
//!                                        │
//!             (count reached, stop raised, emit/factory error, panic)
//!                                        ▼
//!   uninstall signals ─► close sink once ─► print summary
//! ```
//!
//! Everything runs sequentially on the caller's task. The only suspension
//! points are the sink calls and the pacing sleep, which wakes early when
//! the [`StopFlag`] is raised.

use crate::config::RunConfig;
use crate::rate::{Pace, RateController};
use crate::shutdown::{ShutdownCoordinator, StopFlag};
use crate::stats::{ReportStyle, RunStats, StatsReporter};
use event_sinks::{Sink, SinkError, SinkKind};
use futures::FutureExt;
use person_generator::{GeneratorError, RecordFactory};
use std::any::Any;
use std::fmt;
use std::io;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Errors raised by the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The sink could not be built; the run never started.
    #[error("Failed to open {kind} output: {error}")]
    Open { kind: SinkKind, error: SinkError },

    /// A record could not be written or published.
    #[error("Failed to emit record: {0}")]
    Emit(SinkError),

    #[error("{0}")]
    Factory(#[from] GeneratorError),

    /// The record factory or the sink panicked.
    #[error("Run loop panicked: {0}")]
    Panicked(String),
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The bounded count was reached.
    Completed,
    /// The stop flag was raised.
    Interrupted,
    /// The loop stopped on an error.
    Failed(EngineError),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, RunOutcome::Interrupted)
    }

    pub fn error(&self) -> Option<&EngineError> {
        match self {
            RunOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of one run, printed once the sink is closed.
#[derive(Debug)]
pub struct RunSummary {
    pub total_emitted: u64,
    pub elapsed: Duration,
    pub outcome: RunOutcome,
    /// Error returned by the final `close`, if any.
    pub close_error: Option<SinkError>,
}

impl RunSummary {
    /// Records per second over the whole run.
    pub fn achieved_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_emitted as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            RunOutcome::Completed => {}
            RunOutcome::Interrupted => writeln!(f, "Event generation interrupted.")?,
            RunOutcome::Failed(e) => writeln!(f, "Event generation stopped after an error: {e}")?,
        }
        writeln!(
            f,
            "Generated {} events in {:.2} seconds.",
            self.total_emitted,
            self.elapsed.as_secs_f64()
        )?;
        write!(f, "Actual rate: {:.2} events/second", self.achieved_rate())?;
        if let Some(e) = &self.close_error {
            write!(f, "\nOutput did not close cleanly: {e}")?;
        }
        Ok(())
    }
}

/// Drives a [`RecordFactory`] into a [`Sink`] at the configured rate.
pub struct EmissionEngine<F: RecordFactory> {
    config: RunConfig,
    factory: F,
    reporter: StatsReporter,
    coordinator: ShutdownCoordinator,
    stop: StopFlag,
}

impl<F: RecordFactory> EmissionEngine<F> {
    /// Engine reporting to stdout and listening for process signals.
    pub fn new(config: RunConfig, factory: F) -> Self {
        let reporter = StatsReporter::new(&config, ReportStyle::detect());
        Self {
            config,
            factory,
            reporter,
            coordinator: ShutdownCoordinator::default(),
            stop: StopFlag::new(),
        }
    }

    pub fn with_reporter(mut self, reporter: StatsReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_shutdown(mut self, coordinator: ShutdownCoordinator) -> Self {
        self.coordinator = coordinator;
        self
    }

    /// Handle for stopping the run from outside.
    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Open the configured sink and run until done.
    ///
    /// Fails only when the sink cannot be opened. Errors inside the loop are
    /// reported through [`RunSummary::outcome`].
    pub async fn run(self) -> Result<RunSummary, EngineError> {
        let kind = self.config.sink_kind();
        let sink = self
            .config
            .sink
            .clone()
            .open()
            .await
            .map_err(|error| EngineError::Open { kind, error })?;
        info!(output = %kind, "Output opened");

        Ok(self.run_with_sink(sink).await)
    }

    /// Run against an already opened sink. The sink is closed before returning.
    pub async fn run_with_sink(mut self, mut sink: Box<dyn Sink>) -> RunSummary {
        if sink.kind() == SinkKind::Terminal {
            self.reporter.suppress();
        }
        if sink.is_logging_only() {
            self.reporter.disable_redraw();
        }
        if let Err(e) = self.reporter.print_banner() {
            warn!("Failed to print banner: {}", e);
        }

        let start = Instant::now();
        let mut stats = RunStats::new(start);
        let pacer = RateController::starting_at(self.config.rate, start);
        let guard = self.coordinator.install(self.stop.clone());
        debug!(rate = self.config.rate, count = ?self.config.count, "Run started");

        let outcome = AssertUnwindSafe(self.emit_loop(sink.as_mut(), &mut stats, &pacer))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let message = panic_message(panic.as_ref());
                error!("Run loop panicked: {}", message);
                RunOutcome::Failed(EngineError::Panicked(message))
            });

        // Draining
        guard.uninstall();
        let close_error = match AssertUnwindSafe(sink.close()).catch_unwind().await {
            Ok(Ok(())) => None,
            Ok(Err(e)) => {
                error!("Failed to close output: {}", e);
                Some(e)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("Closing the output panicked: {}", message);
                Some(SinkError::Io(io::Error::other(format!(
                    "close panicked: {message}"
                ))))
            }
        };

        let summary = RunSummary {
            total_emitted: stats.total_emitted(),
            elapsed: start.elapsed(),
            outcome,
            close_error,
        };
        if let Err(e) = self.reporter.print_summary(&summary) {
            warn!("Failed to print summary: {}", e);
        }
        debug!(total = summary.total_emitted, "Run finished");
        summary
    }

    async fn emit_loop(
        &mut self,
        sink: &mut dyn Sink,
        stats: &mut RunStats,
        pacer: &RateController,
    ) -> RunOutcome {
        loop {
            if self.stop.is_set() {
                return RunOutcome::Interrupted;
            }
            if self.config.count.is_some_and(|count| stats.total_emitted() >= count) {
                return RunOutcome::Completed;
            }

            let record = match self.factory.next_record() {
                Ok(record) => record,
                Err(e) => {
                    error!("Record factory failed: {}", e);
                    return RunOutcome::Failed(e.into());
                }
            };

            if let Err(e) = sink.emit(&record).await {
                error!("Failed to emit record: {}", e);
                return RunOutcome::Failed(EngineError::Emit(e));
            }
            stats.record_emit();
            let emitted = stats.total_emitted();

            if self.config.count == Some(emitted) {
                return RunOutcome::Completed;
            }

            if pacer.pace(emitted, &self.stop).await == Pace::Interrupted {
                return RunOutcome::Interrupted;
            }

            let now = Instant::now();
            match self.reporter.maybe_report(stats, now) {
                Ok(true) => stats.mark_reported(now),
                Ok(false) => {}
                Err(e) => {
                    warn!("Failed to write statistics: {}", e);
                    stats.mark_reported(now);
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
