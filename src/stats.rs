//! Live throughput statistics.
//!
//! [`RunStats`] holds the counters the engine updates after each emit.
//! [`StatsReporter`] reads them on a wall-clock interval and renders a
//! fixed five-line block, redrawn in place when the output is a terminal.

use crate::config::RunConfig;
use crate::engine::RunSummary;
use chrono::Local;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tokio::time::Instant;
use tracing::debug;

/// Number of lines in a rendered statistics block.
pub const BLOCK_HEIGHT: usize = 5;

const BOLD: &str = "\x1b[1m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";
const CURSOR_UP_CLEAR: &str = "\x1b[1A\x1b[2K";

/// Counters for one run. Only the engine mutates them.
#[derive(Debug, Clone)]
pub struct RunStats {
    total_emitted: u64,
    run_start: Instant,
    last_report_time: Instant,
    last_report_count: u64,
}

impl RunStats {
    pub fn new(run_start: Instant) -> Self {
        Self {
            total_emitted: 0,
            run_start,
            last_report_time: run_start,
            last_report_count: 0,
        }
    }

    /// Count one successful emit.
    pub fn record_emit(&mut self) {
        self.total_emitted += 1;
    }

    /// Reset the reporting window after a report was rendered.
    pub fn mark_reported(&mut self, now: Instant) {
        self.last_report_time = now;
        self.last_report_count = self.total_emitted;
    }

    pub fn total_emitted(&self) -> u64 {
        self.total_emitted
    }

    pub fn run_start(&self) -> Instant {
        self.run_start
    }

    pub fn last_report_time(&self) -> Instant {
        self.last_report_time
    }

    pub fn last_report_count(&self) -> u64 {
        self.last_report_count
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.run_start)
    }

    /// Records per second since the last report.
    pub fn current_rate(&self, now: Instant) -> f64 {
        let window = now.saturating_duration_since(self.last_report_time).as_secs_f64();
        per_second(self.total_emitted - self.last_report_count, window)
    }

    /// Records per second since the run started.
    pub fn overall_rate(&self, now: Instant) -> f64 {
        per_second(self.total_emitted, self.elapsed(now).as_secs_f64())
    }
}

fn per_second(count: u64, secs: f64) -> f64 {
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

/// Presentation options for the statistics block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportStyle {
    /// Emit ANSI colour codes.
    pub color: bool,
    /// Overwrite the previous block instead of scrolling.
    pub redraw: bool,
}

impl ReportStyle {
    /// Colour and redraw when stdout is a terminal.
    pub fn detect() -> Self {
        let interactive = io::stdout().is_terminal();
        Self {
            color: interactive,
            redraw: interactive,
        }
    }

    /// No escape sequences at all.
    pub fn plain() -> Self {
        Self {
            color: false,
            redraw: false,
        }
    }

    fn paint(&self, code: &'static str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Samples the resident memory of the current process.
struct MemorySampler {
    system: System,
    pid: Option<Pid>,
}

impl MemorySampler {
    fn new() -> Self {
        Self {
            system: System::new(),
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    /// Resident memory in bytes, `None` where the platform does not expose it.
    fn sample(&mut self) -> Option<u64> {
        let pid = self.pid?;
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::new().with_memory(),
        );
        self.system.process(pid).map(|p| p.memory())
    }
}

/// Renders periodic statistics and the final summary.
pub struct StatsReporter {
    interval: Duration,
    target_rate: f64,
    target_count: Option<u64>,
    enabled: bool,
    style: ReportStyle,
    out: Box<dyn Write + Send>,
    rendered: bool,
    memory: MemorySampler,
}

impl StatsReporter {
    /// Reporter writing to stdout.
    pub fn new(config: &RunConfig, style: ReportStyle) -> Self {
        Self::with_output(config, style, Box::new(io::stdout()))
    }

    /// Reporter writing to an arbitrary writer.
    pub fn with_output(config: &RunConfig, style: ReportStyle, out: Box<dyn Write + Send>) -> Self {
        Self {
            interval: config.stats_interval,
            target_rate: config.rate,
            target_count: config.count,
            enabled: true,
            style,
            out,
            rendered: false,
            memory: MemorySampler::new(),
        }
    }

    /// Stop rendering periodic blocks. The final summary is still printed.
    pub fn suppress(&mut self) {
        if self.enabled {
            debug!("Periodic statistics suppressed");
        }
        self.enabled = false;
    }

    /// Print blocks sequentially even on a terminal.
    ///
    /// Used when other output shares the terminal, such as a sink that logs
    /// every record.
    pub fn disable_redraw(&mut self) {
        if self.style.redraw {
            debug!("In-place statistics redraw disabled");
        }
        self.style.redraw = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the reporting interval has elapsed.
    pub fn is_due(&self, stats: &RunStats, now: Instant) -> bool {
        now.saturating_duration_since(stats.last_report_time()) >= self.interval
    }

    /// Render a block if the interval has elapsed.
    ///
    /// Returns `true` when the interval had elapsed, so the caller resets the
    /// window even while rendering is suppressed.
    pub fn maybe_report(&mut self, stats: &RunStats, now: Instant) -> io::Result<bool> {
        if !self.is_due(stats, now) {
            return Ok(false);
        }
        if self.enabled {
            let block = self.render(stats, now);
            self.write_block(&block)?;
        }
        Ok(true)
    }

    /// Build the block lines without writing them.
    pub fn render(&mut self, stats: &RunStats, now: Instant) -> [String; BLOCK_HEIGHT] {
        let current = stats.current_rate(now);
        let overall = stats.overall_rate(now);
        let total = match self.target_count {
            Some(count) => format!("{}/{}", stats.total_emitted(), count),
            None => stats.total_emitted().to_string(),
        };
        let memory = match self.memory.sample() {
            Some(bytes) => format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0)),
            None => "n/a".to_string(),
        };

        let style = self.style;
        [
            style.paint(
                BOLD,
                &format!(
                    "=== Event statistics at {} ({:.1}s elapsed) ===",
                    Local::now().format("%H:%M:%S"),
                    stats.elapsed(now).as_secs_f64()
                ),
            ),
            format!(
                "Current rate: {} events/second ({:.1}% of target)",
                style.paint(GREEN, &format!("{current:.2}")),
                self.percent_of_target(current)
            ),
            format!(
                "Overall rate: {} events/second ({:.1}% of target)",
                style.paint(GREEN, &format!("{overall:.2}")),
                self.percent_of_target(overall)
            ),
            format!("Total events: {}", style.paint(CYAN, &total)),
            format!("Memory usage: {}", style.paint(YELLOW, &memory)),
        ]
    }

    fn percent_of_target(&self, rate: f64) -> f64 {
        rate / self.target_rate * 100.0
    }

    fn write_block(&mut self, block: &[String; BLOCK_HEIGHT]) -> io::Result<()> {
        if self.style.redraw && self.rendered {
            for _ in 0..BLOCK_HEIGHT {
                self.out.write_all(CURSOR_UP_CLEAR.as_bytes())?;
            }
            self.out.write_all(b"\r")?;
        }
        for line in block {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        self.rendered = true;
        Ok(())
    }

    /// Print the start banner.
    pub fn print_banner(&mut self) -> io::Result<()> {
        let count = match self.target_count {
            Some(count) => count.to_string(),
            None => "unbounded".to_string(),
        };
        writeln!(
            self.out,
            "Generating {} random person events at a rate of {} events/second...",
            count, self.target_rate
        )?;
        self.out.flush()
    }

    /// Print the final summary.
    pub fn print_summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        writeln!(self.out, "{summary}")?;
        self.out.flush()
    }
}
