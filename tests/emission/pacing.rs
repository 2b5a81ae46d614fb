//! Deadline pacing against a paused clock.

use crate::common::quiet_engine;
use async_trait::async_trait;
use event_sinks::{Sink, SinkConfig, SinkError, SinkKind};
use person_events::RunConfig;
use person_generator::PersonGenerator;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Records when each emit happened; optionally stalls on one record.
struct TimingSink {
    times: Arc<Mutex<Vec<Instant>>>,
    stall_at: Option<(usize, Duration)>,
}

#[async_trait]
impl Sink for TimingSink {
    fn kind(&self) -> SinkKind {
        SinkKind::File
    }

    async fn emit(&mut self, _record: &Value) -> Result<(), SinkError> {
        let index = {
            let mut times = self.times.lock().unwrap();
            times.push(Instant::now());
            times.len() - 1
        };
        if let Some((at, stall)) = self.stall_at {
            if at == index {
                tokio::time::sleep(stall).await;
            }
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

fn timing_sink(stall_at: Option<(usize, Duration)>) -> (Box<dyn Sink>, Arc<Mutex<Vec<Instant>>>) {
    let times = Arc::new(Mutex::new(Vec::new()));
    let sink = TimingSink {
        times: times.clone(),
        stall_at,
    };
    (Box::new(sink), times)
}

fn config(rate: f64, count: u64) -> RunConfig {
    RunConfig::new(rate, Some(count), 5.0, SinkConfig::Terminal).unwrap()
}

fn assert_near(actual: Duration, expected: Duration) {
    let diff = if actual > expected {
        actual - expected
    } else {
        expected - actual
    };
    assert!(
        diff <= Duration::from_millis(1),
        "expected {expected:?}, got {actual:?}"
    );
}

/// The k-th record goes out at start + k / r.
#[tokio::test(start_paused = true)]
async fn test_emissions_follow_deadlines() {
    let (sink, times) = timing_sink(None);
    let (engine, _output) = quiet_engine(config(10.0, 20), PersonGenerator::with_seed(1));

    let start = Instant::now();
    let summary = engine.run_with_sink(sink).await;

    let times = times.lock().unwrap();
    assert_eq!(times.len(), 20);
    for (k, at) in times.iter().enumerate() {
        assert_near(*at - start, Duration::from_millis(100 * k as u64));
    }
    assert_near(summary.elapsed, Duration::from_millis(1_900));
}

/// One slow emit does not shift later deadlines.
#[tokio::test(start_paused = true)]
async fn test_slow_emit_does_not_accumulate_drift() {
    let (sink, times) = timing_sink(Some((4, Duration::from_millis(250))));
    let (engine, _output) = quiet_engine(config(10.0, 20), PersonGenerator::with_seed(1));

    let start = Instant::now();
    let summary = engine.run_with_sink(sink).await;

    let times = times.lock().unwrap();
    // Record 4 stalls until 650ms; records 5 and 6 catch up without sleeping.
    assert_near(times[5] - start, Duration::from_millis(650));
    assert_near(times[6] - start, Duration::from_millis(650));
    for (k, at) in times.iter().enumerate().skip(7) {
        assert_near(*at - start, Duration::from_millis(100 * k as u64));
    }
    assert_near(summary.elapsed, Duration::from_millis(1_900));
}

/// A single-record run never sleeps.
#[tokio::test(start_paused = true)]
async fn test_single_record_has_no_sleep() {
    let (sink, _times) = timing_sink(None);
    let (engine, _output) = quiet_engine(config(0.5, 1), PersonGenerator::with_seed(1));

    let summary = engine.run_with_sink(sink).await;
    assert_eq!(summary.total_emitted, 1);
    assert_eq!(summary.elapsed, Duration::ZERO);
}
