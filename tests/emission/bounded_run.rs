//! Bounded runs into the file sink.

use crate::common::{init_tracing, quiet_engine};
use event_sinks::{FileSinkConfig, SinkConfig};
use person_events::{EngineError, RunConfig};
use person_generator::{GeneratorError, PersonGenerator, RecordFactory};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const SEED: u64 = 42;

/// 50 events at 50/s: exactly 50 valid lines and a matching summary.
#[tokio::test]
async fn test_file_run_writes_exact_count() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("events.jsonl");
    let config = RunConfig::new(
        50.0,
        Some(50),
        5.0,
        SinkConfig::File(FileSinkConfig::new(&path)),
    )?;

    let (engine, output) = quiet_engine(config, PersonGenerator::with_seed(SEED));
    let summary = engine.run().await?;

    assert!(summary.outcome.is_completed());
    assert_eq!(summary.total_emitted, 50);
    assert!(summary.close_error.is_none());

    let content = fs::read_to_string(&path)?;
    assert!(content.ends_with('\n'));
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 50);
    for line in &lines {
        let record: Value = serde_json::from_str(line)?;
        assert!(record.get("id").is_some());
    }

    // 49 inter-record gaps of 20ms; generous upper bound for slow CI.
    let rate = summary.achieved_rate();
    assert!(rate > 25.0 && rate < 55.0, "achieved rate {rate}");

    let printed = output.text();
    assert!(printed.starts_with(
        "Generating 50 random person events at a rate of 50 events/second...\n"
    ));
    assert!(printed.contains("Generated 50 events in "));
    assert!(printed.contains("Actual rate: "));
    assert!(!printed.contains("interrupted"));

    Ok(())
}

/// Every line read back equals the record the factory produced.
#[tokio::test(start_paused = true)]
async fn test_file_round_trip_matches_factory() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("round_trip.jsonl");
    let config = RunConfig::new(
        1000.0,
        Some(25),
        5.0,
        SinkConfig::File(FileSinkConfig::new(&path)),
    )?;

    let produced = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let log = produced.clone();
    let mut generator = PersonGenerator::with_seed(SEED);
    let factory = move || {
        let record = generator.next_record()?;
        log.lock().unwrap().push(record.clone());
        Ok::<_, GeneratorError>(record)
    };

    let (engine, _output) = quiet_engine(config, factory);
    let summary = engine.run().await?;
    assert_eq!(summary.total_emitted, 25);

    let written: Vec<Value> = fs::read_to_string(&path)?
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(written, *produced.lock().unwrap());

    Ok(())
}

/// Appending keeps the lines of the previous run.
#[tokio::test(start_paused = true)]
async fn test_append_mode_accumulates() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("append.jsonl");

    for _ in 0..2 {
        let sink = SinkConfig::File(FileSinkConfig::new(&path).with_append(true));
        let config = RunConfig::new(100.0, Some(10), 5.0, sink)?;
        let (engine, _output) = quiet_engine(config, PersonGenerator::with_seed(SEED));
        engine.run().await?;
    }

    assert_eq!(fs::read_to_string(&path)?.lines().count(), 20);
    Ok(())
}

/// An unwritable path fails before the loop starts and emits nothing.
#[tokio::test]
async fn test_unwritable_path_fails_before_run() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("missing-dir").join("events.jsonl");
    let config = RunConfig::new(
        10.0,
        Some(5),
        5.0,
        SinkConfig::File(FileSinkConfig::new(&path)),
    )?;

    let (engine, output) = quiet_engine(config, PersonGenerator::with_seed(SEED));
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, EngineError::Open { .. }));
    assert!(output.text().is_empty());
    Ok(())
}
