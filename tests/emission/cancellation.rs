//! Stopping unbounded runs.

use crate::common::quiet_engine;
use event_sinks::{FileSinkConfig, SinkConfig};
use person_events::RunConfig;
use person_generator::PersonGenerator;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

/// A stop request ends an unbounded run within one pacing interval, closes the
/// file and reports exactly the number of lines written.
#[tokio::test(start_paused = true)]
async fn test_stop_closes_sink_and_reports_written_count() -> Result<(), Box<dyn std::error::Error>>
{
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("unbounded.jsonl");
    let config = RunConfig::new(
        20.0,
        None,
        5.0,
        SinkConfig::File(FileSinkConfig::new(&path)),
    )?;

    let (engine, output) = quiet_engine(config, PersonGenerator::with_seed(7));
    let stop = engine.stop_flag();
    let stopper = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(2_010)).await;
        stop.set()
    });

    let summary = engine.run().await?;
    assert!(stopper.await?);

    assert!(summary.outcome.is_interrupted());
    // Records at 0, 50ms, ..., 2000ms.
    assert_eq!(summary.total_emitted, 41);
    assert!(summary.elapsed < Duration::from_millis(2_010) + Duration::from_millis(50));

    let lines = fs::read_to_string(&path)?.lines().count() as u64;
    assert_eq!(lines, summary.total_emitted);

    let printed = output.text();
    assert!(printed.contains("Event generation interrupted.\nGenerated 41 events in "));

    Ok(())
}

/// Raising the flag before the run starts emits nothing but still summarises.
#[tokio::test(start_paused = true)]
async fn test_stop_before_start() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("never.jsonl");
    let config = RunConfig::new(
        5.0,
        None,
        5.0,
        SinkConfig::File(FileSinkConfig::new(&path)),
    )?;

    let (engine, output) = quiet_engine(config, PersonGenerator::with_seed(7));
    engine.stop_flag().set();
    let summary = engine.run().await?;

    assert_eq!(summary.total_emitted, 0);
    assert!(fs::read_to_string(&path)?.is_empty());
    assert!(output.text().contains("Generated 0 events"));
    Ok(())
}
