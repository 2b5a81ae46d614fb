//! Statistics reporting and its suppression for terminal output.

use crate::common::{quiet_engine, Capture};
use event_sinks::{FileSinkConfig, SinkConfig, TerminalSink};
use person_events::RunConfig;
use person_generator::PersonGenerator;
use tempfile::TempDir;

/// Terminal output never gets a statistics block, however short the interval.
#[tokio::test(start_paused = true)]
async fn test_terminal_sink_suppresses_reports() {
    let config = RunConfig::new(100.0, Some(30), 0.01, SinkConfig::Terminal).unwrap();
    let (engine, output) = quiet_engine(config, PersonGenerator::with_seed(3));

    let records = Capture::default();
    let sink = Box::new(TerminalSink::with_writer(records.clone()));
    let summary = engine.run_with_sink(sink).await;

    assert_eq!(summary.total_emitted, 30);
    assert_eq!(records.text().matches("\"contactInfo\"").count(), 30);

    let printed = output.text();
    assert!(!printed.contains("Event statistics"));
    assert!(printed.contains("Generated 30 events"));
}

/// File output gets periodic blocks on the configured interval.
#[tokio::test(start_paused = true)]
async fn test_file_sink_reports_on_interval() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("stats.jsonl");
    // 2.5 s of emission with a 1 s interval: two reports.
    let config = RunConfig::new(
        10.0,
        Some(26),
        1.0,
        SinkConfig::File(FileSinkConfig::new(&path)),
    )?;

    let (engine, output) = quiet_engine(config, PersonGenerator::with_seed(3));
    engine.run().await?;

    let printed = output.text();
    assert_eq!(printed.matches("Event statistics").count(), 2);
    assert!(printed.contains("Total events: 10/26"));
    assert!(printed.contains("Total events: 20/26"));
    assert!(printed.contains("Memory usage: "));
    Ok(())
}
