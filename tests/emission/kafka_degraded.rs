//! Kafka output without a reachable broker.

use crate::common::{capture_logs, quiet_engine};
use event_sinks::{KafkaSink, KafkaSinkConfig, SinkConfig};
use person_events::RunConfig;
use person_generator::PersonGenerator;
use std::time::Duration;

/// The logging fallback accepts every record and the count still advances.
#[tokio::test(start_paused = true)]
async fn test_logging_fallback_counts_records() {
    let (_logs_guard, logs) = capture_logs();

    let kafka = KafkaSinkConfig::new("127.0.0.1:1", "people");
    let config = RunConfig::new(50.0, Some(10), 5.0, SinkConfig::Kafka(kafka.clone())).unwrap();
    let (engine, output) = quiet_engine(config, PersonGenerator::with_seed(5));

    let summary = engine
        .run_with_sink(Box::new(KafkaSink::logging(kafka)))
        .await;

    assert!(summary.outcome.is_completed());
    assert_eq!(summary.total_emitted, 10);
    assert!(summary.close_error.is_none());
    assert!(output.text().contains("Generated 10 events"));
    assert_eq!(logs.text().matches("Would send to topic 'people'").count(), 10);
}

/// Opening against an unreachable endpoint degrades instead of failing.
#[tokio::test]
async fn test_unreachable_broker_degrades() -> Result<(), Box<dyn std::error::Error>> {
    let (_logs_guard, logs) = capture_logs();

    let kafka = KafkaSinkConfig::new("127.0.0.1:1", "people")
        .with_key_field(Some("id".to_string()))
        .with_probe_timeout(Duration::from_millis(500));
    let config = RunConfig::new(1000.0, Some(5), 5.0, SinkConfig::Kafka(kafka))?;
    let (engine, _output) = quiet_engine(config, PersonGenerator::with_seed(5));

    let summary = engine.run().await?;

    assert!(summary.outcome.is_completed());
    assert_eq!(summary.total_emitted, 5);
    assert_eq!(logs.text().matches("Would send to topic 'people'").count(), 5);
    Ok(())
}
