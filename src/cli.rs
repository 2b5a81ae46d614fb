//! CLI argument definitions.

use crate::config::{ConfigError, RunConfig};
use crate::stats::ReportStyle;
use clap::Args;
use event_sinks::kafka::config::{DEFAULT_BOOTSTRAP_SERVERS, DEFAULT_TOPIC};
use event_sinks::{FileSinkConfig, KafkaSinkConfig, SinkConfig, SinkKind};
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for one emission run.
#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Number of events to generate (runs until interrupted when omitted)
    #[arg(long, env = "EVENTS_COUNT")]
    pub count: Option<u64>,

    /// Number of events per second
    #[arg(
        long,
        env = "EVENTS_RATE",
        default_value = "1.0",
        allow_negative_numbers = true
    )]
    pub rate: f64,

    /// Output to write events to (terminal, file, kafka; "broker" is an alias of kafka)
    #[arg(long, env = "EVENTS_OUTPUT", default_value = "terminal", value_parser = parse_output)]
    pub output: SinkKind,

    /// Path for file output
    #[arg(long, env = "EVENTS_OUTPUT_PATH", value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Append to the output file instead of truncating it
    #[arg(long, env = "EVENTS_APPEND")]
    pub append: bool,

    /// Seconds between statistics reports
    #[arg(
        long,
        env = "EVENTS_STATS_INTERVAL",
        default_value = "5.0",
        allow_negative_numbers = true
    )]
    pub stats_interval: f64,

    /// Random seed for reproducible events
    #[arg(long, env = "EVENTS_SEED")]
    pub seed: Option<u64>,

    /// Disable coloured statistics
    #[arg(long, env = "EVENTS_NO_COLOR")]
    pub no_color: bool,

    #[command(flatten)]
    pub kafka: KafkaArgs,
}

/// Kafka output arguments.
#[derive(Args, Clone, Debug)]
pub struct KafkaArgs {
    /// Kafka configuration file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(long, env = "EVENTS_KAFKA_CONFIG", value_name = "PATH")]
    pub kafka_config: Option<PathBuf>,

    /// Kafka brokers (comma-separated, e.g., "localhost:9092")
    #[arg(long, env = "EVENTS_KAFKA_BOOTSTRAP_SERVERS", default_value = DEFAULT_BOOTSTRAP_SERVERS)]
    pub kafka_bootstrap_servers: String,

    /// Topic to publish events to
    #[arg(long, env = "EVENTS_KAFKA_TOPIC", default_value = DEFAULT_TOPIC)]
    pub kafka_topic: String,

    /// Event field used as the message key (empty string disables keys)
    #[arg(long, env = "EVENTS_KAFKA_KEY_FIELD", default_value = "id")]
    pub kafka_key_field: String,

    /// Milliseconds to wait for the cluster before falling back to logging
    #[arg(long, env = "EVENTS_KAFKA_PROBE_TIMEOUT_MS", default_value = "5000")]
    pub kafka_probe_timeout_ms: u64,
}

fn parse_output(value: &str) -> Result<SinkKind, String> {
    value.parse()
}

impl KafkaArgs {
    /// Build the Kafka sink config, overlaying the config file if one was given.
    pub fn to_config(&self) -> Result<KafkaSinkConfig, ConfigError> {
        let config = KafkaSinkConfig::new(&self.kafka_bootstrap_servers, self.kafka_topic.clone())
            .with_key_field(Some(self.kafka_key_field.clone()))
            .with_probe_timeout(Duration::from_millis(self.kafka_probe_timeout_ms));

        match &self.kafka_config {
            Some(path) => Ok(config.apply_file(path)?),
            None => Ok(config),
        }
    }
}

impl RunArgs {
    /// Sink configuration for the selected output.
    pub fn sink_config(&self) -> Result<SinkConfig, ConfigError> {
        match self.output {
            SinkKind::Terminal => Ok(SinkConfig::Terminal),
            SinkKind::File => {
                let path = self.output_path.clone().unwrap_or_default();
                Ok(SinkConfig::File(
                    FileSinkConfig::new(path).with_append(self.append),
                ))
            }
            SinkKind::Kafka => Ok(SinkConfig::Kafka(self.kafka.to_config()?)),
        }
    }

    /// Validated run configuration.
    pub fn to_run_config(&self) -> Result<RunConfig, ConfigError> {
        RunConfig::new(
            self.rate,
            self.count,
            self.stats_interval,
            self.sink_config()?,
        )
    }

    /// Statistics presentation for the current stdout.
    pub fn report_style(&self) -> ReportStyle {
        let mut style = ReportStyle::detect();
        if self.no_color {
            style.color = false;
        }
        style
    }
}
