//! Command-line interface for person-events
//!
//! # Usage Examples
//!
//! ```bash
//! # Ten events per second to the terminal until Ctrl-C
//! person-events --rate 10
//!
//! # Exactly 50 events to a newline-delimited file
//! person-events --count 50 --rate 50 --output file --output-path events.jsonl
//!
//! # Publish to Kafka, keyed by the event id
//! person-events --rate 100 --output kafka \
//!   --kafka-bootstrap-servers localhost:9092 --kafka-topic people
//!
//! # Kafka producer settings from a file
//! person-events --output kafka --kafka-config kafka.yaml
//! ```
//!
//! Logs go to stderr and honour `RUST_LOG`; events and statistics go to stdout.

use clap::Parser;
use person_events::cli::RunArgs;
use person_events::{EmissionEngine, RunOutcome, StatsReporter};
use person_generator::PersonGenerator;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "person-events")]
#[command(about = "Generate random person events at a sustained rate")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.run.to_run_config()?;
    info!(
        output = %config.sink_kind(),
        rate = config.rate,
        count = ?config.count,
        "Starting event generation"
    );

    let generator = match cli.run.seed {
        Some(seed) => {
            debug!("Using seed {}", seed);
            PersonGenerator::with_seed(seed)
        }
        None => PersonGenerator::new(),
    };
    let reporter = StatsReporter::new(&config, cli.run.report_style());

    let summary = EmissionEngine::new(config, generator)
        .with_reporter(reporter)
        .run()
        .await?;

    // Loop errors were already reported in the summary; the run itself ended cleanly.
    if let RunOutcome::Failed(e) = &summary.outcome {
        debug!("Run ended early: {}", e);
    }
    Ok(())
}
