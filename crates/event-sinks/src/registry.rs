//! Sink kinds and their registration table.

use crate::error::SinkError;
use crate::file::{FileSink, FileSinkConfig};
use crate::kafka::{KafkaSink, KafkaSinkConfig};
use crate::sink::Sink;
use crate::terminal::TerminalSink;
use std::fmt;
use std::str::FromStr;

/// The closed set of sink kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Terminal,
    File,
    Kafka,
}

/// One entry of the registration table.
#[derive(Debug, Clone, Copy)]
pub struct SinkRegistration {
    pub kind: SinkKind,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

/// Every sink kind with the names it can be selected by.
pub const REGISTRY: &[SinkRegistration] = &[
    SinkRegistration {
        kind: SinkKind::Terminal,
        name: "terminal",
        aliases: &["stdout"],
        description: "Pretty-print records to standard output",
    },
    SinkRegistration {
        kind: SinkKind::File,
        name: "file",
        aliases: &["jsonl"],
        description: "Write newline-delimited JSON to --output-path",
    },
    SinkRegistration {
        kind: SinkKind::Kafka,
        name: "kafka",
        aliases: &["broker"],
        description: "Publish records to a Kafka topic",
    },
];

impl SinkKind {
    /// Look up a kind by its name or one of its aliases (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|r| {
                r.name.eq_ignore_ascii_case(name)
                    || r.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
            })
            .map(|r| r.kind)
    }

    /// The registration entry for this kind.
    pub fn registration(&self) -> &'static SinkRegistration {
        // Every variant has an entry; the fallback only guards table edits
        REGISTRY
            .iter()
            .find(|r| r.kind == *self)
            .unwrap_or(&REGISTRY[0])
    }

    /// Canonical name of this kind.
    pub fn name(&self) -> &'static str {
        self.registration().name
    }

    /// Canonical names of all registered kinds.
    pub fn names() -> Vec<&'static str> {
        REGISTRY.iter().map(|r| r.name).collect()
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            format!(
                "unknown output type: {s} (available: {})",
                Self::names().join(", ")
            )
        })
    }
}

/// Sink selection together with its kind-specific configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkConfig {
    Terminal,
    File(FileSinkConfig),
    Kafka(KafkaSinkConfig),
}

impl SinkConfig {
    /// Kind of sink this config builds.
    pub fn kind(&self) -> SinkKind {
        match self {
            SinkConfig::Terminal => SinkKind::Terminal,
            SinkConfig::File(_) => SinkKind::File,
            SinkConfig::Kafka(_) => SinkKind::Kafka,
        }
    }

    /// Check the kind-specific configuration without opening anything.
    pub fn validate(&self) -> Result<(), SinkError> {
        match self {
            SinkConfig::Terminal => Ok(()),
            SinkConfig::File(config) => {
                if config.path.as_os_str().is_empty() {
                    Err(SinkError::InvalidConfig(
                        "--output-path is required when using file output".to_string(),
                    ))
                } else {
                    Ok(())
                }
            }
            SinkConfig::Kafka(config) => config.validate(),
        }
    }

    /// Build the sink.
    ///
    /// File sinks fail if the file cannot be opened. Kafka sinks never fail
    /// on connectivity; they degrade to logging instead.
    pub async fn open(self) -> Result<Box<dyn Sink>, SinkError> {
        self.validate()?;

        match self {
            SinkConfig::Terminal => Ok(Box::new(TerminalSink::stdout())),
            SinkConfig::File(config) => Ok(Box::new(FileSink::open(&config)?)),
            SinkConfig::Kafka(config) => {
                let sink = run_blocking(move || KafkaSink::connect(config)).await?;
                Ok(Box::new(sink))
            }
        }
    }
}

/// Run a blocking constructor off the async executor.
async fn run_blocking<T, F>(f: F) -> Result<T, SinkError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SinkError::Io(std::io::Error::other(e)))
}
