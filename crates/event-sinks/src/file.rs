//! File sink: newline-delimited JSON.

use crate::error::SinkError;
use crate::registry::SinkKind;
use crate::sink::Sink;
use async_trait::async_trait;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default buffer size for file writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Configuration for the file sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSinkConfig {
    /// Output file path.
    pub path: PathBuf,
    /// Append to an existing file instead of truncating it.
    pub append: bool,
}

impl FileSinkConfig {
    /// Create a config that truncates `path` on open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append: false,
        }
    }

    /// Append to the file instead of truncating it.
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }
}

/// Sink writing one serialized record per line.
///
/// The file is opened when the sink is built, so an unwritable path fails
/// before any record is produced.
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    lines_written: u64,
}

impl FileSink {
    /// Open the target file for writing.
    pub fn open(config: &FileSinkConfig) -> Result<Self, SinkError> {
        let mut options = OpenOptions::new();
        options.create(true);
        if config.append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        let file = options.open(&config.path).map_err(|source| SinkError::Open {
            path: config.path.clone(),
            source,
        })?;

        info!(
            "Writing events to '{}'{}",
            config.path.display(),
            if config.append { " (append)" } else { "" }
        );

        Ok(Self {
            path: config.path.clone(),
            writer: Some(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file)),
            lines_written: 0,
        })
    }

    /// Output file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records written so far.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }
}

#[async_trait]
impl Sink for FileSink {
    fn kind(&self) -> SinkKind {
        SinkKind::File
    }

    async fn emit(&mut self, record: &Value) -> Result<(), SinkError> {
        let writer = self.writer.as_mut().ok_or(SinkError::Closed)?;

        // Serialize first so a failed record never leaves a partial line behind
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        writer.write_all(&line)?;

        self.lines_written += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            debug!(
                "Closed '{}' after {} lines",
                self.path.display(),
                self.lines_written
            );
        }
        Ok(())
    }
}
