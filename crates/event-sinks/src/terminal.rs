//! Terminal sink: pretty-printed records on standard output.

use crate::error::SinkError;
use crate::registry::SinkKind;
use crate::sink::Sink;
use async_trait::async_trait;
use serde_json::Value;
use std::io::{Stdout, Write};

const SEPARATOR_WIDTH: usize = 40;

/// Sink that prints each record as indented JSON followed by a separator line.
pub struct TerminalSink<W = Stdout> {
    out: W,
}

impl TerminalSink<Stdout> {
    /// Create a sink writing to standard output.
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write + Send> TerminalSink<W> {
    /// Create a sink writing to an arbitrary writer.
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait]
impl<W: Write + Send> Sink for TerminalSink<W> {
    fn kind(&self) -> SinkKind {
        SinkKind::Terminal
    }

    async fn emit(&mut self, record: &Value) -> Result<(), SinkError> {
        let pretty = serde_json::to_string_pretty(record)?;
        writeln!(self.out, "{pretty}")?;
        writeln!(self.out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        self.out.flush()?;
        Ok(())
    }
}
