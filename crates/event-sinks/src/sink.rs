//! The sink capability.

use crate::error::SinkError;
use crate::registry::SinkKind;
use async_trait::async_trait;
use serde_json::Value;

/// A destination that accepts emitted records and owns its resource lifecycle.
///
/// `close` must flush buffered writes before returning. Calling it more than
/// once is allowed; calls after the first do nothing and return `Ok(())`.
/// `emit` after `close` fails with [`SinkError::Closed`].
#[async_trait]
pub trait Sink: Send {
    /// The kind of destination this sink writes to.
    fn kind(&self) -> SinkKind;

    /// Whether records only go to the log instead of a real destination.
    fn is_logging_only(&self) -> bool {
        false
    }

    /// Write or publish one record.
    async fn emit(&mut self, record: &Value) -> Result<(), SinkError>;

    /// Flush and release the destination.
    async fn close(&mut self) -> Result<(), SinkError>;
}
