//! Log sinks that receive one status line per notification.
//!
//! The receiver is handed a sink at construction time instead of writing to a
//! global logger directly, so tests can swap in [`MemorySink`] and read back
//! exactly what was written.

use std::sync::{Arc, Mutex};

/// Append-only destination for status lines.
///
/// Implementations are shared across concurrently handled requests.
pub trait LogSink: Send + Sync {
    fn write(&self, line: &str);
}

/// Writes each line as an `INFO` event through the process-wide `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, line: &str) {
        tracing::info!(target: "scheduler_events::notification", "{}", line);
    }
}

/// Keeps every written line in memory.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines written so far, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn write(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}
