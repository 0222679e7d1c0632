//! The event receiver: one notification in, one status line out.

use std::sync::Arc;

use crate::notification::NotificationRecord;
use crate::sink::LogSink;

/// Writes the status line for each notification to its sink.
///
/// Holds no per-request state, so a single instance is shared by every
/// concurrently handled request.
#[derive(Clone)]
pub struct EventReceiver {
    sink: Arc<dyn LogSink>,
}

impl EventReceiver {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Writes exactly one line for `record`. Never fails.
    pub fn handle(&self, record: &NotificationRecord) {
        self.sink.write(&record.status_line());
    }
}
