//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::ingest::{source_for, NotificationSource};
use crate::receiver::EventReceiver;
use crate::sink::LogSink;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the application configuration, the notification source chosen for
/// the configured ingestion mode, and the receiver that writes status lines.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub source: Arc<dyn NotificationSource>,
    pub receiver: EventReceiver,
}

impl AppState {
    /// Creates a new application state writing status lines to `sink`.
    pub fn new(config: AppConfig, sink: Arc<dyn LogSink>) -> Self {
        let source = source_for(&config.ingest);
        Self {
            config: Arc::new(config),
            source,
            receiver: EventReceiver::new(sink),
        }
    }
}
