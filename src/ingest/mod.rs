//! Notification extraction.
//!
//! A [`NotificationSource`] turns one inbound request into a
//! [`NotificationRecord`]. Two sources exist and exactly one is chosen at
//! startup from [`IngestMode`]:
//! - [`EnvelopeSource`]: decodes a CloudEvents envelope
//! - [`HeaderSource`]: reads the `ce-id` and `ce-time` headers directly

mod envelope;
mod headers;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Request;

use crate::config::{IngestConfig, IngestMode};
use crate::error::IngestError;
use crate::notification::NotificationRecord;

pub use envelope::{
    CloudEvent, EnvelopeSource, BATCH_CONTENT_TYPE, SPEC_VERSION, STRUCTURED_CONTENT_TYPE,
};
pub use headers::{HeaderSource, CE_ID, CE_TIME};

/// Reads the job id and execution time from a request.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn extract(&self, request: Request) -> Result<NotificationRecord, IngestError>;
}

/// Builds the source for the configured ingestion mode.
pub fn source_for(config: &IngestConfig) -> Arc<dyn NotificationSource> {
    match config.mode {
        IngestMode::Envelope => Arc::new(EnvelopeSource::new(config.max_body_bytes)),
        IngestMode::Headers => Arc::new(HeaderSource::new(config.require_id)),
    }
}
