//! Header mode: the notification is carried in `ce-*` request headers.

use async_trait::async_trait;
use axum::extract::Request;
use http::HeaderMap;

use super::NotificationSource;
use crate::error::IngestError;
use crate::notification::NotificationRecord;

/// Header carrying the job id
pub const CE_ID: &str = "ce-id";

/// Header carrying the execution time
pub const CE_TIME: &str = "ce-time";

/// Reads `ce-id` and `ce-time` without touching the body.
///
/// Absent or non-UTF-8 values become empty strings. With `require_id` set, a
/// request without a non-empty `ce-id` is rejected instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderSource {
    require_id: bool,
}

impl HeaderSource {
    pub fn new(require_id: bool) -> Self {
        Self { require_id }
    }

    pub fn record_from(&self, headers: &HeaderMap) -> Result<NotificationRecord, IngestError> {
        let record = NotificationRecord::new(
            header_or_empty(headers, CE_ID),
            header_or_empty(headers, CE_TIME),
        );

        if self.require_id && record.job_id.is_empty() {
            return Err(IngestError::MissingHeader(CE_ID));
        }

        Ok(record)
    }
}

#[async_trait]
impl NotificationSource for HeaderSource {
    async fn extract(&self, request: Request) -> Result<NotificationRecord, IngestError> {
        self.record_from(request.headers())
    }
}

fn header_or_empty(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
