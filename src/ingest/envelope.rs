//! Envelope mode: CloudEvents v1.0 over the HTTP protocol binding.
//!
//! Two content modes are decoded:
//! - **Structured**: `Content-Type: application/cloudevents+json`, the whole
//!   envelope is the JSON body
//! - **Binary**: attributes travel as `ce-*` headers and the body is the event data
//!
//! Batched delivery is rejected. Any decode failure rejects the request before
//! the receiver sees it.

use async_trait::async_trait;
use axum::extract::Request;
use chrono::{DateTime, SecondsFormat, Utc};
use http::HeaderMap;
use serde::{Deserialize, Serialize};

use super::NotificationSource;
use crate::error::IngestError;
use crate::notification::NotificationRecord;

/// The only CloudEvents version accepted
pub const SPEC_VERSION: &str = "1.0";

/// Media type of a structured-mode envelope
pub const STRUCTURED_CONTENT_TYPE: &str = "application/cloudevents+json";

/// Media type of a batch of structured envelopes
pub const BATCH_CONTENT_TYPE: &str = "application/cloudevents-batch+json";

const CE_SPECVERSION: &str = "ce-specversion";
const CE_ID: &str = "ce-id";
const CE_SOURCE: &str = "ce-source";
const CE_TYPE: &str = "ce-type";
const CE_TIME: &str = "ce-time";
const CE_SUBJECT: &str = "ce-subject";
const CONTENT_TYPE: &str = "content-type";

/// A decoded CloudEvent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudEvent {
    pub specversion: String,
    pub id: String,
    pub source: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacontenttype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CloudEvent {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        event_type: impl Into<String>,
    ) -> Self {
        Self {
            specversion: SPEC_VERSION.to_string(),
            id: id.into(),
            source: source.into(),
            event_type: event_type.into(),
            time: None,
            subject: None,
            datacontenttype: None,
            data: None,
        }
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.datacontenttype = Some("application/json".to_string());
        self.data = Some(data);
        self
    }

    /// Decodes an event from request headers and body, picking the content
    /// mode from `Content-Type`.
    pub fn from_http(headers: &HeaderMap, body: &[u8]) -> Result<Self, IngestError> {
        let content_type = media_type(headers)?;

        let event = match content_type.as_deref() {
            Some(STRUCTURED_CONTENT_TYPE) => serde_json::from_slice::<CloudEvent>(body)?,
            Some(BATCH_CONTENT_TYPE) => return Err(IngestError::BatchNotSupported),
            _ => Self::from_binary(headers, body)?,
        };

        event.validate()?;
        Ok(event)
    }

    fn from_binary(headers: &HeaderMap, body: &[u8]) -> Result<Self, IngestError> {
        let time = match header(headers, CE_TIME)? {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(&raw)
                    .map_err(|_| IngestError::InvalidTime(raw.clone()))?
                    .with_timezone(&Utc),
            ),
            None => None,
        };

        let data = if body.is_empty() {
            None
        } else {
            // Data is opaque to the receiver; keep it as JSON when it parses.
            Some(serde_json::from_slice(body).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(body).into_owned())
            }))
        };

        Ok(Self {
            specversion: required(headers, CE_SPECVERSION, "specversion")?,
            id: required(headers, CE_ID, "id")?,
            source: required(headers, CE_SOURCE, "source")?,
            event_type: required(headers, CE_TYPE, "type")?,
            time,
            subject: header(headers, CE_SUBJECT)?,
            datacontenttype: header(headers, CONTENT_TYPE)?,
            data,
        })
    }

    fn validate(&self) -> Result<(), IngestError> {
        if self.specversion != SPEC_VERSION {
            return Err(IngestError::UnsupportedSpecVersion(self.specversion.clone()));
        }
        if self.id.is_empty() {
            return Err(IngestError::MissingAttribute("id"));
        }
        if self.source.is_empty() {
            return Err(IngestError::MissingAttribute("source"));
        }
        if self.event_type.is_empty() {
            return Err(IngestError::MissingAttribute("type"));
        }
        Ok(())
    }

    /// Job id and execution time, with `time` rendered as RFC 3339 in UTC.
    pub fn to_record(&self) -> NotificationRecord {
        NotificationRecord::new(
            self.id.clone(),
            self.time
                .map(|time| time.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                .unwrap_or_default(),
        )
    }
}

/// Decodes a CloudEvent from the request and reports its id and time.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeSource {
    max_body_bytes: usize,
}

impl EnvelopeSource {
    pub fn new(max_body_bytes: usize) -> Self {
        Self { max_body_bytes }
    }
}

#[async_trait]
impl NotificationSource for EnvelopeSource {
    async fn extract(&self, request: Request) -> Result<NotificationRecord, IngestError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(IngestError::Body)?;

        let event = CloudEvent::from_http(&parts.headers, &body)?;
        tracing::debug!(
            id = %event.id,
            source = %event.source,
            event_type = %event.event_type,
            "Decoded CloudEvent"
        );

        Ok(event.to_record())
    }
}

/// Lowercased media type without parameters.
fn media_type(headers: &HeaderMap) -> Result<Option<String>, IngestError> {
    Ok(header(headers, CONTENT_TYPE)?.map(|value| {
        value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }))
}

fn header(headers: &HeaderMap, name: &'static str) -> Result<Option<String>, IngestError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(str::to_string)
                .map_err(|_| IngestError::InvalidHeader(name))
        })
        .transpose()
}

fn required(
    headers: &HeaderMap,
    name: &'static str,
    attribute: &'static str,
) -> Result<String, IngestError> {
    header(headers, name)?
        .filter(|value| !value.is_empty())
        .ok_or(IngestError::MissingAttribute(attribute))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use http::header::CONTENT_TYPE;
    use http::HeaderValue;

    fn binary_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CE_SPECVERSION, HeaderValue::from_static("1.0"));
        headers.insert(CE_ID, HeaderValue::from_static("test-id"));
        headers.insert(CE_SOURCE, HeaderValue::from_static("test-uri"));
        headers.insert(CE_TYPE, HeaderValue::from_static("test-type"));
        headers
    }

    fn structured_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/cloudevents+json; charset=utf-8"),
        );
        headers
    }

    #[test]
    fn test_structured_mode() {
        let body = br#"{
            "specversion": "1.0",
            "id": "test-id",
            "source": "test-uri",
            "type": "test-type",
            "time": "2024-01-01T00:00:00Z"
        }"#;

        let event = CloudEvent::from_http(&structured_headers(), body).unwrap();
        assert_eq!(event.id, "test-id");
        assert_eq!(event.event_type, "test-type");
        assert_eq!(
            event.time,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_structured_mode_missing_id() {
        let body = br#"{"specversion": "1.0", "source": "test-uri", "type": "test-type"}"#;
        let err = CloudEvent::from_http(&structured_headers(), body).unwrap_err();
        assert!(matches!(err, IngestError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_structured_mode_empty_id() {
        let body = br#"{"specversion": "1.0", "id": "", "source": "s", "type": "t"}"#;
        let err = CloudEvent::from_http(&structured_headers(), body).unwrap_err();
        assert!(matches!(err, IngestError::MissingAttribute("id")));
    }

    #[test]
    fn test_structured_mode_bad_json() {
        let err = CloudEvent::from_http(&structured_headers(), b"{not json").unwrap_err();
        assert!(matches!(err, IngestError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_structured_mode_rejects_old_specversion() {
        let body = br#"{"specversion": "0.3", "id": "a", "source": "s", "type": "t"}"#;
        let err = CloudEvent::from_http(&structured_headers(), body).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedSpecVersion(v) if v == "0.3"));
    }

    #[test]
    fn test_batch_mode_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(BATCH_CONTENT_TYPE));
        let err = CloudEvent::from_http(&headers, b"[]").unwrap_err();
        assert!(matches!(err, IngestError::BatchNotSupported));
    }

    #[test]
    fn test_binary_mode() {
        let mut headers = binary_headers();
        headers.insert(CE_TIME, HeaderValue::from_static("2024-01-01T01:00:00+01:00"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let event = CloudEvent::from_http(&headers, br#"{"custom_data":"aGVsbG8="}"#).unwrap();
        assert_eq!(event.id, "test-id");
        assert_eq!(event.source, "test-uri");
        assert_eq!(event.datacontenttype.as_deref(), Some("application/json"));
        assert_eq!(
            event.data,
            Some(serde_json::json!({"custom_data": "aGVsbG8="}))
        );
        assert_eq!(
            event.to_record(),
            NotificationRecord::new("test-id", "2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_binary_mode_keeps_non_json_data_as_text() {
        let event = CloudEvent::from_http(&binary_headers(), b"plain text").unwrap();
        assert_eq!(event.data, Some(serde_json::json!("plain text")));
    }

    #[test]
    fn test_binary_mode_without_time() {
        let event = CloudEvent::from_http(&binary_headers(), b"").unwrap();
        assert_eq!(event.data, None);
        assert_eq!(event.to_record(), NotificationRecord::new("test-id", ""));
    }

    #[test]
    fn test_binary_mode_missing_source() {
        let mut headers = binary_headers();
        headers.remove(CE_SOURCE);
        let err = CloudEvent::from_http(&headers, b"").unwrap_err();
        assert!(matches!(err, IngestError::MissingAttribute("source")));
    }

    #[test]
    fn test_binary_mode_invalid_time() {
        let mut headers = binary_headers();
        headers.insert(CE_TIME, HeaderValue::from_static("yesterday"));
        let err = CloudEvent::from_http(&headers, b"").unwrap_err();
        assert!(matches!(err, IngestError::InvalidTime(t) if t == "yesterday"));
    }

    #[test]
    fn test_plain_json_without_headers_is_not_an_event() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let err = CloudEvent::from_http(&headers, br#"{"id":"x"}"#).unwrap_err();
        assert!(matches!(err, IngestError::MissingAttribute("specversion")));
    }

    #[test]
    fn test_record_keeps_subsecond_precision() {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        let event = CloudEvent::new("a", "s", "t").with_time(time);
        assert_eq!(event.to_record().executed_at, "2024-01-01T00:00:00.250Z");
    }

    #[test]
    fn test_serialized_event_decodes_in_structured_mode() {
        let event = CloudEvent::new("test-id", "test-uri", "test-type")
            .with_time(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .with_data(serde_json::json!({"job": "nightly"}));
        let body = serde_json::to_vec(&event).unwrap();

        let decoded = CloudEvent::from_http(&structured_headers(), &body).unwrap();
        assert_eq!(decoded, event);
    }
}
