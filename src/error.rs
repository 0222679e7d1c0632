use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Rejections raised while reading a notification out of a request.
///
/// These are produced before the receiver runs; once a record has been
/// extracted the request is always acknowledged.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),

    #[error("malformed event envelope: {0}")]
    MalformedEnvelope(#[from] serde_json::Error),

    #[error("missing required attribute: {0}")]
    MissingAttribute(&'static str),

    #[error("unsupported specversion: {0}")]
    UnsupportedSpecVersion(String),

    #[error("batched events are not supported")]
    BatchNotSupported,

    #[error("header {0} is not valid UTF-8")]
    InvalidHeader(&'static str),

    #[error("time is not an RFC 3339 timestamp: {0}")]
    InvalidTime(String),

    #[error("missing required header: {0}")]
    MissingHeader(&'static str),
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Rejected notification");

        let mut response = (StatusCode::BAD_REQUEST, format!("Bad Request: {}", self)).into_response();
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }
}
