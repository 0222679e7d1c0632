//! Notification endpoint.

use axum::{
    extract::{Request, State},
    http::StatusCode,
};

use crate::error::IngestError;
use crate::state::AppState;

/// Extracts the notification with the configured source, logs its status
/// line and acknowledges with an empty 200.
///
/// Extraction failures are rejected before the receiver runs. Once a record
/// exists the response is always 200.
pub async fn receive(
    State(state): State<AppState>,
    request: Request,
) -> Result<StatusCode, IngestError> {
    let record = state.source.extract(request).await?;

    tracing::debug!(
        job_id = %record.job_id,
        executed_at = %record.executed_at,
        "Extracted notification"
    );

    state.receiver.handle(&record);

    Ok(StatusCode::OK)
}
