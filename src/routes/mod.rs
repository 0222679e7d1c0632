//! HTTP route handlers.
//!
//! The notification route is bound to `/`. In envelope mode it only accepts
//! POST, as CloudEvents deliveries always are; in header mode any method is
//! accepted. Responses are never cacheable.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod receive;

use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{IngestMode, CACHE_CONTROL_NO_STORE};
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with the notification and health routes.
pub fn create_router(state: AppState) -> Router {
    let receive_route = match state.config.ingest.mode {
        IngestMode::Envelope => post(receive::receive),
        IngestMode::Headers => any(receive::receive),
    };

    let notification_routes = Router::new().route("/", receive_route);

    // Health check - always fresh for liveness probes
    let health_routes = Router::new().route("/health", get(health::health));

    Router::new()
        .merge(notification_routes)
        .merge(health_routes)
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
