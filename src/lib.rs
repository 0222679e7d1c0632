//! scheduler-events: receives Cloud Scheduler job notifications over HTTP.
//!
//! Each request carries one notification, either as a CloudEvents envelope or
//! as bare `ce-id`/`ce-time` headers. The job id and execution time are
//! written as a single status line and the request is acknowledged with an
//! empty 200. Nothing is stored between requests.

pub mod config;
pub mod error;
pub mod http;
pub mod ingest;
pub mod logging;
pub mod middleware;
pub mod notification;
pub mod receiver;
pub mod routes;
pub mod sink;
pub mod state;

pub use error::IngestError;
pub use notification::NotificationRecord;
pub use receiver::EventReceiver;
pub use routes::create_router;
pub use state::AppState;
