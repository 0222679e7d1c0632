//! scheduler-events entry point.
//!
//! Parses the command line, loads configuration, initializes tracing, builds
//! the router for the configured ingestion mode and serves it until shutdown.
//! Any startup failure is logged and exits with a non-zero status.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use scheduler_events::config::{
    AppConfig, IngestMode, LoggingConfig, DEFAULT_LOG_FILTER, PORT_ENV_VAR,
};
use scheduler_events::http::start_server;
use scheduler_events::logging::init_tracing;
use scheduler_events::sink::TracingSink;
use scheduler_events::{create_router, AppState};

/// scheduler-events: receives Cloud Scheduler job notifications over HTTP
#[derive(Parser, Debug)]
#[command(name = "scheduler-events", version, about)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "scheduler_events=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Ingestion mode, overriding the configuration file
    #[arg(short, long, value_enum)]
    mode: Option<IngestMode>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let port_env = std::env::var(PORT_ENV_VAR).ok();
    let mut config = match AppConfig::resolve(args.config.as_deref(), port_env.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&log_filter, &LoggingConfig::default());
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&log_filter, &config.logging);

    if let Some(mode) = args.mode {
        config.ingest.mode = mode;
    }

    tracing::info!(
        host = %config.http.host,
        port = config.http.port,
        mode = %config.ingest.mode,
        require_id = config.ingest.require_id,
        "Loaded configuration"
    );

    let state = AppState::new(config.clone(), Arc::new(TracingSink));
    let app = create_router(state);

    match start_server(app, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
