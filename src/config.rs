//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file and applies the
//! `PORT` environment override. Every section has defaults, so the service runs
//! with no configuration file at all. `AppConfig` is the root configuration struct.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Acknowledgements are per-delivery and must never be served from a cache
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Ingestion Constants
// =============================================================================

/// Largest request body read when decoding an envelope (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listening port when neither `PORT` nor the config file sets one
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable that overrides the listening port
pub const PORT_ENV_VAR: &str = "PORT";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str =
    formatcp!("{}=info,tower_http=info", env!("CARGO_CRATE_NAME"));

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Seconds to wait for in-flight requests on shutdown
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP listener configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// How notifications are read from inbound requests
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_PORT
    }
}

/// Where the job id and execution time are read from.
///
/// Only one mode is active per process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IngestMode {
    /// Decode a CloudEvents envelope (structured or binary content mode)
    #[default]
    Envelope,
    /// Read the `ce-id` and `ce-time` headers, ignore the body
    Headers,
}

impl std::fmt::Display for IngestMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestMode::Envelope => write!(f, "envelope"),
            IngestMode::Headers => write!(f, "headers"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub mode: IngestMode,
    /// Reject header-mode requests without a `ce-id` (default: false)
    #[serde(default)]
    pub require_id: bool,
    /// Body size limit for envelope decoding
    #[serde(default = "IngestConfig::default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            mode: IngestMode::default(),
            require_id: false,
            max_body_bytes: Self::default_max_body_bytes(),
        }
    }
}

impl IngestConfig {
    fn default_max_body_bytes() -> usize {
        DEFAULT_MAX_BODY_BYTES
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the effective configuration: file (if any), then the `PORT` override.
    pub fn resolve(path: Option<&Path>, port_env: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(raw) = port_env {
            config.http.port = raw.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("{PORT_ENV_VAR} must be a TCP port, got {raw:?}"))
            })?;
        }

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ingest.max_body_bytes == 0 {
            return Err(ConfigError::Validation(
                "ingest.max_body_bytes must be greater than zero".to_string(),
            ));
        }

        match self.logging.format.to_ascii_lowercase().as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
