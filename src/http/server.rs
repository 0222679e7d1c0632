//! HTTP server startup logic.

use std::net::{IpAddr, SocketAddr};

use axum::Router;
use axum_server::Handle;

use crate::config::AppConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to resolve http.host {host:?}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("http.host {0:?} did not resolve to any address")]
    NoAddress(String),

    #[error("Failed to bind or serve: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the HTTP server based on configuration.
///
/// This function blocks until the server shuts down. Failing to resolve the
/// host or bind the listening port is returned as an error.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr = resolve_bind_addr(&config.http.host, config.http.port).await?;

    let handle = Handle::new();
    shutdown::setup_shutdown_handler(handle.clone());

    serve(app, addr, handle).await
}

/// Turns `http.host` and `http.port` into a socket address.
///
/// IP literals (IPv4, IPv6, optionally bracketed) are used as-is; anything
/// else is resolved and the first address wins.
pub async fn resolve_bind_addr(host: &str, port: u16) -> Result<SocketAddr, ServerError> {
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    if let Ok(ip) = bare.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    tokio::net::lookup_host((bare, port))
        .await
        .map_err(|source| ServerError::Resolve {
            host: host.to_string(),
            source,
        })?
        .next()
        .ok_or_else(|| ServerError::NoAddress(host.to_string()))
}

/// Serve `app` on `addr` until `handle` shuts the server down.
pub async fn serve(app: Router, addr: SocketAddr, handle: Handle) -> Result<(), ServerError> {
    tracing::info!(%addr, "Listening on port {}", addr.port());

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[tokio::test]
    async fn test_ipv4_literal() {
        let addr = resolve_bind_addr("0.0.0.0", 8080).await.unwrap();
        assert_eq!(addr, SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080));
    }

    #[tokio::test]
    async fn test_ipv6_unspecified() {
        let addr = resolve_bind_addr("::", 8080).await.unwrap();
        assert_eq!(addr, SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 8080));
    }

    #[tokio::test]
    async fn test_bracketed_ipv6() {
        let addr = resolve_bind_addr("[::1]", 0).await.unwrap();
        assert_eq!(addr, SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), 0));
    }

    #[tokio::test]
    async fn test_localhost_resolves_to_loopback() {
        let addr = resolve_bind_addr("localhost", 3000).await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 3000);
    }
}
