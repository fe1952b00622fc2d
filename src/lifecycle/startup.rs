//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Capture the process environment
//! - Start background tasks (metrics exporter, config watcher, signals)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::{load_config, validate_config, ConfigError, ConfigWatcher, EdgeEnv, SiteConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to watch config: {0}")]
    Watch(#[from] notify::Error),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Load `path`, or fall back to validated defaults when no file is given.
pub fn load_site_config(path: Option<&Path>) -> Result<SiteConfig, StartupError> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => {
            let config = SiteConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

/// Run the edge server until SIGINT/SIGTERM.
pub async fn run(
    config: SiteConfig,
    config_path: Option<&Path>,
    env: EdgeEnv,
) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        places = config.weather.places.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if env.verify_secret().is_none() {
        tracing::warn!("No Turnstile secret set; verification endpoints will fail");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path, config.clone());
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, env)?;
    let server_shutdown = shutdown.subscribe();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_shutdown().await;
        trigger.trigger();
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = load_site_config(None).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_site_config(Some(Path::new("/nonexistent/ee.toml"))).unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Io(_))));
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let mut config = SiteConfig::default();
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        config.listener.bind_address = taken.local_addr().unwrap().to_string();

        let err = run(config, None, EdgeEnv::default()).await.unwrap_err();
        assert!(matches!(err, StartupError::Bind { .. }), "{err}");
    }
}
