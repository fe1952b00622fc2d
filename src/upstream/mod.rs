//! Clients for the third-party APIs behind the edge handlers.
//!
//! # Upstreams
//! - `turnstile`: CAPTCHA token verification (siteverify)
//! - `open_meteo`: weather forecasts
//! - `apps_script`: spreadsheet-backed contact intake
//!
//! # Design Decisions
//! - One shared `reqwest::Client`; clients are cheap views over it
//! - No retries; the server-wide timeout is the only bound
//! - Transport failures are counted per upstream

pub mod apps_script;
pub mod open_meteo;
pub mod turnstile;

use thiserror::Error;

pub use apps_script::AppsScriptClient;
pub use open_meteo::{OpenMeteoClient, UpstreamReply};
pub use turnstile::{TurnstileClient, Verification};

/// Failure talking to an upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {upstream} failed: {source}")]
    Transport {
        upstream: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{upstream} returned an unreadable body: {reason}")]
    Decode {
        upstream: &'static str,
        reason: String,
    },

    #[error("{upstream} returned HTTP {status}")]
    Status { upstream: &'static str, status: u16 },

    #[error("{upstream} URL '{url}' is invalid")]
    InvalidUrl { upstream: &'static str, url: String },
}

impl UpstreamError {
    pub(crate) fn transport(upstream: &'static str, source: reqwest::Error) -> Self {
        crate::observability::metrics::record_upstream_failure(upstream);
        tracing::error!(upstream, error = %source, "Upstream request failed");
        UpstreamError::Transport { upstream, source }
    }

    pub fn upstream(&self) -> &'static str {
        match self {
            UpstreamError::Transport { upstream, .. }
            | UpstreamError::Decode { upstream, .. }
            | UpstreamError::Status { upstream, .. }
            | UpstreamError::InvalidUrl { upstream, .. } => upstream,
        }
    }
}
