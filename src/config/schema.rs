//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::header::HeaderConfig;

/// Root configuration for the edge service.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Service name reported by `/api/health`.
    pub service_name: String,

    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Third-party API endpoints.
    pub upstreams: UpstreamConfig,

    /// Response cache TTLs.
    pub cache: CacheConfig,

    /// Places served by `/api/regions-weather`.
    pub weather: WeatherConfig,

    /// CORS settings for the contact relay.
    pub cors: CorsConfig,

    /// DOM contract of the site header.
    pub header: HeaderConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            service_name: "experienceecuador".to_string(),
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            upstreams: UpstreamConfig::default(),
            cache: CacheConfig::default(),
            weather: WeatherConfig::default(),
            cors: CorsConfig::default(),
            header: HeaderConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8788").
    pub bind_address: String,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8788".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    ///
    /// Upstream calls are bounded only by this.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Upstream API endpoints.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Open-Meteo forecast endpoint.
    pub open_meteo_url: String,

    /// Turnstile siteverify endpoint.
    pub turnstile_verify_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            open_meteo_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            turnstile_verify_url: "https://challenges.cloudflare.com/turnstile/v0/siteverify"
                .to_string(),
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL of `/api/weather` entries in seconds.
    pub weather_ttl_secs: u64,

    /// TTL of `/api/regions-weather` entries in seconds.
    pub regions_ttl_secs: u64,

    /// Upper bound on cached entries; expired entries are purged first.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            weather_ttl_secs: 30 * 60,
            regions_ttl_secs: 30 * 60,
            max_entries: 1024,
        }
    }
}

/// A named place with coordinates.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Place {
    fn new(id: &str, name: &str, lat: f64, lon: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            lat,
            lon,
        }
    }
}

/// Regions weather configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WeatherConfig {
    pub places: Vec<Place>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            places: vec![
                Place::new("quito", "Quito", -0.1807, -78.4678),
                Place::new("mindo", "Mindo", 0.0500, -78.7760),
                Place::new("otavalo", "Otavalo", 0.2340, -78.2620),
                Place::new("cotopaxi", "Cotopaxi", -0.6808, -78.4376),
                Place::new("banos", "Baños", -1.3964, -78.4246),
            ],
        }
    }
}

/// CORS configuration for the contact relay.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CorsConfig {
    /// Origin used when `ALLOW_ORIGIN` is not set.
    pub default_allow_origin: String,

    /// Preflight `Access-Control-Max-Age` in seconds.
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            default_allow_origin: "https://experienceecuador.com".to_string(),
            max_age_secs: 86_400,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
