//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, TTLs > 0, coordinates in range)
//! - Check upstream URLs and socket addresses parse
//! - Check the header DOM contract parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::SiteConfig;
use crate::header::SelectorError;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: '{value}' is not a valid http(s) URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("weather.places must not be empty")]
    NoPlaces,

    #[error("weather.places: duplicate id '{0}'")]
    DuplicatePlace(String),

    #[error("weather.places: '{id}' has out-of-range coordinates ({lat}, {lon})")]
    InvalidCoordinates { id: String, lat: f64, lon: f64 },

    #[error("cors.default_allow_origin must not be empty")]
    EmptyOrigin,

    #[error("header.{field}: {source}")]
    HeaderContract {
        field: String,
        source: SelectorError,
    },
}

/// Validate a deserialized configuration, collecting every problem.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::Zero {
            field: "listener.max_body_bytes",
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "timeouts.request_secs",
        });
    }

    for (field, value) in [
        ("upstreams.open_meteo_url", &config.upstreams.open_meteo_url),
        (
            "upstreams.turnstile_verify_url",
            &config.upstreams.turnstile_verify_url,
        ),
    ] {
        if !is_http_url(value) {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.clone(),
            });
        }
    }

    if config.cache.weather_ttl_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "cache.weather_ttl_secs",
        });
    }
    if config.cache.regions_ttl_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "cache.regions_ttl_secs",
        });
    }
    if config.cache.max_entries == 0 {
        errors.push(ValidationError::Zero {
            field: "cache.max_entries",
        });
    }

    if config.weather.places.is_empty() {
        errors.push(ValidationError::NoPlaces);
    }
    let mut seen = HashSet::new();
    for place in &config.weather.places {
        if !seen.insert(place.id.as_str()) {
            errors.push(ValidationError::DuplicatePlace(place.id.clone()));
        }
        if !(-90.0..=90.0).contains(&place.lat) || !(-180.0..=180.0).contains(&place.lon) {
            errors.push(ValidationError::InvalidCoordinates {
                id: place.id.clone(),
                lat: place.lat,
                lon: place.lon,
            });
        }
    }

    if config.cors.default_allow_origin.trim().is_empty() {
        errors.push(ValidationError::EmptyOrigin);
    }

    if let Err(contract) = config.header.validate() {
        errors.extend(
            contract
                .into_iter()
                .map(|(field, source)| ValidationError::HeaderContract { field, source }),
        );
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}
