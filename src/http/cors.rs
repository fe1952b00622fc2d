//! CORS headers for the contact relay.
//!
//! # Responsibilities
//! - Resolve the allowed origin (`ALLOW_ORIGIN`, else the configured default)
//! - Stamp `Access-Control-Allow-Origin` + `Vary: Origin` on responses
//! - Answer preflight requests
//!
//! # Design Decisions
//! - A single fixed origin, never a reflected one
//! - Invalid header values are skipped, never fatal

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};

use crate::config::{CorsConfig, EdgeEnv};

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Accept";

/// Origin allowed to call the relay.
pub fn allow_origin(env: &EdgeEnv, config: &CorsConfig) -> String {
    env.allow_origin()
        .unwrap_or(&config.default_allow_origin)
        .to_string()
}

/// Add the allow-origin headers to `response`.
pub fn apply(response: &mut Response, origin: &str) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    } else {
        tracing::warn!(origin, "Allowed origin is not a valid header value");
    }
}

/// `204 No Content` preflight answer.
pub fn preflight(origin: &str, max_age_secs: u64) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    apply(&mut response, origin);
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from(max_age_secs));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_resolution() {
        let config = CorsConfig::default();
        assert_eq!(
            allow_origin(&EdgeEnv::default(), &config),
            "https://experienceecuador.com"
        );

        let env = EdgeEnv::from_lookup(|k| (k == "ALLOW_ORIGIN").then(|| "https://staging.test".into()));
        assert_eq!(allow_origin(&env, &config), "https://staging.test");
    }

    #[test]
    fn test_preflight_headers() {
        let response = preflight("https://experienceecuador.com", 86_400);
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let h = response.headers();
        assert_eq!(h[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://experienceecuador.com");
        assert_eq!(h[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(h[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type, Accept");
        assert_eq!(h[header::ACCESS_CONTROL_MAX_AGE], "86400");
        assert_eq!(h[header::VARY], "Origin");
    }

    #[test]
    fn test_invalid_origin_is_skipped() {
        let mut response = Response::new(Body::empty());
        apply(&mut response, "bad\norigin");
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
