//! Request inspection helpers.
//!
//! # Responsibilities
//! - Read the request ID set by the request-id layer
//! - Resolve the best-effort client IP behind the CDN
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing (outermost layer)
//! - `CF-Connecting-IP` wins over `X-Forwarded-For`; only the first
//!   forwarded hop is trusted

use axum::http::{header, HeaderMap, HeaderName};

/// Request ID header, set on every request and echoed on every response.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

const CF_CONNECTING_IP: &str = "cf-connecting-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// The request ID, or `"unknown"` outside the middleware stack.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Best-effort client IP.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    let header_text = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(ip) = header_text(CF_CONNECTING_IP) {
        return Some(ip.to_string());
    }
    header_text(X_FORWARDED_FOR)
        .and_then(|list| list.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

/// The `User-Agent` header, or empty.
pub fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Lowercased `Content-Type`, or empty.
pub fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_client_ip_precedence() {
        let h = headers(&[
            ("cf-connecting-ip", "203.0.113.7"),
            ("x-forwarded-for", "198.51.100.1, 10.0.0.1"),
        ]);
        assert_eq!(client_ip(&h).as_deref(), Some("203.0.113.7"));

        let h = headers(&[("x-forwarded-for", " 198.51.100.1 , 10.0.0.1")]);
        assert_eq!(client_ip(&h).as_deref(), Some("198.51.100.1"));

        let h = headers(&[("cf-connecting-ip", "  "), ("x-forwarded-for", ",10.0.0.1")]);
        assert_eq!(client_ip(&h), None);
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn test_request_id_and_agent() {
        let h = headers(&[("x-request-id", "abc"), ("user-agent", "curl/8")]);
        assert_eq!(request_id(&h), "abc");
        assert_eq!(user_agent(&h), "curl/8");
        assert_eq!(request_id(&HeaderMap::new()), "unknown");
        assert_eq!(user_agent(&HeaderMap::new()), "");
    }

    #[test]
    fn test_content_type_lowercased() {
        let h = headers(&[("content-type", "Application/JSON; charset=UTF-8")]);
        assert_eq!(content_type(&h), "application/json; charset=utf-8");
    }
}
