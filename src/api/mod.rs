//! Edge API handlers.
//!
//! # Routes
//! - `GET  /api/health`: liveness check
//! - `POST /api/turnstile-verify`: CAPTCHA token verification
//! - `POST /api/contact-submit`: verified contact relay (CORS)
//! - `GET  /api/weather`: cached 7-day forecast for one coordinate
//! - `GET  /api/regions-weather`: cached conditions for the configured places
//! - `GET  /api/onboarding-config`: public onboarding settings
//!
//! Across requests the only shared state is the response cache.

pub mod contact;
pub mod health;
pub mod onboarding;
pub mod turnstile;
pub mod weather;

use serde_json::Value;

/// Text of a loosely-typed form value; empty, zero, false and null are absent.
pub(crate) fn field_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_text() {
        assert_eq!(field_text(Some(&json!("abc"))), Some("abc".to_string()));
        assert_eq!(field_text(Some(&json!(42))), Some("42".to_string()));
        assert_eq!(field_text(Some(&json!(true))), Some("true".to_string()));
        assert_eq!(field_text(Some(&json!(""))), None);
        assert_eq!(field_text(Some(&json!(0))), None);
        assert_eq!(field_text(Some(&json!(null))), None);
        assert_eq!(field_text(Some(&json!(["a"]))), None);
        assert_eq!(field_text(None), None);
    }
}
