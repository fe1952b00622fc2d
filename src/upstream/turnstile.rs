//! Turnstile siteverify client.

use serde_json::Value;

use crate::upstream::UpstreamError;

const UPSTREAM: &str = "turnstile";

/// Parsed siteverify response; the raw body is kept for relaying.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    raw: Value,
}

impl Verification {
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// An empty verification, treated as failed.
    pub fn empty() -> Self {
        Self {
            raw: Value::Object(Default::default()),
        }
    }

    pub fn success(&self) -> bool {
        self.raw.get("success").and_then(Value::as_bool) == Some(true)
    }

    /// `error-codes`, or empty when absent or malformed.
    pub fn error_codes(&self) -> Vec<Value> {
        self.raw
            .get("error-codes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    pub fn hostname(&self) -> Option<&str> {
        self.raw.get("hostname").and_then(Value::as_str)
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

/// Client for the siteverify endpoint.
#[derive(Debug, Clone)]
pub struct TurnstileClient {
    client: reqwest::Client,
    url: String,
}

impl TurnstileClient {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Verify `token` with `secret`, passing the client IP when known.
    pub async fn verify(
        &self,
        secret: &str,
        token: &str,
        remote_ip: Option<&str>,
    ) -> Result<Verification, UpstreamError> {
        let mut form = vec![("secret", secret), ("response", token)];
        if let Some(ip) = remote_ip.filter(|ip| !ip.is_empty()) {
            form.push(("remoteip", ip));
        }

        let response = self
            .client
            .post(&self.url)
            .form(&form)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(UPSTREAM, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::transport(UPSTREAM, e))?;

        let raw: Value = match serde_json::from_str(&body) {
            Ok(raw) => raw,
            Err(_) if !status.is_success() => {
                crate::observability::metrics::record_upstream_failure(UPSTREAM);
                return Err(UpstreamError::Status {
                    upstream: UPSTREAM,
                    status: status.as_u16(),
                });
            }
            Err(e) => {
                return Err(UpstreamError::Decode {
                    upstream: UPSTREAM,
                    reason: e.to_string(),
                })
            }
        };

        let verification = Verification::from_value(raw);
        tracing::debug!(
            status = status.as_u16(),
            success = verification.success(),
            hostname = verification.hostname().unwrap_or(""),
            "Turnstile verification"
        );
        Ok(verification)
    }
}
