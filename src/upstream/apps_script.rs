//! Apps Script web app client for contact intake.

use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::{json, Value};

use crate::upstream::UpstreamError;

const UPSTREAM: &str = "apps-script";

/// Characters of a non-JSON reply kept for diagnostics.
pub const RAW_PREVIEW_CHARS: usize = 500;

/// Client for the contact web app.
#[derive(Debug, Clone)]
pub struct AppsScriptClient {
    client: reqwest::Client,
    url: String,
}

impl AppsScriptClient {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    /// POST `payload` as JSON and return the reply body.
    ///
    /// A reply that is not JSON becomes a `gas_non_json` envelope carrying
    /// the start of the raw body.
    pub async fn submit<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(UPSTREAM, e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::transport(UPSTREAM, e))?;

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => {
                tracing::debug!(status, "Apps Script replied");
                Ok(body)
            }
            Err(_) => {
                tracing::warn!(status, "Apps Script did not return JSON");
                Ok(non_json_envelope(&text))
            }
        }
    }
}

fn non_json_envelope(text: &str) -> Value {
    let raw: String = text.chars().take(RAW_PREVIEW_CHARS).collect();
    json!({
        "ok": false,
        "code": "gas_non_json",
        "message": "Apps Script did not return JSON.",
        "raw": raw,
    })
}
