//! JSON response envelope and API errors.
//!
//! # Responsibilities
//! - Build JSON responses with the shared content type
//! - Map handler failures to `(status, code)` error envelopes
//!
//! # Design Decisions
//! - Error bodies are `{ok:false, code, message}` plus per-error extras
//! - Uncached responses are `no-store`

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};
use thiserror::Error;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Handler-level failures, each with a stable machine code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    MethodNotAllowed(&'static str),

    #[error("Request body is not valid JSON.")]
    BadJson,

    #[error("Missing Turnstile token.")]
    MissingToken,

    #[error("Turnstile verification failed.")]
    TurnstileRejected { error_codes: Vec<Value> },

    #[error("Turnstile token was issued for '{hostname}'.")]
    HostNotAllowed { hostname: String },

    #[error("Turnstile secret missing.")]
    ServerMisconfig,

    #[error("Unexpected server error.")]
    ServerError,

    #[error("{0}")]
    MissingEnv(&'static str),

    #[error("Invalid request body.")]
    BadRequest,

    #[error("Turnstile token is missing.")]
    MissingTurnstile,

    #[error("Turnstile verification failed.")]
    ContactTurnstileFailed { turnstile: Value },

    #[error("{0}")]
    GasFetchFailed(String),

    #[error("Missing lat or lon")]
    MissingParams,

    #[error("Upstream fetch failed")]
    UpstreamFailed(String),

    #[error("Not found.")]
    NotFound,

    #[error("Request timed out.")]
    Timeout,

    #[error("Request body is too large.")]
    PayloadTooLarge,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadJson
            | ApiError::MissingToken
            | ApiError::BadRequest
            | ApiError::MissingTurnstile
            | ApiError::MissingParams => StatusCode::BAD_REQUEST,
            ApiError::TurnstileRejected { .. }
            | ApiError::HostNotAllowed { .. }
            | ApiError::ContactTurnstileFailed { .. } => StatusCode::FORBIDDEN,
            ApiError::ServerMisconfig | ApiError::ServerError | ApiError::MissingEnv(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::GasFetchFailed(_) | ApiError::UpstreamFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MethodNotAllowed(_) => "method_not_allowed",
            ApiError::BadJson => "bad_json",
            ApiError::MissingToken => "missing_token",
            ApiError::TurnstileRejected { .. } | ApiError::ContactTurnstileFailed { .. } => {
                "turnstile_failed"
            }
            ApiError::HostNotAllowed { .. } => "host_not_allowed",
            ApiError::ServerMisconfig => "server_misconfig",
            ApiError::ServerError => "server_error",
            ApiError::MissingEnv(_) => "missing_env",
            ApiError::BadRequest => "bad_request",
            ApiError::MissingTurnstile => "missing_turnstile",
            ApiError::GasFetchFailed(_) => "gas_fetch_failed",
            ApiError::MissingParams => "missing_params",
            ApiError::UpstreamFailed(_) => "upstream_failed",
            ApiError::NotFound => "not_found",
            ApiError::Timeout => "request_timeout",
            ApiError::PayloadTooLarge => "payload_too_large",
        }
    }

    /// The JSON error envelope.
    pub fn body(&self) -> Value {
        let mut body = json!({
            "ok": false,
            "code": self.code(),
            "message": self.to_string(),
        });
        match self {
            ApiError::TurnstileRejected { error_codes } => {
                body["error_codes"] = Value::Array(error_codes.clone());
            }
            ApiError::ContactTurnstileFailed { turnstile } => {
                body["turnstile"] = turnstile.clone();
            }
            ApiError::UpstreamFailed(details) => {
                body["details"] = Value::String(details.clone());
            }
            _ => {}
        }
        body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        } else {
            tracing::debug!(code = self.code(), "Request rejected");
        }
        json_response(self.status(), &self.body())
    }
}

/// Rewrite non-JSON 408/413 replies from the tower layers into error envelopes.
pub async fn envelope_layer_errors(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return response;
    }
    match response.status() {
        StatusCode::REQUEST_TIMEOUT => ApiError::Timeout.into_response(),
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge.into_response(),
        _ => response,
    }
}

/// JSON response marked `no-store`.
pub fn json_response(status: StatusCode, body: &Value) -> Response {
    let mut response = json_body(status, body);
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    );
    response
}

/// JSON response cacheable for `ttl_secs`, tagged with the cache outcome.
pub fn cached_json_response(status: StatusCode, body: &Value, ttl_secs: u64, hit: bool) -> Response {
    let mut response = json_body(status, body);
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={ttl_secs}")) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    headers.insert(
        "x-ee-cache",
        HeaderValue::from_static(if hit { "HIT" } else { "MISS" }),
    );
    response
}

fn json_body(status: StatusCode, body: &Value) -> Response {
    let bytes = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_CONTENT_TYPE),
    );
    response
}
