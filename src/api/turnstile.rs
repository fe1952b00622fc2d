//! `POST /api/turnstile-verify`.
//!
//! # Flow
//! ```text
//! method check → secret present → JSON body → token
//!     → siteverify (with client IP) → hostname allow-list → {ok:true}
//! ```

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::Response,
};
use serde_json::{json, Value};

use crate::api::field_text;
use crate::http::request::{client_ip, request_id};
use crate::http::response::{json_response, ApiError};
use crate::http::server::AppState;
use crate::upstream::TurnstileClient;

pub async fn turnstile_verify(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    if method != Method::POST {
        return Err(ApiError::MethodNotAllowed("Use POST."));
    }

    let secret = state.env.verify_secret().ok_or(ApiError::ServerMisconfig)?;

    let payload: Value = serde_json::from_slice(&body).map_err(|_| ApiError::BadJson)?;
    let token = field_text(payload.get("token")).ok_or(ApiError::MissingToken)?;

    let config = state.config();
    let client = TurnstileClient::new(state.client.clone(), &config.upstreams.turnstile_verify_url);
    let ip = client_ip(&headers);

    let verification = client
        .verify(secret, &token, ip.as_deref())
        .await
        .map_err(|e| {
            tracing::error!(
                request_id = request_id(&headers),
                upstream = e.upstream(),
                error = %e,
                "Turnstile verification unavailable"
            );
            ApiError::ServerError
        })?;

    if !verification.success() {
        return Err(ApiError::TurnstileRejected {
            error_codes: verification.error_codes(),
        });
    }

    let allowed = state.env.turnstile_allowed_hosts();
    if !allowed.is_empty() {
        let hostname = verification
            .hostname()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !allowed.contains(&hostname) {
            tracing::warn!(hostname = %hostname, "Turnstile token issued for another host");
            return Err(ApiError::HostNotAllowed { hostname });
        }
    }

    Ok(json_response(StatusCode::OK, &json!({ "ok": true })))
}
