//! `/api/contact-submit`: verified contact relay.
//!
//! # Flow
//! ```text
//! OPTIONS → preflight
//! POST    → env check → body (JSON | urlencoded) → Turnstile token
//!         → siteverify → forward to Apps Script → relay its JSON
//! other   → 405
//! ```
//!
//! Every response carries the allow-origin headers.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::field_text;
use crate::http::cors;
use crate::http::request::{client_ip, content_type, request_id, user_agent};
use crate::http::response::{json_response, ApiError};
use crate::http::server::AppState;
use crate::upstream::{AppsScriptClient, TurnstileClient, Verification};

/// Payload forwarded to the contact web app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactForward {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub interests: String,
    pub notes: String,
    pub how_did_you_hear_about_us: String,
    pub language: String,
    pub source: String,
    pub user_agent: String,
    #[serde(rename = "ip_best-effort")]
    pub ip_best_effort: String,
    pub status: String,
}

impl ContactForward {
    /// Normalize submitted fields, filling request-derived defaults.
    pub fn from_payload(payload: &Map<String, Value>, user_agent: &str, ip: &str) -> Self {
        let text = |key: &str, default: &str| {
            field_text(payload.get(key)).unwrap_or_else(|| default.to_string())
        };
        Self {
            first_name: text("first_name", ""),
            last_name: text("last_name", ""),
            email: text("email", ""),
            phone: text("phone", ""),
            interests: text("interests", ""),
            notes: text("notes", ""),
            how_did_you_hear_about_us: text("how_did_you_hear_about_us", ""),
            language: text("language", "en"),
            source: text("source", "EE Contact"),
            user_agent: text("user_agent", user_agent),
            ip_best_effort: text("ip_best-effort", ip),
            status: text("status", "New"),
        }
    }
}

pub async fn contact_submit(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let config = state.config();
    let origin = cors::allow_origin(&state.env, &config.cors);

    let mut response = match method {
        Method::OPTIONS => return cors::preflight(&origin, config.cors.max_age_secs),
        Method::POST => submit(&state, &headers, &body)
            .await
            .unwrap_or_else(IntoResponse::into_response),
        Method::GET => {
            ApiError::MethodNotAllowed("Use POST for /api/contact-submit.").into_response()
        }
        _ => ApiError::MethodNotAllowed("Only POST is supported for /api/contact-submit.")
            .into_response(),
    };
    cors::apply(&mut response, &origin);
    response
}

async fn submit(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<Response, ApiError> {
    let secret = state
        .env
        .contact_secret()
        .ok_or(ApiError::MissingEnv("TURNSTILE_SECRET is not set."))?;
    let gas_url = state
        .env
        .gas_contact_url()
        .ok_or(ApiError::MissingEnv("GAS_CONTACT_URL is not set."))?;

    let payload = parse_payload(&content_type(headers), body)?;

    let token = field_text(payload.get("turnstile_token"))
        .or_else(|| field_text(payload.get("cf-turnstile-response")))
        .map(|t| t.trim().to_string())
        .unwrap_or_default();
    if token.is_empty() {
        return Err(ApiError::MissingTurnstile);
    }

    let ip = client_ip(headers).unwrap_or_default();
    let config = state.config();

    let verification = TurnstileClient::new(state.client.clone(), &config.upstreams.turnstile_verify_url)
        .verify(secret, &token, Some(&ip))
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(
                request_id = request_id(headers),
                upstream = e.upstream(),
                error = %e,
                "Contact verification failed upstream"
            );
            Verification::empty()
        });
    if !verification.success() {
        return Err(ApiError::ContactTurnstileFailed {
            turnstile: verification.into_raw(),
        });
    }

    let forward = ContactForward::from_payload(&payload, &user_agent(headers), &ip);
    let reply = AppsScriptClient::new(state.client.clone(), gas_url)
        .submit(&forward)
        .await
        .map_err(|e| ApiError::GasFetchFailed(e.to_string()))?;

    tracing::info!(
        request_id = request_id(headers),
        language = %forward.language,
        source = %forward.source,
        "Contact submission relayed"
    );
    Ok(json_response(StatusCode::OK, &reply))
}

/// Decode a JSON or urlencoded contact body into a field map.
pub fn parse_payload(content_type: &str, body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if content_type.contains("application/json") {
        return match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Ok(Map::new()),
            Err(_) => Err(ApiError::BadRequest),
        };
    }
    if content_type.contains("application/x-www-form-urlencoded") {
        return Ok(url::form_urlencoded::parse(body)
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect());
    }
    Err(ApiError::BadRequest)
}
