//! `GET /api/onboarding-config`.
//!
//! Exposes the public onboarding settings from the environment. Unset
//! values are reported as empty strings.

use axum::{extract::State, http::StatusCode, response::Response};
use serde_json::json;

use crate::http::response::json_response;
use crate::http::server::AppState;

pub async fn onboarding_config(State(state): State<AppState>) -> Response {
    let env = &state.env;
    json_response(
        StatusCode::OK,
        &json!({
            "ok": true,
            "gas_onboarding_url": env.gas_onboarding_url().unwrap_or_default(),
            "turnstile_site_key": env.turnstile_site_key().unwrap_or_default(),
            "turnstile_allowed_hosts": env.turnstile_allowed_hosts_raw().unwrap_or_default(),
        }),
    )
}
