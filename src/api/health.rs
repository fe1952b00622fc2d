//! `GET /api/health`.

use axum::{extract::State, http::StatusCode, response::Response};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

use crate::http::response::json_response;
use crate::http::server::AppState;

pub async fn health(State(state): State<AppState>) -> Response {
    let config = state.config();
    json_response(
        StatusCode::OK,
        &json!({
            "ok": true,
            "service": config.service_name,
            "ts": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }),
    )
}
