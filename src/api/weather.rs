//! `GET /api/weather` and `GET /api/regions-weather`.
//!
//! Both proxy Open-Meteo through the shared response cache. Only upstream
//! 2xx replies are cached. Other statuses are relayed as the response
//! status under an `ok:true` envelope with the upstream body in `data`.

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use serde_json::{json, Value};
use url::Url;

use crate::http::response::{cached_json_response, ApiError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::{OpenMeteoClient, UpstreamReply};

const SOURCE: &str = "open-meteo";

pub async fn weather(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let param = |name: &str| params.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());
    let (Some(lat), Some(lon)) = (param("lat"), param("lon")) else {
        return Err(ApiError::MissingParams);
    };

    let config = state.config();
    let client = open_meteo(&state, &config.upstreams.open_meteo_url)?;
    let url = client.daily_forecast_url(lat, lon);

    serve_cached(
        &state,
        "weather",
        &client,
        url,
        config.cache.weather_ttl_secs,
        |data| {
            json!({
                "ok": true,
                "source": SOURCE,
                "lat": lat,
                "lon": lon,
                "data": data,
            })
        },
    )
    .await
}

pub async fn regions_weather(State(state): State<AppState>) -> Result<Response, ApiError> {
    let config = state.config();
    let client = open_meteo(&state, &config.upstreams.open_meteo_url)?;
    let url = client.regions_url(&config.weather.places);

    serve_cached(
        &state,
        "regions-weather",
        &client,
        url,
        config.cache.regions_ttl_secs,
        |data| {
            json!({
                "ok": true,
                "source": SOURCE,
                "places": config.weather.places,
                "data": data,
            })
        },
    )
    .await
}

fn open_meteo(state: &AppState, base_url: &str) -> Result<OpenMeteoClient, ApiError> {
    OpenMeteoClient::new(state.client.clone(), base_url)
        .map_err(|e| ApiError::UpstreamFailed(e.to_string()))
}

/// Serve `url` from the cache, or fetch, wrap with `envelope` and cache it.
async fn serve_cached<F>(
    state: &AppState,
    route: &'static str,
    client: &OpenMeteoClient,
    url: Url,
    ttl_secs: u64,
    envelope: F,
) -> Result<Response, ApiError>
where
    F: FnOnce(Value) -> Value,
{
    let key = url.to_string();

    if let Some(body) = state.cache.get(&key) {
        metrics::record_cache_lookup(route, true);
        tracing::debug!(route, key = %key, "Cache hit");
        return Ok(cached_json_response(StatusCode::OK, &body, ttl_secs, true));
    }
    metrics::record_cache_lookup(route, false);

    let reply: UpstreamReply = client
        .fetch(&url)
        .await
        .map_err(|e| ApiError::UpstreamFailed(e.to_string()))?;

    let ok = reply.is_success();
    let body = envelope(reply.data);
    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY)
    };

    if ok {
        state
            .cache
            .insert(key, body.clone(), Duration::from_secs(ttl_secs));
    }

    Ok(cached_json_response(status, &body, ttl_secs, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EdgeEnv, SiteConfig};
    use crate::http::server::build_router;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn state() -> AppState {
        let mut config = SiteConfig::default();
        // Nothing listens here; cache hits never reach it.
        config.upstreams.open_meteo_url = "http://127.0.0.1:9/v1/forecast".to_string();
        AppState::new(config, EdgeEnv::default()).unwrap()
    }

    async fn get(state: &AppState, uri: &str) -> (StatusCode, Option<String>, Value) {
        let response = build_router(state.clone())
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let cache = response
            .headers()
            .get("x-ee-cache")
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, cache, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_params() {
        let state = state();
        for uri in ["/api/weather", "/api/weather?lat=-0.18", "/api/weather?lat=&lon=1"] {
            let (status, _, body) = get(&state, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["code"], "missing_params");
        }
    }

    #[tokio::test]
    async fn test_cached_forecast_is_served_without_upstream() {
        let state = state();
        let client = open_meteo(&state, &state.config().upstreams.open_meteo_url).unwrap();
        let key = client.daily_forecast_url("-0.18", "-78.47").to_string();
        state.cache.insert(
            key,
            json!({"ok": true, "source": "open-meteo", "lat": "-0.18", "lon": "-78.47", "data": {}}),
            Duration::from_secs(60),
        );

        let (status, cache, body) = get(&state, "/api/weather?lat=-0.18&lon=-78.47").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("HIT"));
        assert_eq!(body["lat"], "-0.18");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        let state = state();
        let (status, cache, body) = get(&state, "/api/regions-weather").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(cache, None);
        assert_eq!(body["code"], "upstream_failed");
        assert!(state.cache.is_empty());
    }
}
