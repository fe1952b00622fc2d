//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all API handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Bind server to listener
//! - Apply hot-reloaded configuration
//! - Drain connections on shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    extract::{MatchedPath, Request},
    http::Method,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::cache::ResponseCache;
use crate::config::{EdgeEnv, SiteConfig};
use crate::http::request::request_id;
use crate::http::response::{envelope_layer_errors, ApiError};
use crate::lifecycle::shutdown::recv_shutdown;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Current configuration, swapped on reload.
    pub config: Arc<ArcSwap<SiteConfig>>,
    /// Environment captured at startup.
    pub env: Arc<EdgeEnv>,
    /// Shared upstream client.
    pub client: reqwest::Client,
    pub cache: ResponseCache,
}

impl AppState {
    pub fn new(config: SiteConfig, env: EdgeEnv) -> Result<Self, reqwest::Error> {
        // No client timeouts; upstream calls end with the request timeout.
        let client = reqwest::Client::builder()
            .user_agent(concat!("experience-ecuador/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let cache = ResponseCache::new(config.cache.max_entries);

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            env: Arc::new(env),
            client,
            cache,
        })
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Arc<SiteConfig> {
        self.config.load_full()
    }
}

/// HTTP server for the edge API.
pub struct HttpServer {
    state: AppState,
}

impl HttpServer {
    pub fn new(config: SiteConfig, env: EdgeEnv) -> Result<Self, reqwest::Error> {
        Ok(Self {
            state: AppState::new(config, env)?,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Serve until `shutdown` fires, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<SiteConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let live = self.state.config.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                live.store(Arc::new(config));
                tracing::info!("Configuration reloaded");
            }
        });

        axum::serve(listener, self.router())
            .with_graceful_shutdown(recv_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    let config = state.config();

    Router::new()
        .route("/api/health", get(api::health::health))
        .route("/api/turnstile-verify", any(api::turnstile::turnstile_verify))
        .route("/api/contact-submit", any(api::contact::contact_submit))
        .route("/api/weather", get(api::weather::weather))
        .route("/api/regions-weather", get(api::weather::regions_weather))
        .route("/api/onboarding-config", get(api::onboarding::onboarding_config))
        .route_layer(middleware::from_fn(track_metrics))
        .fallback(not_found)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(middleware::map_response(envelope_layer_errors))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request_id(request.headers()),
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = request.method().clone();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    metrics::record_request(&route, status, start);
    if method != Method::OPTIONS {
        tracing::debug!(route = %route, status, elapsed = ?start.elapsed(), "Request complete");
    }
    response
}

async fn not_found() -> Response {
    ApiError::NotFound.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, HeaderMap, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> EdgeEnv {
        EdgeEnv::from_lookup(|key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    fn router(env: EdgeEnv) -> Router {
        build_router(AppState::new(SiteConfig::default(), env).unwrap())
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, headers, body) = send(
            router(EdgeEnv::default()),
            Request::get("/api/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["service"], "experienceecuador");
        assert!(body["ts"].as_str().unwrap().ends_with('Z'));
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert!(headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let (_, headers, _) = send(
            router(EdgeEnv::default()),
            Request::get("/api/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(headers["x-request-id"], "req-123");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _, body) = send(
            router(EdgeEnv::default()),
            Request::get("/api/nope").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }

    #[tokio::test]
    async fn test_turnstile_verify_guards() {
        let configured = env(&[("TURNSTILE_SECRET_KEY", "secret")]);

        let (status, _, body) = send(
            router(configured.clone()),
            Request::get("/api/turnstile-verify").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["code"], "method_not_allowed");

        let (status, _, body) = send(
            router(EdgeEnv::default()),
            post_json("/api/turnstile-verify", r#"{"token":"x"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "server_misconfig");

        let (status, _, body) = send(
            router(configured.clone()),
            post_json("/api/turnstile-verify", "{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "bad_json");

        let (status, _, body) = send(
            router(configured),
            post_json("/api/turnstile-verify", r#"{"token":""}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "missing_token");
    }

    #[tokio::test]
    async fn test_contact_preflight_and_guards() {
        let (status, headers, body) = send(
            router(EdgeEnv::default()),
            Request::options("/api/contact-submit")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://experienceecuador.com"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");

        let (status, headers, body) = send(
            router(EdgeEnv::default()),
            Request::get("/api/contact-submit").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["message"], "Use POST for /api/contact-submit.");
        assert_eq!(headers[header::VARY], "Origin");

        let (status, _, body) = send(
            router(env(&[("TURNSTILE_SECRET", "s")])),
            post_json("/api/contact-submit", "{}"),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "missing_env");
        assert_eq!(body["message"], "GAS_CONTACT_URL is not set.");

        let configured = env(&[
            ("TURNSTILE_SECRET", "s"),
            ("GAS_CONTACT_URL", "http://127.0.0.1:9/exec"),
            ("ALLOW_ORIGIN", "https://staging.experienceecuador.com"),
        ]);
        let (status, headers, body) = send(
            router(configured.clone()),
            post_json("/api/contact-submit", r#"{"first_name":"Ana"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "missing_turnstile");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://staging.experienceecuador.com"
        );

        let (status, _, body) = send(
            router(configured),
            Request::post("/api/contact-submit")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("hello"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_onboarding_config() {
        let (status, _, body) = send(
            router(env(&[
                ("GAS_ONBOARDING_URL", " https://script.google.com/macros/s/x/exec "),
                ("TURNSTILE_ALLOWED_HOSTS", "experienceecuador.com"),
            ])),
            Request::get("/api/onboarding-config")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "ok": true,
                "gas_onboarding_url": "https://script.google.com/macros/s/x/exec",
                "turnstile_site_key": "",
                "turnstile_allowed_hosts": "experienceecuador.com"
            })
        );
    }

    #[tokio::test]
    async fn test_body_limit() {
        let mut config = SiteConfig::default();
        config.listener.max_body_bytes = 16;
        let router = build_router(
            AppState::new(config, env(&[("TURNSTILE_SECRET_KEY", "s")])).unwrap(),
        );
        let (status, headers, body) =
            send(router, post_json("/api/turnstile-verify", &"x".repeat(64))).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json; charset=utf-8");
        assert_eq!(body["ok"], false);
        assert_eq!(body["code"], "payload_too_large");
    }

    #[tokio::test]
    async fn test_request_timeout_is_enveloped() {
        // Accepts connections into the backlog but never answers.
        let stalled = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = SiteConfig::default();
        config.timeouts.request_secs = 1;
        config.upstreams.turnstile_verify_url =
            format!("http://{}/siteverify", stalled.local_addr().unwrap());
        let router = build_router(
            AppState::new(config, env(&[("TURNSTILE_SECRET_KEY", "s")])).unwrap(),
        );

        let (status, _, body) =
            send(router, post_json("/api/turnstile-verify", r#"{"token":"t"}"#)).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body["ok"], false);
        assert_eq!(body["code"], "request_timeout");
        drop(stalled);
    }
}
