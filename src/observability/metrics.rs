//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ee_requests_total` (counter): requests by route, status
//! - `ee_request_duration_seconds` (histogram): latency by route
//! - `ee_cache_lookups_total` (counter): response cache lookups by route, result
//! - `ee_upstream_failures_total` (counter): failed upstream calls by upstream
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request.
pub fn record_request(route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "ee_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("ee_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a response cache lookup.
pub fn record_cache_lookup(route: &'static str, hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!("ee_cache_lookups_total", "route" => route, "result" => result).increment(1);
}

/// Record a failed call to a third-party API.
pub fn record_upstream_failure(upstream: &'static str) {
    metrics::counter!("ee_upstream_failures_total", "upstream" => upstream).increment(1);
}
