//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and upstream clients produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every span (tower-http request-id layer)
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
