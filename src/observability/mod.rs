//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http::middleware::access_log (one event per request)
//!     → logging.rs (tracing subscriber: pretty or JSON)
//!     → metrics.rs (request counter + latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout / stderr)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Each request gets an id on its span; it is not echoed in responses
//! - Metrics are off unless configured; recording without an exporter is a no-op

pub mod logging;
pub mod metrics;
