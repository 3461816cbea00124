//! Metrics collection and exposition.
//!
//! # Metrics
//! - `keygate_requests_total` (counter): requests by method and status
//! - `keygate_request_duration_seconds` (histogram): latency by method
//!
//! # Design Decisions
//! - Recorded from the access-log stage, so every response is counted once
//! - Exposition is a Prometheus scrape endpoint on its own address

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, elapsed: Duration) {
    ::metrics::counter!(
        "keygate_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("keygate_request_duration_seconds", "method" => method.to_string())
        .record(elapsed.as_secs_f64());
}
