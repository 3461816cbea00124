//! Per-request access log.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::observability::metrics;

/// One completed request, as it is logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    pub remote: String,
    pub method: String,
    pub path: String,
    pub status: StatusCode,
    pub elapsed: Duration,
}

impl AccessRecord {
    /// Capture the request line before handing the request on.
    pub fn start(req: &Request<Body>) -> Self {
        let remote = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map_or_else(|| "unknown".to_string(), |ConnectInfo(addr)| addr.to_string());

        Self {
            remote,
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            status: StatusCode::OK,
            elapsed: Duration::ZERO,
        }
    }

    /// Fill in the outcome. A handler that never set a status produced 200.
    pub fn finish(mut self, response: &Response, started: Instant) -> Self {
        self.status = response.status();
        self.elapsed = started.elapsed();
        self
    }

    pub fn emit(&self) {
        tracing::info!(
            remote = %self.remote,
            method = %self.method,
            path = %self.path,
            status = self.status.as_u16(),
            latency_ms = self.elapsed.as_secs_f64() * 1000.0,
            "request completed"
        );
    }
}

/// Log and count every request. The response passes through untouched.
pub async fn access_log(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let record = AccessRecord::start(&req);
    let span = tracing::info_span!("request", request_id = %Uuid::new_v4());

    let response = next.run(req).instrument(span.clone()).await;

    let record = record.finish(&response, started);
    span.in_scope(|| record.emit());
    metrics::record_request(&record.method, record.status.as_u16(), record.elapsed);

    response
}
