//! The access log stage emits exactly one structured event per request.

use std::io;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use keygate::http::{build_router, AppState};

mod common;

/// In-memory log sink shared with the subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    /// Fields of every `request completed` event.
    fn completed(&self) -> Vec<Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap())
            .filter(|event| event["fields"]["message"] == "request completed")
            .map(|event| event["fields"].clone())
            .collect()
    }
}

async fn logged_request(path: &str, key: Option<&str>) -> Vec<Value> {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::INFO)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = build_router(
        Arc::new(common::test_config(Some(common::TEST_KEY))),
        Router::<AppState>::new().route("/plain", get(|| async { "plain" })),
    );

    let mut request = Request::builder().method("GET").uri(path);
    if let Some(key) = key {
        request = request.header("x-api-key", key);
    }
    app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap();

    logs.completed()
}

fn assert_line(events: &[Value], path: &str, status: u64) {
    assert_eq!(events.len(), 1, "{events:?}");
    let event = &events[0];
    assert_eq!(event["method"], "GET");
    assert_eq!(event["path"], path);
    assert_eq!(event["status"], status);
    assert_eq!(event["remote"], "unknown");
    assert!(event["latency_ms"].as_f64().is_some(), "{event}");
}

#[tokio::test]
async fn logs_rejected_request() {
    let events = logged_request("/private", None).await;
    assert_line(&events, "/private", 401);
}

#[tokio::test]
async fn logs_unmatched_request() {
    let events = logged_request("/missing", Some(common::TEST_KEY)).await;
    assert_line(&events, "/missing", 404);
}

#[tokio::test]
async fn logs_health_request() {
    let events = logged_request("/health", None).await;
    assert_line(&events, "/health", 200);
}

#[tokio::test]
async fn handler_without_status_logs_200() {
    let events = logged_request("/plain", Some(common::TEST_KEY)).await;
    assert_line(&events, "/plain", 200);
}
