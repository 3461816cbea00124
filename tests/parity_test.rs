//! Both adapters must agree on status and body for the same input.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::Router;
use tower::ServiceExt;

use keygate::config::load_config;
use keygate::function::{FunctionHandler, InvocationRequest};
use keygate::http::build_router;

mod common;

struct Case {
    key: Option<&'static str>,
    path: &'static str,
    supplied: Option<&'static str>,
}

const CASES: &[Case] = &[
    Case { key: Some("k1"), path: "/health", supplied: None },
    Case { key: Some("k1"), path: "/health", supplied: Some("k2") },
    Case { key: None, path: "/health", supplied: None },
    Case { key: Some("k1"), path: "/test", supplied: None },
    Case { key: Some("k1"), path: "/test", supplied: Some("") },
    Case { key: Some("k1"), path: "/test", supplied: Some("K1") },
    Case { key: Some("k1"), path: "/test", supplied: Some("k1") },
    Case { key: None, path: "/test", supplied: Some("k1") },
    Case { key: Some("k1"), path: "/health/", supplied: Some("k1") },
];

#[tokio::test]
async fn server_and_function_agree_on_get() {
    for case in CASES {
        let config = common::test_config(case.key);

        let mut invocation = InvocationRequest::new("GET", case.path);
        if let Some(supplied) = case.supplied {
            invocation = invocation.with_header("x-api-key", supplied);
        }
        let function = FunctionHandler::from_config(&config).invoke(&invocation);

        let mut request = Request::builder().method("GET").uri(case.path);
        if let Some(supplied) = case.supplied {
            request = request.header("x-api-key", supplied);
        }
        let app = build_router(Arc::new(config), Router::new());
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status().as_u16();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let label = format!("key={:?} path={} supplied={:?}", case.key, case.path, case.supplied);
        assert_eq!(status, function.status_code, "{label}");
        assert_eq!(String::from_utf8(body.to_vec()).unwrap(), function.body, "{label}");
    }
}

#[tokio::test]
async fn config_file_key_reaches_both_adapters() {
    let path = std::env::temp_dir().join(format!("keygate-parity-{}.toml", std::process::id()));
    std::fs::write(&path, "[auth]\napi_key = \"file-key\"\n").unwrap();
    let config = load_config(Some(&path)).unwrap();
    std::fs::remove_file(&path).unwrap();

    let function = FunctionHandler::from_config(&config)
        .invoke(&InvocationRequest::new("GET", "/test").with_header("x-api-key", "file-key"));

    let app = build_router(Arc::new(config), Router::new());
    let request = Request::builder()
        .uri("/test")
        .header("x-api-key", "file-key")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(function.status_code, 404);
    assert_eq!(response.status().as_u16(), function.status_code);
}
