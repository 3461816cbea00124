//! Outbound response representation shared by both dispatch adapters.
//!
//! # Responsibilities
//! - Carry status, headers and a fully serialized JSON body
//! - Render the uniform `{"error": "..."}` payload
//! - Convert into an axum response or an invocation envelope
//!
//! # Design Decisions
//! - Bodies are serialized once, up front, so both adapters emit identical bytes
//! - Every response produced here is JSON

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Content type of every body the gate produces.
pub const APPLICATION_JSON: &str = "application/json";

/// Fixed body used when a payload could not be serialized.
pub const INTERNAL_ERROR_BODY: &str = r#"{"error":"Internal server error"}"#;

/// `{"error": "<message>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

/// A finished response: status, headers and body bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct GateResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl GateResponse {
    /// JSON response with an already serialized body.
    pub fn json(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// JSON error response carrying `{"error": message}`.
    pub fn error(status: StatusCode, message: &str) -> Self {
        match serde_json::to_vec(&ErrorPayload::new(message)) {
            Ok(body) => Self::json(status, body),
            Err(_) => Self::internal_error(),
        }
    }

    /// The fixed 500 fallback.
    pub fn internal_error() -> Self {
        Self::json(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY)
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Body as UTF-8 text. Every body built here is JSON, so this is lossless.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl IntoResponse for GateResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
