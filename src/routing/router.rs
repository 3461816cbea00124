//! The gate's decision tree.
//!
//! Both adapters end up here: the function handler calls [`route`]
//! directly, the axum router reaches the same functions through its
//! health handler, auth middleware and fallback.

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use super::GateRequest;
use crate::auth::{authorize, Credential, Decision, DenyReason, API_KEY_HEADER};
use crate::health::{self, MethodPolicy, HEALTH_PATH};
use crate::http::GateResponse;

/// Request-level failures. Each one maps to exactly one response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Credential missing, wrong, or not configured.
    #[error("{0}")]
    Unauthorized(DenyReason),

    /// Authenticated, but no route matched.
    #[error("Not found")]
    NotFound,

    /// Health path called with a method other than GET.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// A response payload could not be encoded.
    #[error("Internal server error")]
    Serialization(#[source] serde_json::Error),
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DispatchError::NotFound => StatusCode::NOT_FOUND,
            DispatchError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            DispatchError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DispatchError> for GateResponse {
    /// Callers only ever see the reason string.
    fn from(err: DispatchError) -> Self {
        if let DispatchError::Serialization(_) = err {
            return GateResponse::internal_error();
        }

        let response = GateResponse::error(err.status(), &err.to_string());
        match err {
            DispatchError::MethodNotAllowed => {
                response.with_header(header::ALLOW, HeaderValue::from_static(Method::GET.as_str()))
            }
            _ => response,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        GateResponse::from(self).into_response()
    }
}

impl From<DenyReason> for DispatchError {
    fn from(reason: DenyReason) -> Self {
        DispatchError::Unauthorized(reason)
    }
}

/// Serialize `payload` into a JSON response.
pub fn render_json<T: Serialize>(status: StatusCode, payload: &T) -> Result<GateResponse, DispatchError> {
    let body = serde_json::to_vec(payload).map_err(DispatchError::Serialization)?;
    Ok(GateResponse::json(status, body))
}

/// Route one request to its response.
///
/// 1. `/health` goes to the health responder, without authentication.
/// 2. Everything else must pass [`authorize`] on the `x-api-key` header.
/// 3. Authorized requests with no matching route get 404.
pub fn route(request: &GateRequest<'_>, credential: &Credential, policy: MethodPolicy) -> GateResponse {
    dispatch(request, credential, policy).unwrap_or_else(GateResponse::from)
}

fn dispatch(
    request: &GateRequest<'_>,
    credential: &Credential,
    policy: MethodPolicy,
) -> Result<GateResponse, DispatchError> {
    if request.path == HEALTH_PATH {
        return health::respond(request.method, policy);
    }

    let supplied = request.header(API_KEY_HEADER);
    match authorize(supplied.as_deref(), credential) {
        Decision::Deny(reason) => Err(reason.into()),
        Decision::Allow => Err(DispatchError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Serializer;

    use super::*;

    fn headers(key: Option<&str>) -> HashMap<String, String> {
        key.map(|k| HashMap::from([("x-api-key".to_string(), k.to_string())]))
            .unwrap_or_default()
    }

    fn call(path: &str, key: Option<&str>, secret: &str) -> GateResponse {
        let headers = headers(key);
        let request = GateRequest::new("GET", path, &headers);
        route(&request, &Credential::from(secret), MethodPolicy::Enforce)
    }

    #[test]
    fn authenticated_unknown_path_is_not_found() {
        let response = call("/unknown", Some("abc123"), "abc123");
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body_text(), r#"{"error":"Not found"}"#);
    }

    #[test]
    fn unconfigured_secret_rejects() {
        let response = call("/anything", None, "");
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body_text(), r#"{"error":"API key not configured"}"#);
    }

    #[test]
    fn health_bypasses_auth() {
        let response = call("/health", Some("k2"), "k1");
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body_text(), r#"{"status":"ok"}"#);
    }

    #[test]
    fn health_match_is_exact() {
        for path in ["/health/", "/healthz", "/Health", "/health/live"] {
            let response = call(path, None, "k1");
            assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{path}");
        }
    }

    #[test]
    fn method_not_allowed_advertises_get() {
        let response = GateResponse::from(DispatchError::MethodNotAllowed);
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers.get(header::ALLOW).unwrap(), "GET");
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refused"))
        }
    }

    #[test]
    fn serialization_failure_falls_back_to_fixed_500() {
        let response = render_json(StatusCode::OK, &Unserializable)
            .unwrap_or_else(GateResponse::from);
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body_text(), r#"{"error":"Internal server error"}"#);
    }

    #[test]
    fn repeated_requests_are_byte_identical() {
        let first = call("/unknown", Some("nope"), "abc123");
        let second = call("/unknown", Some("nope"), "abc123");
        assert_eq!(first, second);
    }
}
