//! Health check responder.

use axum::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::http::GateResponse;
use crate::routing::{render_json, DispatchError};

/// Path of the unauthenticated liveness endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Liveness payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// How the responder treats the request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodPolicy {
    /// Anything but GET is answered with 405 (listener).
    Enforce,
    /// The method is not consulted (invocation envelope).
    Ignore,
}

/// Answer a request for the health path.
pub fn respond(method: &str, policy: MethodPolicy) -> Result<GateResponse, DispatchError> {
    if policy == MethodPolicy::Enforce && method != Method::GET.as_str() {
        return Err(DispatchError::MethodNotAllowed);
    }

    render_json(StatusCode::OK, &HealthStatus::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_ok_payload() {
        let response = respond("GET", MethodPolicy::Enforce).unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body_text(), r#"{"status":"ok"}"#);
    }

    #[test]
    fn other_methods_are_rejected_when_enforced() {
        for method in ["POST", "PUT", "DELETE", "PATCH", "HEAD", "get"] {
            assert!(
                matches!(
                    respond(method, MethodPolicy::Enforce),
                    Err(DispatchError::MethodNotAllowed)
                ),
                "{method} should be rejected"
            );
        }
    }

    #[test]
    fn method_is_ignored_for_invocations() {
        for method in ["GET", "POST", ""] {
            let response = respond(method, MethodPolicy::Ignore).unwrap();
            assert_eq!(response.status, StatusCode::OK);
            assert_eq!(response.body_text(), r#"{"status":"ok"}"#);
        }
    }
}
