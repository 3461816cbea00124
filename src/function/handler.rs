//! Function entry point.

use axum::http::StatusCode;
use serde_json::Value;

use super::{InvocationRequest, InvocationResponse};
use crate::auth::Credential;
use crate::config::GateConfig;
use crate::health::MethodPolicy;
use crate::http::GateResponse;
use crate::routing::{route, GateRequest};

/// Handles one invocation envelope at a time.
///
/// Holds nothing but the expected credential, so a single handler can
/// serve any number of concurrent invocations.
#[derive(Debug, Clone)]
pub struct FunctionHandler {
    credential: Credential,
}

impl FunctionHandler {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    /// Use the key from the same layered config the server loads.
    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(config.auth.api_key.clone())
    }

    /// Answer one invocation.
    ///
    /// The health path ignores the envelope's method; see
    /// [`MethodPolicy::Ignore`].
    pub fn invoke(&self, request: &InvocationRequest) -> InvocationResponse {
        let gate_request = GateRequest::new(request.method(), &request.raw_path, &request.headers);
        route(&gate_request, &self.credential, MethodPolicy::Ignore).into()
    }

    /// Decode a raw event, invoke, and encode the result.
    ///
    /// An event that is not a valid envelope gets a 400 envelope back.
    pub fn invoke_json(&self, event: &[u8]) -> InvocationResponse {
        match serde_json::from_slice::<InvocationRequest>(event) {
            Ok(request) => self.invoke(&request),
            Err(e) => bad_request(e),
        }
    }

    /// Same as [`invoke_json`](Self::invoke_json), for an event the runtime
    /// has already parsed.
    pub fn invoke_value(&self, event: Value) -> InvocationResponse {
        match serde_json::from_value::<InvocationRequest>(event) {
            Ok(request) => self.invoke(&request),
            Err(e) => bad_request(e),
        }
    }
}

fn bad_request(e: serde_json::Error) -> InvocationResponse {
    tracing::warn!(error = %e, "Rejecting malformed invocation event");
    GateResponse::error(StatusCode::BAD_REQUEST, "Bad request").into()
}
