//! API key middleware for protected routes.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{authorize, Decision, API_KEY_HEADER};
use crate::http::server::AppState;
use crate::routing::{DispatchError, HeaderLookup};

/// Reject the request unless `X-API-Key` matches the configured key.
pub async fn require_api_key(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let decision = {
        let supplied = req.headers().header(API_KEY_HEADER);
        authorize(supplied.as_deref(), state.credential())
    };

    match decision {
        Decision::Allow => next.run(req).await,
        Decision::Deny(reason) => DispatchError::from(reason).into_response(),
    }
}
