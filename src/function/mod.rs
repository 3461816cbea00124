//! One-shot invocation adapter.
//!
//! # Data Flow
//! ```text
//! InvocationRequest (JSON envelope from the hosting runtime)
//!     → handler.rs (FunctionHandler::invoke)
//!     → routing::route (MethodPolicy::Ignore)
//!     → InvocationResponse (JSON envelope back to the runtime)
//! ```
//!
//! # Design Decisions
//! - Field names follow the HTTP API (payload v2) event format
//! - The credential is captured once, when the handler is built
//! - `invoke` never fails; every outcome is a response envelope

pub mod envelope;
pub mod handler;

pub use envelope::{HttpContext, InvocationRequest, InvocationResponse, RequestContext};
pub use handler::FunctionHandler;
