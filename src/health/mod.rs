//! Liveness endpoint.
//!
//! # Data Flow
//! ```text
//! GET /health (no credential required)
//!     → responder.rs (method check per MethodPolicy)
//!     → 200 {"status":"ok"} | 405
//! ```
//!
//! # Design Decisions
//! - The health path bypasses the auth gate so infrastructure probes work without a key
//! - The payload is a constant; it reports liveness only, not dependencies
//! - The listener enforces GET; the invocation envelope does not

pub mod responder;

pub use responder::{respond, HealthStatus, MethodPolicy, HEALTH_PATH};
