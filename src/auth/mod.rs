//! Shared-secret authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     API_KEY / config file
//!     → credential.rs (normalize, redact)
//!     → Credential (immutable, shared via Arc<GateConfig>)
//!
//! Per request:
//!     caller-supplied key (header) + Credential
//!     → gate.rs (authorize)
//!     → Decision::Allow | Decision::Deny(DenyReason)
//! ```
//!
//! # Design Decisions
//! - The gate is a pure function: no logging, no shared state
//! - An unset key denies everything; there is no "allow all" mode
//! - Reasons are checked in a fixed order so responses are deterministic

pub mod credential;
pub mod gate;

pub use credential::Credential;
pub use gate::{authorize, Decision, DenyReason, API_KEY_HEADER};
