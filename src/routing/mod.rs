//! Request routing shared by the listener and the function handler.
//!
//! # Data Flow
//! ```text
//! GateRequest (method, path, header lookup)
//!     → router.rs (route)
//!         path == /health → health::respond
//!         otherwise       → auth::authorize → 401 | 404
//!     → GateResponse
//! ```
//!
//! # Design Decisions
//! - One pure decision tree; the adapters only translate requests and responses
//! - Exact path matching, no prefixes or patterns
//! - Every failure is terminal for the request and becomes a JSON error body

pub mod request;
pub mod router;

pub use request::{GateRequest, HeaderLookup};
pub use router::{render_json, route, DispatchError};
