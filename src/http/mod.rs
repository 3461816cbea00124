//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, hyper connection, timeouts)
//!     → middleware/access_log.rs (remote, method, path, status, latency)
//!     → /health → health::respond
//!       other   → middleware/auth.rs → protected routes | 404
//!     → response.rs (GateResponse → wire)
//! ```

pub mod middleware;
pub mod response;
pub mod server;

pub use response::{ErrorPayload, GateResponse, APPLICATION_JSON, INTERNAL_ERROR_BODY};
pub use server::{build_router, AppState, HttpServer, ServerState};
