//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept, error classification)
//!     → http::server accept loop (one task per connection)
//!     → connection.rs (id, I/O activity tracking for the idle timeout)
//!     → hyper HTTP/1.1 connection → axum router
//!
//! Connection States:
//!     Active → Draining (idle or shutdown) → Closed
//! ```
//!
//! # Design Decisions
//! - Resource exhaustion on accept backs off; it never stops the server
//! - Idle detection watches bytes on the socket, not requests
//! - Draining lets the in-flight request finish before the socket closes

pub mod connection;
pub mod listener;

pub use connection::{Activity, ConnectionId, TrackedIo};
pub use listener::{classify_accept_error, AcceptAction, Listener, ACCEPT_BACKOFF};
