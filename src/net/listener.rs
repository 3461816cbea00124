//! Listener abstraction and accept error handling.
//!
//! # Responsibilities
//! - Hand accepted streams and peer addresses to the accept loop
//! - Classify accept errors: skip, back off, or give up
//!
//! # Design Decisions
//! - Running out of file descriptors or buffers is temporary; the accept
//!   loop backs off and keeps going instead of taking the server down
//! - Only errors that say the listening socket itself is unusable are fatal

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};

/// Pause before accepting again after resource exhaustion.
pub const ACCEPT_BACKOFF: Duration = Duration::from_secs(1);

const ENFILE: i32 = 23;
const EMFILE: i32 = 24;
#[cfg(target_os = "linux")]
const ENOBUFS: i32 = 105;
#[cfg(not(target_os = "linux"))]
const ENOBUFS: i32 = 55;

/// Source of inbound connections for the accept loop.
pub trait Listener: Send + 'static {
    type Io: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Wait for the next connection.
    fn accept(&mut self) -> impl Future<Output = io::Result<(Self::Io, SocketAddr)>> + Send;

    fn local_addr(&self) -> io::Result<SocketAddr>;
}

impl Listener for TcpListener {
    type Io = TcpStream;

    fn accept(&mut self) -> impl Future<Output = io::Result<(Self::Io, SocketAddr)>> + Send {
        TcpListener::accept(self)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        TcpListener::local_addr(self)
    }
}

/// What the accept loop should do about an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptAction {
    /// The error concerns one connection; accept the next.
    Skip,
    /// The process is out of descriptors or memory; wait, then accept again.
    Backoff,
    /// The listening socket is unusable.
    Fatal,
}

/// Classify an error returned by `accept`.
pub fn classify_accept_error(e: &io::Error) -> AcceptAction {
    use io::ErrorKind::*;

    if matches!(e.raw_os_error(), Some(EMFILE | ENFILE | ENOBUFS)) {
        return AcceptAction::Backoff;
    }

    match e.kind() {
        ConnectionRefused | ConnectionAborted | ConnectionReset | Interrupted | WouldBlock
        | TimedOut | PermissionDenied => AcceptAction::Skip,
        OutOfMemory => AcceptAction::Backoff,
        _ => AcceptAction::Fatal,
    }
}
