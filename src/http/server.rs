//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Create the axum Router: `/health` open, everything else behind the API key
//! - Wire up the access log and the write timeout
//! - Accept connections and serve each one on its own task
//! - Enforce read and idle timeouts per connection
//! - Drain in-flight requests on shutdown, bounded by the drain timeout

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::ConnectInfo,
    http::{Method, Request},
    middleware,
    routing::any,
    Router,
};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tower::ServiceExt;
use tower_http::timeout::TimeoutLayer;

use crate::auth::Credential;
use crate::config::{GateConfig, TimeoutConfig};
use crate::error::GateError;
use crate::health::{self, MethodPolicy, HEALTH_PATH};
use crate::http::middleware::{access_log, require_api_key};
use crate::http::GateResponse;
use crate::lifecycle::{Shutdown, ShutdownSignal};
use crate::net::{classify_accept_error, AcceptAction, ConnectionId, Listener, TrackedIo, ACCEPT_BACKOFF};
use crate::routing::DispatchError;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GateConfig>,
}

impl AppState {
    pub fn credential(&self) -> &Credential {
        &self.config.auth.api_key
    }
}

/// Where the server is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Idle,
    Listening,
    ShuttingDown,
    Stopped,
}

/// HTTP server for the gate.
pub struct HttpServer {
    config: Arc<GateConfig>,
    protected: Router<AppState>,
    state: watch::Sender<ServerState>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: Arc<GateConfig>) -> Self {
        let (state, _) = watch::channel(ServerState::Idle);
        Self {
            config,
            protected: Router::new(),
            state,
        }
    }

    /// Register routes that require a valid API key.
    pub fn with_protected_routes(mut self, routes: Router<AppState>) -> Self {
        self.protected = self.protected.merge(routes);
        self
    }

    /// Observe lifecycle transitions.
    pub fn state(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Build the axum router with both middleware stages.
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.config), self.protected.clone())
    }

    /// Bind the configured address and serve until `shutdown` fires.
    ///
    /// Bind failures are returned immediately.
    pub async fn run(self, shutdown: ShutdownSignal) -> Result<(), GateError> {
        let listener_config = &self.config.listener;
        let addr = listener_config
            .bind_address()
            .map_err(|e| GateError::InvalidAddress(listener_config.host.clone(), e))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GateError::Bind { addr, source })?;

        self.serve(listener, shutdown).await
    }

    /// Serve connections from an already bound listener.
    ///
    /// Returns `Ok(())` after a signalled shutdown, or the listener error
    /// that forced one. Running out of descriptors is not such an error:
    /// the loop pauses for [`ACCEPT_BACKOFF`] and accepts again.
    pub async fn serve<L: Listener>(self, mut listener: L, mut shutdown: ShutdownSignal) -> Result<(), GateError> {
        let addr = listener.local_addr().map_err(GateError::Accept)?;
        let app = self.router();
        let timeouts = self.config.timeouts.clone();
        let drain = Shutdown::new();
        let mut connections = JoinSet::new();

        self.transition(ServerState::Listening);
        tracing::info!(
            address = %addr,
            read_timeout_secs = timeouts.read_secs,
            write_timeout_secs = timeouts.write_secs,
            idle_timeout_secs = timeouts.idle_secs,
            "HTTP server listening"
        );

        let outcome = loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        connections.spawn(serve_connection(
                            stream,
                            remote,
                            app.clone(),
                            timeouts.clone(),
                            drain.subscribe(),
                        ));
                    }
                    Err(e) => match classify_accept_error(&e) {
                        AcceptAction::Skip => {
                            tracing::debug!(error = %e, "Connection failed during accept");
                        }
                        AcceptAction::Backoff => {
                            tracing::error!(
                                error = %e,
                                backoff_ms = ACCEPT_BACKOFF.as_millis() as u64,
                                "Accept failed, backing off"
                            );
                            tokio::select! {
                                _ = tokio::time::sleep(ACCEPT_BACKOFF) => {}
                                _ = shutdown.recv() => {
                                    tracing::info!("Shutdown signal received");
                                    break Ok(());
                                }
                            }
                        }
                        AcceptAction::Fatal => {
                            tracing::error!(error = %e, "Listener failed");
                            break Err(GateError::Accept(e));
                        }
                    },
                },
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received");
                    break Ok(());
                }
            }
        };

        self.transition(ServerState::ShuttingDown);
        drop(listener);
        drain.trigger();

        let deadline = timeouts.shutdown();
        tracing::info!(
            connections = connections.len(),
            timeout_secs = deadline.as_secs(),
            "Draining connections"
        );

        let drained = tokio::time::timeout(deadline, async {
            while connections.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                remaining = connections.len(),
                "Drain timeout elapsed, closing remaining connections"
            );
            connections.shutdown().await;
        }

        self.transition(ServerState::Stopped);
        tracing::info!("HTTP server stopped");
        outcome
    }

    fn transition(&self, next: ServerState) {
        let previous = self.state.send_replace(next);
        tracing::debug!(from = ?previous, to = ?next, "Server state changed");
    }
}

/// Assemble the router.
///
/// Layers, outermost first: access log, write timeout, then either the
/// health handler or the API key check in front of `protected` and the
/// 404 fallback.
#[allow(deprecated)]
pub fn build_router(config: Arc<GateConfig>, protected: Router<AppState>) -> Router {
    let write_timeout = config.timeouts.write();
    let state = AppState { config };

    let protected = protected
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route(HEALTH_PATH, any(health_handler))
        .merge(protected)
        .layer(TimeoutLayer::new(write_timeout))
        .layer(middleware::from_fn(access_log))
        .with_state(state)
}

async fn health_handler(method: Method) -> GateResponse {
    health::respond(method.as_str(), MethodPolicy::Enforce).unwrap_or_else(GateResponse::from)
}

async fn not_found() -> DispatchError {
    DispatchError::NotFound
}

/// Serve one connection until it closes, idles out, or shutdown drains it.
async fn serve_connection<S>(
    stream: S,
    remote: SocketAddr,
    app: Router,
    timeouts: TimeoutConfig,
    mut shutdown: ShutdownSignal,
) where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let id = ConnectionId::new();
    let io = TrackedIo::new(stream);
    let activity = io.activity();
    tracing::trace!(connection_id = %id, remote = %remote, "Connection accepted");

    let service = hyper::service::service_fn(move |mut request: Request<Incoming>| {
        request.extensions_mut().insert(ConnectInfo(remote));
        app.clone().oneshot(request)
    });

    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .header_read_timeout(timeouts.read())
        .keep_alive(true);

    let conn = builder.serve_connection(TokioIo::new(io), service);
    tokio::pin!(conn);

    let idle_timeout = timeouts.idle();
    let mut idle_check = tokio::time::interval(idle_check_period(idle_timeout));
    let mut draining = false;

    loop {
        tokio::select! {
            result = conn.as_mut() => {
                if let Err(e) = result {
                    tracing::debug!(connection_id = %id, error = %e, "Connection error");
                }
                break;
            }
            _ = shutdown.recv(), if !draining => {
                draining = true;
                conn.as_mut().graceful_shutdown();
            }
            _ = idle_check.tick(), if !draining => {
                if activity.idle_for() >= idle_timeout {
                    tracing::debug!(connection_id = %id, "Closing idle connection");
                    draining = true;
                    conn.as_mut().graceful_shutdown();
                }
            }
        }
    }

    tracing::trace!(connection_id = %id, "Connection closed");
}

fn idle_check_period(idle_timeout: Duration) -> Duration {
    (idle_timeout / 4).max(Duration::from_millis(10))
}
