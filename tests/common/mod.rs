//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use keygate::auth::Credential;
use keygate::config::GateConfig;
use keygate::error::GateError;
use keygate::http::{AppState, HttpServer, ServerState};
use keygate::lifecycle::Shutdown;
use keygate::net::Listener;

pub const TEST_KEY: &str = "test-api-key";

/// Config with a known key and short timeouts.
pub fn test_config(key: Option<&str>) -> GateConfig {
    let mut config = GateConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.auth.api_key = Credential::new(key.map(str::to_string));
    config.timeouts.shutdown_secs = 2;
    config
}

/// A server running on an ephemeral port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub state: watch::Receiver<ServerState>,
    pub handle: JoinHandle<Result<(), GateError>>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to return.
    pub async fn stop(self) -> Result<(), GateError> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(10), self.handle)
            .await
            .expect("server did not stop")
            .expect("server task panicked")
    }
}

pub async fn spawn_server(config: GateConfig) -> RunningServer {
    spawn_server_with_routes(config, Router::new()).await
}

pub async fn spawn_server_with_routes(config: GateConfig, routes: Router<AppState>) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    spawn_server_on(config, routes, listener)
}

pub fn spawn_server_on<L: Listener>(config: GateConfig, routes: Router<AppState>, listener: L) -> RunningServer {
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(Arc::new(config)).with_protected_routes(routes);
    let state = server.state();
    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    let handle = tokio::spawn(server.serve(listener, signal));

    RunningServer {
        addr,
        shutdown,
        state,
        handle,
    }
}

/// Wait until the server reports `target`.
pub async fn wait_for_state(state: &mut watch::Receiver<ServerState>, target: ServerState) {
    tokio::time::timeout(Duration::from_secs(10), state.wait_for(|s| *s == target))
        .await
        .expect("state not reached")
        .expect("server dropped");
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
