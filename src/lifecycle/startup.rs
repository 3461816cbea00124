//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Install the signal listener
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Config is already validated by the time it gets here
//! - A metrics exporter that fails to start is logged, not fatal
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::GateConfig;
use crate::error::GateError;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Run the gate until a termination signal arrives and the drain finishes.
pub async fn run(config: GateConfig) -> Result<(), GateError> {
    if !config.auth.api_key.is_configured() {
        tracing::warn!("No API key configured; every protected request will be rejected");
    }

    if config.observability.metrics_enabled {
        start_metrics(&config.observability.metrics_address);
    }

    let shutdown = Shutdown::new();
    let _signals = signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(Arc::new(config));
    server.run(shutdown.subscribe()).await
}

fn start_metrics(address: &str) {
    match address.parse::<SocketAddr>() {
        Ok(addr) => {
            if let Err(e) = metrics::init_metrics(addr) {
                tracing::error!(error = %e, "Failed to start metrics exporter");
            }
        }
        Err(e) => {
            tracing::error!(metrics_address = %address, error = %e, "Failed to parse metrics address");
        }
    }
}
