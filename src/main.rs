//! Keygate server
//!
//! ```text
//!     Client Request
//!     ──────────────▶ accept loop ─▶ access log ─▶ /health ─────────▶ {"status":"ok"}
//!                     (timeouts)                  │
//!                                                 └▶ x-api-key check ─▶ 401 | route | 404
//! ```
//!
//! Configuration comes from an optional TOML file (`--config` or
//! `KEYGATE_CONFIG`), then `PORT` and `API_KEY` from the environment,
//! then `--port`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use keygate::config::load_config;
use keygate::lifecycle::startup;
use keygate::observability::logging;

#[derive(Parser)]
#[command(name = "keygate")]
#[command(about = "API-key gate with a health endpoint", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overriding config and PORT
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("keygate: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.listener.host,
        port = config.listener.port,
        api_key_configured = config.auth.api_key.is_configured(),
        "keygate starting"
    );

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "keygate stopped");
            ExitCode::FAILURE
        }
    }
}
