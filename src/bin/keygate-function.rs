//! Function adapter.
//!
//! By default this runs under the Lambda runtime: each event goes through
//! the same decision tree as the server and comes back as a response
//! envelope. `--event <file>` or `--stdin` answers a single event locally,
//! writing the envelope to stdout and logs to stderr.
//!
//! The key comes from the same layered config as the server (`--config`,
//! `KEYGATE_CONFIG`, `API_KEY`).

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;

use keygate::config::load_config;
use keygate::function::{FunctionHandler, InvocationResponse};
use keygate::observability::logging;

#[derive(Parser)]
#[command(name = "keygate-function")]
#[command(about = "Serve invocation events under the Lambda runtime, or answer one locally", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Answer the event in this file and exit
    #[arg(short, long, conflicts_with = "stdin")]
    event: Option<PathBuf>,

    /// Answer one event read from stdin and exit
    #[arg(long)]
    stdin: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("keygate-function: {e}");
            return ExitCode::FAILURE;
        }
    };
    let handler = FunctionHandler::from_config(&config);

    if cli.stdin || cli.event.is_some() {
        logging::init_stderr(&config.observability);
        return run_once(&handler, cli.event.as_deref());
    }

    logging::init(&config.observability);
    if !config.auth.api_key.is_configured() {
        tracing::warn!("No API key configured; every protected request will be rejected");
    }

    let service = service_fn(move |event: LambdaEvent<Value>| {
        let handler = handler.clone();
        async move { Ok::<_, lambda_runtime::Error>(handler.invoke_value(event.payload)) }
    });

    match lambda_runtime::run(service).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Function runtime stopped");
            ExitCode::FAILURE
        }
    }
}

fn run_once(handler: &FunctionHandler, path: Option<&Path>) -> ExitCode {
    let event = match read_event(path) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read invocation event");
            return ExitCode::FAILURE;
        }
    };

    match write_response(&handler.invoke_json(&event)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Failed to write response envelope");
            ExitCode::FAILURE
        }
    }
}

fn read_event(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_response(response: &InvocationResponse) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()
}
