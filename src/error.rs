//! Fatal errors: anything that stops the process from serving.

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("invalid bind address {0:?}: {1}")]
    InvalidAddress(String, AddrParseError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("listener failed: {0}")]
    Accept(#[source] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
