//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file, then PORT / API_KEY from the environment)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → shared via Arc with both dispatch adapters
//! ```
//!
//! # Design Decisions
//! - Config is built once at startup and never reloaded; the API key is fixed for the process
//! - All fields have defaults so an empty environment still starts a server
//! - A missing API key is not a config error: it makes every protected request fail with 401

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AuthConfig, GateConfig, ListenerConfig, LogFormat, ObservabilityConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
