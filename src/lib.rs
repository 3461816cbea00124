//! Keygate: an API-key gate with a health probe, served over HTTP or
//! invoked one event at a time.

pub mod auth;
pub mod config;
pub mod error;
pub mod function;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::GateConfig;
pub use error::GateError;
pub use function::FunctionHandler;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
