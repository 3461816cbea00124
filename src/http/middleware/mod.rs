//! The two request stages: access logging (outermost) and API key auth.

pub mod access_log;
pub mod auth;

pub use access_log::{access_log, AccessRecord};
pub use auth::require_api_key;
