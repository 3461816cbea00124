//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::auth::Credential;
use crate::config::schema::GateConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "KEYGATE_CONFIG";
/// Environment variable overriding `listener.port`.
pub const PORT_ENV: &str = "PORT";
/// Environment variable carrying the expected API key.
pub const API_KEY_ENV: &str = "API_KEY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load and validate configuration.
///
/// Sources, lowest priority first: defaults, the TOML file at `path`
/// (or `$KEYGATE_CONFIG`), then `PORT` and `API_KEY`.
pub fn load_config(path: Option<&Path>) -> Result<GateConfig, ConfigError> {
    let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let mut config = match path.or(env_path.as_deref()) {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_config(&content)?
        }
        None => GateConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML document. Missing sections fall back to defaults.
pub fn parse_config(content: &str) -> Result<GateConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Apply `PORT` and `API_KEY` overrides using `lookup` to read variables.
///
/// Empty values are ignored, matching how an empty `API_KEY` means
/// "not configured".
pub fn apply_env_overrides<F>(config: &mut GateConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup(PORT_ENV).filter(|v| !v.is_empty()) {
        config.listener.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
            name: PORT_ENV,
            value: port.clone(),
        })?;
    }

    if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
        config.auth.api_key = Credential::new(Some(key));
    }

    Ok(())
}
