//! Configuration file loading.

use crate::error::ConfigError;
use crate::types::SocConfig;
use crate::validate::{validate, ValidatedConfig};
use std::path::Path;

/// File name looked up inside a project directory.
pub const CONFIG_FILE: &str = "pipesoc.toml";

/// Loads and validates `pipesoc.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ValidatedConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<ValidatedConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "loading configuration");
    load_config_from_str(&content)
}

/// Parses a configuration without validating it.
///
/// Used by callers that apply overrides (e.g. CLI flags) before validation.
pub fn parse_config(content: &str) -> Result<SocConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ValidatedConfig, ConfigError> {
    validate(&parse_config(content)?)
}
