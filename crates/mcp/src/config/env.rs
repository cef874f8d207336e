//! Environment-driven configuration loading.

use crate::config::model::{AdapterConfig, ConfigOverrides, LaunchConfig};
use crate::config::{ConfigError, DEFAULT_BACKEND_URL, validate_backend_url};
use std::env;
use std::path::PathBuf;

/// Environment variable holding the backend base URL.
pub const BACKEND_URL_ENV: &str = "MCP_BACKEND_URL";
/// Environment variable holding the backend launch command line.
pub const BACKEND_COMMAND_ENV: &str = "MCP_BACKEND_COMMAND";
/// Environment variable holding the launch working directory.
pub const BACKEND_DIR_ENV: &str = "MCP_BACKEND_DIR";
/// Environment variable switching on stderr diagnostics.
pub const DEBUG_ENV: &str = "MCP_DEBUG";

/// Resolve configuration from the environment, then apply CLI overrides.
pub fn load_config(overrides: &ConfigOverrides) -> Result<AdapterConfig, ConfigError> {
    let url_value = overrides
        .backend_url
        .clone()
        .or_else(|| non_empty_var(BACKEND_URL_ENV))
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
    let backend_url = validate_backend_url(&url_value)?;

    let mut launch = match overrides.backend_command.clone().or_else(|| non_empty_var(BACKEND_COMMAND_ENV)) {
        Some(command_line) => LaunchConfig::from_command_line(&command_line)?,
        None => LaunchConfig::default(),
    };
    launch.working_dir = overrides
        .backend_dir
        .clone()
        .or_else(|| non_empty_var(BACKEND_DIR_ENV).map(PathBuf::from));

    Ok(AdapterConfig {
        backend_url,
        launch,
        debug: overrides.debug || debug_enabled_from_env(),
        ..AdapterConfig::default()
    })
}

/// Whether `MCP_DEBUG` is set to `1`, `true` or `yes` (any case).
pub fn debug_enabled_from_env() -> bool {
    env::var(DEBUG_ENV).map(|value| is_truthy(&value)).unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
