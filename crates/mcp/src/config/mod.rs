//! Configuration for the adapter.
//! Values are resolved from `MCP_*` environment variables and then
//! overridden by command-line flags.

mod env;
mod model;
mod validation;

pub use env::{BACKEND_COMMAND_ENV, BACKEND_DIR_ENV, BACKEND_URL_ENV, DEBUG_ENV, debug_enabled_from_env, load_config};
pub use model::{
    AdapterConfig, ConfigError, ConfigOverrides, DEFAULT_BACKEND_URL, DEFAULT_LAUNCH_COMMAND, LaunchConfig, ReadinessSettings,
};
pub use validation::validate_backend_url;
