//! Data models for adapter configuration.

use jdbc_bridge_api::BackendTimeouts;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Base URL of the delegate service when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8082/mcp";

/// Command that starts the delegate service when it is not already running.
pub const DEFAULT_LAUNCH_COMMAND: &str = "./gradlew bootRun";

/// Fully resolved adapter configuration.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Base URL every backend path is resolved against.
    pub backend_url: Url,

    /// How to start the backend when the health probe fails.
    pub launch: LaunchConfig,

    /// Readiness polling and shutdown bounds.
    pub readiness: ReadinessSettings,

    /// Per-call HTTP timeouts.
    pub timeouts: BackendTimeouts,

    /// Whether diagnostics are written to stderr.
    pub debug: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend url is valid"),
            launch: LaunchConfig::default(),
            readiness: ReadinessSettings::default(),
            timeouts: BackendTimeouts::default(),
            debug: false,
        }
    }
}

/// Command used to launch the backend as a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Program to execute.
    pub program: String,

    /// Arguments passed to the program.
    pub args: Vec<String>,

    /// Working directory; the adapter's own directory when `None`.
    pub working_dir: Option<PathBuf>,
}

impl LaunchConfig {
    /// Split a whitespace-separated command line into program and arguments.
    pub fn from_command_line(command_line: &str) -> Result<Self, ConfigError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ConfigError::EmptyCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
            working_dir: None,
        })
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        let mut words = DEFAULT_LAUNCH_COMMAND.split_whitespace().map(str::to_string);
        Self {
            program: words.next().unwrap_or_default(),
            args: words.collect(),
            working_dir: None,
        }
    }
}

/// Bounds for waiting on and stopping a launched backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessSettings {
    /// Delay between consecutive health probes after launching.
    pub poll_interval: Duration,

    /// Number of probes made after launching before giving up.
    pub max_attempts: u32,

    /// How long to wait for the process group to exit after SIGTERM.
    pub shutdown_timeout: Duration,
}

impl Default for ReadinessSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_attempts: 60,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// Values supplied on the command line; each one wins over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend_url: Option<String>,
    pub backend_command: Option<String>,
    pub backend_dir: Option<PathBuf>,
    pub debug: bool,
}

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid backend URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported backend URL scheme: {0} (expected http)")]
    UnsupportedScheme(String),

    #[error("Backend URL must include a host")]
    MissingHost,

    #[error("Backend launch command cannot be empty")]
    EmptyCommand,
}
