//! Model Context Protocol (MCP) stdio adapter for the RA2 JDBC service.
//!
//! This crate speaks line-delimited JSON-RPC on stdin/stdout and forwards
//! tool calls to the HTTP delegate service, which it can launch and tear
//! down on its own. It is organised as:
//!
//! - `config`: environment and flag driven settings
//! - `supervisor`: backend process launch, readiness polling, release
//! - `server`: catalog, method dispatch and the stdio session loop
//! - `types`: protocol envelopes, tool descriptors and errors

pub mod config;
pub mod server;
pub mod supervisor;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::{AdapterConfig, ConfigError, ConfigOverrides, load_config};
pub use server::{McpCore, SessionOutcome, StdioSession};
pub use supervisor::{BackendSupervisor, CommandLauncher};
pub use types::{AdapterError, DispatchError, SupervisorError};

use jdbc_bridge_api::BackendClient;
use std::sync::Arc;
use tracing::info;

/// Serve MCP over the process's stdin/stdout until input ends or a
/// shutdown signal arrives.
pub async fn run_stdio_adapter(config: &AdapterConfig) -> Result<SessionOutcome, AdapterError> {
    // Registered before the backend can be launched.
    let shutdown = server::shutdown_signal();
    let backend = Arc::new(BackendClient::new(&config.backend_url, config.timeouts)?);
    info!(backend = %backend.base_url(), "starting MCP stdio adapter");

    let supervisor = BackendSupervisor::new(
        Arc::clone(&backend),
        CommandLauncher::new(config.launch.clone()),
        config.readiness,
    );
    let mut session = StdioSession::new(supervisor, McpCore::new(backend));

    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    let mut writer = tokio::io::stdout();
    let outcome = session.run(reader, &mut writer, shutdown).await?;
    Ok(outcome)
}
