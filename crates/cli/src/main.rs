use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use jdbc_bridge_mcp::{ConfigOverrides, load_config, run_stdio_adapter};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Serve the RA2 JDBC delegate service as MCP tools over stdin/stdout.
#[derive(Debug, Parser)]
#[command(name = "jdbc-bridge", version, about)]
struct Args {
    /// Backend base URL [env: MCP_BACKEND_URL] [default: http://localhost:8082/mcp]
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,

    /// Command line used to launch the backend when it is not running [env: MCP_BACKEND_COMMAND]
    #[arg(long, value_name = "COMMAND")]
    backend_command: Option<String>,

    /// Working directory for the launched backend [env: MCP_BACKEND_DIR]
    #[arg(long, value_name = "DIR")]
    backend_dir: Option<PathBuf>,

    /// Write diagnostics to stderr [env: MCP_DEBUG]
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            backend_url: self.backend_url,
            backend_command: self.backend_command,
            backend_dir: self.backend_dir,
            debug: self.debug,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            eprintln!("jdbc-bridge: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<u8> {
    let config = load_config(&Args::parse().into_overrides()).context("invalid adapter configuration")?;
    init_tracing(config.debug);
    debug!(?config, "resolved adapter configuration");

    let outcome = run_stdio_adapter(&config).await.context("adapter stopped unexpectedly")?;
    Ok(outcome.exit_code())
}

/// Diagnostics go to stderr only, and only in debug mode; stdout carries the protocol.
fn init_tracing(debug: bool) {
    if !debug {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
