//! Launching the backend as a child process in its own process group.

use crate::config::LaunchConfig;
use crate::types::SupervisorError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Starts the backend service.
#[async_trait]
pub trait Launcher: Send + Sync {
    type Process: SupervisedProcess;

    async fn launch(&self) -> Result<Self::Process, SupervisorError>;
}

/// A backend process owned by the adapter.
#[async_trait]
pub trait SupervisedProcess: Send + std::fmt::Debug {
    /// OS process id, if the process has not been reaped yet.
    fn id(&self) -> Option<u32>;

    /// Signal the process group to stop and wait up to `grace` for it.
    async fn terminate(&mut self, grace: Duration) -> Result<(), SupervisorError>;
}

/// Launches the configured command with tokio.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    config: LaunchConfig,
}

impl CommandLauncher {
    pub fn new(config: LaunchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Launcher for CommandLauncher {
    type Process = ChildProcess;

    async fn launch(&self) -> Result<ChildProcess, SupervisorError> {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(working_dir) = &self.config.working_dir {
            command.current_dir(working_dir);
        }
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command
            .spawn()
            .map_err(|error| SupervisorError::launch_failed(&self.config.program, error.to_string()))?;
        debug!(program = %self.config.program, pid = ?child.id(), "spawned backend process");

        // stdio belongs to the RPC channel; child output only reaches the log.
        if let Some(stdout) = child.stdout.take() {
            spawn_output_logger("stdout", stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_output_logger("stderr", stderr);
        }

        Ok(ChildProcess { child, released: false })
    }
}

/// Forward each output line of the backend to the debug log.
fn spawn_output_logger<S>(stream: &'static str, output: S)
where
    S: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(output).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(target: "backend", stream, "{line}");
        }
    });
}

/// Handle to a spawned backend; the child leads its own process group.
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
    released: bool,
}

#[async_trait]
impl SupervisedProcess for ChildProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    async fn terminate(&mut self, grace: Duration) -> Result<(), SupervisorError> {
        self.released = true;
        let Some(pid) = self.child.id() else {
            return Ok(());
        };

        if let Err(error) = stop_group(&mut self.child, pid) {
            debug!(%error, "SIGTERM not delivered; reaping anyway");
        }

        match timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => {
                debug!(pid, %status, "backend exited");
                Ok(())
            }
            Ok(Err(error)) => Err(SupervisorError::Wait {
                reason: error.to_string(),
            }),
            Err(_) => {
                warn!(pid, ?grace, "backend ignored SIGTERM; killing process group");
                kill_group(&mut self.child, pid);
                let _ = timeout(grace, self.child.wait()).await;
                Err(SupervisorError::ShutdownTimeout { timeout: grace })
            }
        }
    }
}

impl Drop for ChildProcess {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Some(pid) = self.child.id() {
            let _ = stop_group(&mut self.child, pid);
        }
    }
}

#[cfg(unix)]
fn stop_group(_child: &mut Child, pgid: u32) -> Result<(), SupervisorError> {
    signal_group(pgid, libc::SIGTERM)
}

#[cfg(unix)]
fn kill_group(_child: &mut Child, pgid: u32) {
    if let Err(error) = signal_group(pgid, libc::SIGKILL) {
        debug!(%error, "SIGKILL not delivered");
    }
}

#[cfg(unix)]
fn signal_group(pgid: u32, signal: libc::c_int) -> Result<(), SupervisorError> {
    let group = libc::pid_t::try_from(pgid).map_err(|error| SupervisorError::Signal {
        pgid,
        reason: error.to_string(),
    })?;
    // SAFETY: killpg takes plain integers and touches no memory we own.
    let status = unsafe { libc::killpg(group, signal) };
    if status == 0 {
        Ok(())
    } else {
        Err(SupervisorError::Signal {
            pgid,
            reason: std::io::Error::last_os_error().to_string(),
        })
    }
}

#[cfg(not(unix))]
fn stop_group(child: &mut Child, pgid: u32) -> Result<(), SupervisorError> {
    child.start_kill().map_err(|error| SupervisorError::Signal {
        pgid,
        reason: error.to_string(),
    })
}

#[cfg(not(unix))]
fn kill_group(child: &mut Child, _pgid: u32) {
    let _ = child.start_kill();
}
