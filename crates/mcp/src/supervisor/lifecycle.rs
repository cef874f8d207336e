//! Backend lifecycle: detect, launch, wait for readiness, release.

use super::process::{Launcher, SupervisedProcess};
use crate::config::ReadinessSettings;
use crate::types::SupervisorError;
use jdbc_bridge_api::BackendApi;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// How the backend came to be ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// A backend was already answering; nothing was launched.
    AlreadyRunning,
    /// The adapter launched the backend and it became healthy after
    /// `attempts` polling probes.
    Launched { attempts: u32 },
}

/// Owns the at-most-one backend process the adapter launched.
///
/// A backend found already running is never adopted, so releasing only
/// ever touches a process this supervisor spawned.
#[derive(Debug)]
pub struct BackendSupervisor<B: ?Sized, L: Launcher> {
    /// Health probe target.
    backend: Arc<B>,

    /// Spawns the backend on demand.
    launcher: L,

    /// Polling and shutdown timing.
    settings: ReadinessSettings,

    /// Handle to the launched backend, if any.
    process: Option<L::Process>,
}

impl<B, L> BackendSupervisor<B, L>
where
    B: BackendApi + ?Sized,
    L: Launcher,
{
    pub fn new(backend: Arc<B>, launcher: L, settings: ReadinessSettings) -> Self {
        Self {
            backend,
            launcher,
            settings,
            process: None,
        }
    }

    /// Whether a launched backend is still held.
    pub fn owns_process(&self) -> bool {
        self.process.is_some()
    }

    /// Make sure a healthy backend is reachable, launching one if needed.
    ///
    /// After a failed wait the launched child stays owned so that
    /// [`release_backend`](Self::release_backend) can still stop it.
    pub async fn ensure_backend_ready(&mut self) -> Result<Readiness, SupervisorError> {
        if self.backend.check_health().await {
            debug!("backend already running");
            return Ok(Readiness::AlreadyRunning);
        }

        if self.process.is_none() {
            info!("backend not reachable; launching it");
            let process = self.launcher.launch().await?;
            debug!(pid = ?process.id(), "backend process started");
            self.process = Some(process);
        }

        let max_attempts = self.settings.max_attempts;
        for attempt in 1..=max_attempts {
            if self.backend.check_health().await {
                info!(attempt, "backend is ready");
                return Ok(Readiness::Launched { attempts: attempt });
            }
            if attempt % 5 == 1 {
                debug!(attempt, max_attempts, "waiting for backend");
            }
            if attempt < max_attempts {
                sleep(self.settings.poll_interval).await;
            }
        }

        warn!(max_attempts, "backend never became healthy");
        Err(SupervisorError::NotReady { attempts: max_attempts })
    }

    /// Stop the launched backend, if any. Safe to call repeatedly.
    ///
    /// Returns whether a process was released. Termination errors are only
    /// logged.
    pub async fn release_backend(&mut self) -> bool {
        let Some(mut process) = self.process.take() else {
            debug!("no launched backend to release");
            return false;
        };

        debug!(pid = ?process.id(), "releasing backend");
        if let Err(error) = process.terminate(self.settings.shutdown_timeout).await {
            debug!(%error, "backend release reported an error");
        }
        true
    }
}
