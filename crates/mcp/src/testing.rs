//! In-memory doubles shared by the unit tests.

use crate::supervisor::{Launcher, SupervisedProcess};
use crate::types::SupervisorError;
use async_trait::async_trait;
use jdbc_bridge_api::{BackendApi, BackendError, Operation, OperationSummary};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scriptable stand-in for the delegate service.
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    operations: Vec<OperationSummary>,
    listing_error: Option<BackendError>,
    responses: HashMap<String, Result<Value, BackendError>>,
    healthy_from_probe: Option<usize>,
    health_probes: AtomicUsize,
    listing_calls: AtomicUsize,
    invocations: Mutex<Vec<(String, Value)>>,
}

impl FakeBackend {
    pub(crate) fn with_operations(operations: &[(&str, &str)]) -> Self {
        Self {
            operations: operations
                .iter()
                .map(|(name, description)| OperationSummary {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn with_listing_error(mut self, error: BackendError) -> Self {
        self.listing_error = Some(error);
        self
    }

    pub(crate) fn with_response(mut self, name: &str, response: Result<Value, BackendError>) -> Self {
        self.responses.insert(name.to_string(), response);
        self
    }

    /// Health probes succeed from the `probe`-th call onwards (1-based).
    pub(crate) fn healthy_from_probe(mut self, probe: usize) -> Self {
        self.healthy_from_probe = Some(probe);
        self
    }

    pub(crate) fn health_probes(&self) -> usize {
        self.health_probes.load(Ordering::SeqCst)
    }

    pub(crate) fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn invocations(&self) -> Vec<(String, Value)> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn check_health(&self) -> bool {
        let probe = self.health_probes.fetch_add(1, Ordering::SeqCst) + 1;
        self.healthy_from_probe.is_some_and(|first_healthy| probe >= first_healthy)
    }

    async fn fetch_operations(&self) -> Result<Vec<OperationSummary>, BackendError> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        match &self.listing_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.operations.clone()),
        }
    }

    async fn invoke(&self, operation_name: &str, arguments: Value) -> Result<Value, BackendError> {
        self.invocations
            .lock()
            .unwrap()
            .push((operation_name.to_string(), arguments.clone()));
        let operation: Operation = operation_name.parse()?;
        match self.responses.get(operation.name()) {
            Some(response) => response.clone(),
            None => Ok(arguments),
        }
    }
}

/// Launcher that hands out counted stand-in processes.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeLauncher {
    launches: Arc<AtomicUsize>,
    terminations: Arc<AtomicUsize>,
    fail_launch: bool,
    fail_termination: bool,
}

impl FakeLauncher {
    pub(crate) fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub(crate) fn failing_termination(mut self) -> Self {
        self.fail_termination = true;
        self
    }

    pub(crate) fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub(crate) fn terminations(&self) -> usize {
        self.terminations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    type Process = FakeProcess;

    async fn launch(&self) -> Result<FakeProcess, SupervisorError> {
        if self.fail_launch {
            return Err(SupervisorError::launch_failed("./gradlew", "No such file or directory"));
        }
        let pid = 4000 + self.launches.fetch_add(1, Ordering::SeqCst) as u32;
        Ok(FakeProcess {
            pid,
            terminations: Arc::clone(&self.terminations),
            fail_termination: self.fail_termination,
        })
    }
}

#[derive(Debug)]
pub(crate) struct FakeProcess {
    pid: u32,
    terminations: Arc<AtomicUsize>,
    fail_termination: bool,
}

#[async_trait]
impl SupervisedProcess for FakeProcess {
    fn id(&self) -> Option<u32> {
        Some(self.pid)
    }

    async fn terminate(&mut self, grace: Duration) -> Result<(), SupervisorError> {
        self.terminations.fetch_add(1, Ordering::SeqCst);
        if self.fail_termination {
            return Err(SupervisorError::ShutdownTimeout { timeout: grace });
        }
        Ok(())
    }
}
