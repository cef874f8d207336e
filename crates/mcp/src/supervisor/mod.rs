//! Supervision of the backend service process.

mod lifecycle;
mod process;

pub use lifecycle::{BackendSupervisor, Readiness};
pub use process::{ChildProcess, CommandLauncher, Launcher, SupervisedProcess};
