mod catalog;
mod core;
mod schemas;
mod stdio;

pub use catalog::{CatalogListing, list_operations};
pub use core::{McpCore, render_result};
pub use schemas::{operation_parameters, parameters_for_name};
pub use stdio::{DrainReason, ParsedLine, SessionOutcome, SessionState, StdioSession, parse_line, shutdown_signal};
