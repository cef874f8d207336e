//! Shared types for the MCP adapter.

pub mod errors;
pub mod protocol;
pub mod tools;

pub use errors::{AdapterError, DispatchError, INTERNAL_ERROR_CODE, SupervisorError};
pub use protocol::{InitializeResult, JsonRpcResponse, Method, PROTOCOL_VERSION, Request, RequestId, ResponseOutcome, SERVER_NAME, SERVER_VERSION};
pub use tools::{OperationDescriptor, ParameterSpec, ParameterType, ToolListing};
