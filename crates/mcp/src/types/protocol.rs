//! JSON-RPC envelopes exchanged over the stdio channel.

use crate::types::DispatchError;
use rmcp::model::ErrorData;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Protocol revision announced during the handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Identity announced during the handshake.
pub const SERVER_NAME: &str = "mcp-server-ra2-jdbc";

/// Version announced alongside [`SERVER_NAME`]; stays fixed across crate releases.
pub const SERVER_VERSION: &str = "1.0.0";

/// Correlation token supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(Number),
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(number) => write!(f, "{number}"),
            RequestId::String(text) => f.write_str(text),
        }
    }
}

/// One decoded input line.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
    #[serde(default)]
    pub id: Option<RequestId>,
}

impl Request {
    /// Whether the caller expects a response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Request parameters; absent params read as an empty object.
    pub fn params(&self) -> Map<String, Value> {
        self.params.clone().unwrap_or_default()
    }
}

/// Protocol-facing methods the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ListTools,
    CallTool,
}

impl Method {
    /// Resolve a method name; anything outside the closed set is unsupported.
    pub fn parse(name: Option<&str>) -> Result<Self, DispatchError> {
        match name {
            Some("initialize") => Ok(Method::Initialize),
            Some("tools/list") => Ok(Method::ListTools),
            Some("tools/call") => Ok(Method::CallTool),
            Some(other) => Err(DispatchError::UnsupportedMethod(other.to_string())),
            None => Err(DispatchError::UnsupportedMethod("<missing>".to_string())),
        }
    }

    /// Wire name of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Initialize => "initialize",
            Method::ListTools => "tools/list",
            Method::CallTool => "tools/call",
        }
    }
}

/// Outcome half of a response envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseOutcome {
    Result(Value),
    Error(ErrorData),
}

/// A complete JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<RequestId>,
    #[serde(flatten)]
    outcome: ResponseOutcome,
}

impl JsonRpcResponse {
    /// Success envelope correlated to `id`.
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id: Some(id),
            outcome: ResponseOutcome::Result(result),
        }
    }

    /// Failure envelope; `id` is `None` only when no request could be read.
    pub fn failure(id: Option<RequestId>, error: &DispatchError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            outcome: ResponseOutcome::Error(error.to_error_data()),
        }
    }

    pub fn id(&self) -> Option<&RequestId> {
        self.id.as_ref()
    }

    pub fn outcome(&self) -> &ResponseOutcome {
        &self.outcome
    }

    /// Serialize as a single line without the trailing newline.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Result of the `initialize` handshake.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: &'static str,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerIdentity,
}

impl Default for InitializeResult {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            capabilities: ServerCapabilities { tools: ToolsCapability {} },
            server_info: ServerIdentity {
                name: SERVER_NAME,
                version: SERVER_VERSION,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Clone, Serialize)]
pub struct ServerIdentity {
    pub name: &'static str,
    pub version: &'static str,
}
