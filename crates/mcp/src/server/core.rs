//! Method dispatch for the MCP adapter.
//!
//! [`McpCore`] turns one decoded [`Request`] into at most one
//! [`JsonRpcResponse`]. Tool failures are not protocol failures: a failed
//! backend call still produces a successful envelope whose result carries
//! `isError: true` and an error-prefixed text block.

use crate::server::catalog::list_operations;
use crate::types::{DispatchError, InitializeResult, JsonRpcResponse, Method, Request, ToolListing};
use jdbc_bridge_api::BackendApi;
use rmcp::model::{CallToolResult, Content};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Routes requests to the handshake, the catalog, or the backend client.
#[derive(Debug)]
pub struct McpCore<B: ?Sized> {
    backend: Arc<B>,
}

impl<B: BackendApi + ?Sized> McpCore<B> {
    /// Create a core handler over a shared backend.
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Handle one request, returning the response to write if it carried an id.
    pub async fn handle_request(&self, request: Request) -> Option<JsonRpcResponse> {
        let outcome = self.dispatch(&request).await;
        let method = request.method.as_deref().unwrap_or("<missing>");

        match (request.id, outcome) {
            (Some(id), Ok(result)) => Some(JsonRpcResponse::success(id, result)),
            (Some(id), Err(error)) => {
                warn!(method, %id, %error, "request failed");
                Some(JsonRpcResponse::failure(Some(id), &error))
            }
            (None, Ok(_)) => {
                debug!(method, "handled notification");
                None
            }
            (None, Err(error)) => {
                debug!(method, %error, "notification failed");
                None
            }
        }
    }

    async fn dispatch(&self, request: &Request) -> Result<Value, DispatchError> {
        let method = Method::parse(request.method.as_deref())?;
        debug!(method = method.as_str(), "dispatching request");
        match method {
            Method::Initialize => self.initialize(),
            Method::ListTools => self.list_tools().await,
            Method::CallTool => self.call_tool(request.params()).await,
        }
    }

    fn initialize(&self) -> Result<Value, DispatchError> {
        Ok(serde_json::to_value(InitializeResult::default())?)
    }

    async fn list_tools(&self) -> Result<Value, DispatchError> {
        let listing = list_operations(self.backend.as_ref()).await;
        Ok(serde_json::to_value(ToolListing::from_descriptors(listing.operations()))?)
    }

    async fn call_tool(&self, params: Map<String, Value>) -> Result<Value, DispatchError> {
        let outcome = match params.get("name") {
            Some(Value::String(name)) => {
                let arguments = match params.get("arguments") {
                    None | Some(Value::Null) => Value::Object(Map::new()),
                    Some(arguments) => arguments.clone(),
                };
                self.backend.invoke(name, arguments).await.map_err(|error| error.to_string())
            }
            _ => Err("Missing operation name".to_string()),
        };

        let result = match outcome {
            Ok(value) => CallToolResult::success(vec![Content::text(render_result(value)?)]),
            Err(message) => {
                warn!(operation = ?params.get("name"), %message, "tool call failed");
                CallToolResult::error(vec![Content::text(format!("Error: {message}"))])
            }
        };
        Ok(serde_json::to_value(result)?)
    }
}

/// Render a backend result as text.
///
/// Objects and arrays are pretty-printed with sorted keys; strings are used
/// as-is and other scalars use their JSON spelling.
pub fn render_result(value: Value) -> Result<String, serde_json::Error> {
    match value {
        Value::String(text) => Ok(text),
        structured @ (Value::Object(_) | Value::Array(_)) => serde_json::to_string_pretty(&sort_keys(structured)),
        scalar => Ok(scalar.to_string()),
    }
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(left, _), (right, _)| left.cmp(right));
            Value::Object(entries.into_iter().map(|(key, value)| (key, sort_keys(value))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
