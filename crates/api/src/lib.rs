//! Client for the RA2 JDBC delegate service.
//!
//! The delegate is a plain HTTP service that performs the actual user and
//! database work. This crate focuses on:
//!
//! - Building a `reqwest` client with per-call timeouts
//! - Mapping an [`Operation`] name plus JSON arguments onto a `POST` call
//! - Folding every transport or status failure into [`BackendError`]
//!
//! The primary entry point is [`BackendClient`]; callers that need to stay
//! testable without a network depend on the [`BackendApi`] trait instead.

mod error;
mod operation;

pub use error::BackendError;
pub use operation::Operation;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Per-call timeouts applied to the three kinds of backend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTimeouts {
    pub health: Duration,
    pub listing: Duration,
    pub call: Duration,
}

impl Default for BackendTimeouts {
    fn default() -> Self {
        Self {
            health: Duration::from_secs(2),
            listing: Duration::from_secs(5),
            call: Duration::from_secs(30),
        }
    }
}

/// Name and description of one operation as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSummary {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OperationListing {
    #[serde(default, alias = "tools")]
    operations: Vec<OperationSummary>,
}

/// Capabilities the adapter needs from the delegate service.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Probe the health endpoint; any failure counts as not ready.
    async fn check_health(&self) -> bool;

    /// Fetch the operations the backend currently advertises.
    async fn fetch_operations(&self) -> Result<Vec<OperationSummary>, BackendError>;

    /// Invoke one operation with arguments passed through verbatim.
    async fn invoke(&self, operation_name: &str, arguments: Value) -> Result<Value, BackendError>;
}

/// Thin wrapper around a `reqwest::Client` bound to the backend base URL.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
    timeouts: BackendTimeouts,
}

impl BackendClient {
    /// Construct a client for the backend rooted at `base_url`.
    pub fn new(base_url: &Url, timeouts: BackendTimeouts) -> Result<Self, BackendError> {
        let http = Client::builder()
            .user_agent(concat!("jdbc-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(BackendError::connection)?;
        Ok(Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            http,
            timeouts,
        })
    }

    /// Base URL every request path is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for a backend-relative path.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, %method, "building backend request");
        self.http.request(method, url)
    }
}

#[async_trait]
impl BackendApi for BackendClient {
    async fn check_health(&self) -> bool {
        match self.request(Method::GET, "/health").timeout(self.timeouts.health).send().await {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                debug!(%error, "health probe failed");
                false
            }
        }
    }

    async fn fetch_operations(&self) -> Result<Vec<OperationSummary>, BackendError> {
        let response = self
            .request(Method::GET, "/tools")
            .timeout(self.timeouts.listing)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(remote_error(status.as_u16(), &body));
        }
        let listing: OperationListing =
            serde_json::from_str(&body).map_err(|error| BackendError::MalformedResponse(error.to_string()))?;
        Ok(listing.operations)
    }

    async fn invoke(&self, operation_name: &str, arguments: Value) -> Result<Value, BackendError> {
        let operation: Operation = operation_name.parse()?;
        let response = self
            .request(Method::POST, &operation.endpoint())
            .timeout(self.timeouts.call)
            .json(&arguments)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%operation, status = status.as_u16(), bytes = body.len(), "backend call finished");
        if !status.is_success() {
            return Err(remote_error(status.as_u16(), &body));
        }
        parse_result_body(&body)
    }
}

/// Build the error for a non-success response.
///
/// A JSON body with an `error` member supplies the message; anything else
/// falls back to a status-code message.
fn remote_error(status: u16, body: &str) -> BackendError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| match value.get("error") {
            Some(Value::String(message)) => Some(message.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_else(|| format!("HTTP error {status}"));
    BackendError::remote(status, message)
}

/// Interpret a success body: `{ "result": .. }` unwraps, any other JSON is
/// the result itself, and an empty body is `null`.
fn parse_result_body(body: &str) -> Result<Value, BackendError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_str(body).map_err(|error| BackendError::MalformedResponse(error.to_string()))?;
    Ok(match value {
        Value::Object(mut map) if map.contains_key("result") => map.remove("result").unwrap_or(Value::Null),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use serde_json::json;

    async fn spawn_backend(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, Router::new().nest("/mcp", router)).await;
        });
        Url::parse(&format!("http://{address}/mcp")).unwrap()
    }

    async fn unused_base_url() -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        Url::parse(&format!("http://{address}/mcp")).unwrap()
    }

    fn client(base_url: &Url) -> BackendClient {
        BackendClient::new(base_url, BackendTimeouts::default()).unwrap()
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let url = Url::parse("http://localhost:8082/mcp/").unwrap();
        assert_eq!(client(&url).base_url(), "http://localhost:8082/mcp");
    }

    #[test]
    fn result_member_is_unwrapped() {
        let value = parse_result_body(r#"{"tool":"find_user_by_id","result":{"id":1},"status":"success"}"#).unwrap();
        assert_eq!(value, json!({"id": 1}));
    }

    #[test]
    fn bodies_without_result_are_returned_whole() {
        assert_eq!(parse_result_body(r#"{"count":3}"#).unwrap(), json!({"count": 3}));
        assert_eq!(parse_result_body("[1,2]").unwrap(), json!([1, 2]));
        assert_eq!(parse_result_body("  ").unwrap(), Value::Null);
    }

    #[test]
    fn garbled_success_body_is_rejected() {
        let error = parse_result_body("<html>oops</html>").unwrap_err();
        assert!(matches!(error, BackendError::MalformedResponse(_)));
    }

    #[test]
    fn remote_error_prefers_structured_message() {
        assert_eq!(
            remote_error(500, r#"{"error":"Error buscando usuario: not found","status":"error"}"#),
            BackendError::remote(500, "Error buscando usuario: not found")
        );
        assert_eq!(remote_error(502, "Bad Gateway"), BackendError::remote(502, "HTTP error 502"));
        assert_eq!(remote_error(400, r#"{"error":{"field":"email"}}"#).to_string(), r#"{"field":"email"}"#);
    }

    #[tokio::test]
    async fn health_probe_reports_ready_backend() {
        let base = spawn_backend(Router::new().route("/health", get(|| async { "UP" }))).await;
        assert!(client(&base).check_health().await);
    }

    #[tokio::test]
    async fn health_probe_reports_unreachable_and_failing_backends() {
        assert!(!client(&unused_base_url().await).check_health().await);

        let base = spawn_backend(Router::new().route("/health", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))).await;
        assert!(!client(&base).check_health().await);
    }

    #[tokio::test]
    async fn fetch_operations_accepts_native_tools_listing() {
        let base = spawn_backend(Router::new().route(
            "/tools",
            get(|| async {
                axum::Json(json!({
                    "tools": [
                        {"name": "create_user", "description": "Creates a user"},
                        {"name": "mystery"}
                    ],
                    "count": 2
                }))
            }),
        ))
        .await;

        let operations = client(&base).fetch_operations().await.unwrap();
        assert_eq!(operations.len(), 2);
        assert_eq!(operations[0].name, "create_user");
        assert_eq!(operations[0].description.as_deref(), Some("Creates a user"));
        assert_eq!(operations[1].description, None);
    }

    #[tokio::test]
    async fn fetch_operations_surfaces_status_failures() {
        let base = spawn_backend(Router::new().route("/tools", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))).await;
        let error = client(&base).fetch_operations().await.unwrap_err();
        assert!(matches!(error, BackendError::Remote { status: 500, .. }));
    }

    #[tokio::test]
    async fn invoke_passes_arguments_through_verbatim() {
        let base = spawn_backend(Router::new().route(
            "/create_user",
            post(|axum::Json(body): axum::Json<Value>| async move { axum::Json(json!({"result": body, "status": "success"})) }),
        ))
        .await;

        let arguments = json!({"name": "Ana", "email": "ana@example.com", "extra": [1, 2]});
        let result = client(&base).invoke("create_user", arguments.clone()).await.unwrap();
        assert_eq!(result, arguments);
    }

    #[tokio::test]
    async fn invoke_maps_non_success_status_to_remote_error() {
        let base = spawn_backend(Router::new().route(
            "/delete_user",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(json!({"error": "user 9 not found"}))) }),
        ))
        .await;

        let error = client(&base).invoke("delete_user", json!({"userId": 9})).await.unwrap_err();
        assert_eq!(error, BackendError::remote(500, "user 9 not found"));
    }

    #[tokio::test]
    async fn invoke_rejects_unmapped_names_without_calling_out() {
        let error = client(&unused_base_url().await).invoke("drop_everything", json!({})).await.unwrap_err();
        assert_eq!(error, BackendError::UnknownOperation("drop_everything".into()));
    }

    #[tokio::test]
    async fn invoke_reports_unreachable_backend_as_connection_error() {
        let error = client(&unused_base_url().await).invoke("test_connection", json!({})).await.unwrap_err();
        assert!(matches!(error, BackendError::Connection(_)));
        assert!(error.to_string().starts_with("Connection error:"));
    }
}
