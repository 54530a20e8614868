//! Main request dispatcher — receives JSON-RPC messages, routes to handlers.

use std::sync::Arc;

use serde_json::Value;

use nutrivision::NutritionAnalyzer;

use crate::tools::ToolRegistry;
use crate::types::*;

use super::negotiation::negotiate;
use super::validator::{validate_request, validate_version};

/// The main protocol handler that dispatches incoming JSON-RPC messages.
///
/// Holds no per-connection state; every message is answered on its own.
#[derive(Clone)]
pub struct ProtocolHandler {
    analyzer: Arc<dyn NutritionAnalyzer>,
}

impl ProtocolHandler {
    pub fn new(analyzer: Arc<dyn NutritionAnalyzer>) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &dyn NutritionAnalyzer {
        self.analyzer.as_ref()
    }

    /// Handle a raw JSON body that has already been identified as JSON-RPC.
    ///
    /// Bodies that do not deserialize into any message shape are answered
    /// with an Invalid Request error, echoing whatever `id` can be recovered.
    /// An `id` that is not a string, number or null is answered with `id: null`
    /// rather than being mistaken for a notification.
    pub async fn handle_value(&self, body: Value) -> Option<Value> {
        match serde_json::from_value::<JsonRpcMessage>(body.clone()) {
            Ok(JsonRpcMessage::Notification(notif)) if body.get("id").is_some() => {
                let err = match validate_version(&notif.jsonrpc) {
                    Err(version_err) => version_err,
                    Ok(()) => McpError::InvalidRequest(
                        "id must be a string, number or null".to_string(),
                    ),
                };
                tracing::warn!("Rejected envelope with malformed id: {err}");
                Some(error_value(&err, RequestId::Null))
            }
            Ok(msg) => self.handle_message(msg).await,
            Err(e) => {
                let id = RequestId::from_raw(&body);
                let jsonrpc = body.get("jsonrpc").and_then(Value::as_str).unwrap_or("");
                let err = match validate_version(jsonrpc) {
                    Err(version_err) => version_err,
                    Ok(()) => McpError::InvalidRequest(e.to_string()),
                };
                tracing::warn!("Rejected malformed envelope (id {id}): {err}");
                Some(error_value(&err, id))
            }
        }
    }

    pub async fn handle_message(&self, msg: JsonRpcMessage) -> Option<Value> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.handle_request(req).await),
            JsonRpcMessage::Notification(notif) => self.handle_notification(notif),
            _ => {
                tracing::warn!("Received unexpected message type from client");
                None
            }
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Value {
        if let Err(e) = validate_request(&request) {
            return error_value(&e, request.id);
        }

        let id = request.id.clone();
        tracing::debug!("MCP call: {} (id: {id})", request.method);
        let result = self.dispatch_request(&request).await;

        match result {
            Ok(value) => serde_json::to_value(JsonRpcResponse::new(id, value)).unwrap_or_default(),
            Err(e) => {
                tracing::debug!("MCP call {} failed: {e}", request.method);
                error_value(&e, id)
            }
        }
    }

    async fn dispatch_request(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params.as_ref()),

            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(request.params.clone()).await,

            "ping" => Ok(Value::Object(serde_json::Map::new())),

            _ => Err(McpError::MethodNotFound(request.method.clone())),
        }
    }

    /// Notifications get no reply unless they carry the wrong protocol version.
    fn handle_notification(&self, notification: JsonRpcNotification) -> Option<Value> {
        if let Err(e) = validate_version(&notification.jsonrpc) {
            return Some(error_value(&e, RequestId::Null));
        }

        match notification.method.as_str() {
            "notifications/initialized" | "initialized" => {
                tracing::info!("MCP handshake complete");
            }
            "notifications/cancelled" | "$/cancelRequest" => {
                tracing::info!("Received cancellation notification");
            }
            _ => {
                tracing::debug!("Unknown notification: {}", notification.method);
            }
        }
        None
    }

    fn handle_initialize(&self, params: Option<&Value>) -> McpResult<Value> {
        let result = negotiate(params);
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_tools_list(&self) -> McpResult<Value> {
        let result = ToolListResult {
            tools: ToolRegistry::list_tools(),
            next_cursor: None,
        };
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> McpResult<Value> {
        let call_params: ToolCallParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| McpError::InvalidParams("Tool call params required".to_string()))?;

        let result =
            ToolRegistry::call(&call_params.name, call_params.arguments, self.analyzer()).await?;

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }
}

fn error_value(err: &McpError, id: RequestId) -> Value {
    serde_json::to_value(err.to_json_rpc_error(id)).unwrap_or_default()
}
