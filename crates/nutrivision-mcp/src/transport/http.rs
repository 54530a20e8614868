//! HTTP transport — MCP envelopes and legacy image requests on any path, with CORS.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json as AxumJson, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use nutrivision::describe_image_ref;

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult};

/// HTTP transport for web-based MCP clients.
pub struct HttpTransport {
    handler: Arc<ProtocolHandler>,
}

impl HttpTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.handler.clone())
    }

    /// Run the HTTP server on the given address.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("HTTP transport listening on {addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Build the router. Every path accepts POST; OPTIONS is answered by the CORS layer.
///
/// The body limit is lifted: images arrive inline as base64 data URLs.
pub fn build_router(handler: Arc<ProtocolHandler>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(handle_health).fallback(handle_request))
        .fallback(handle_request)
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .with_state(handler)
}

async fn handle_request(
    State(handler): State<Arc<ProtocolHandler>>,
    method: Method,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            AxumJson(json!({ "error": "Method not allowed" })),
        )
            .into_response();
    }

    let body: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Unparsable request body: {e}");
            return internal_error(&e.to_string());
        }
    };

    if body.get("jsonrpc").is_some() {
        return match handler.handle_value(body).await {
            Some(response) => AxumJson(response).into_response(),
            None => StatusCode::ACCEPTED.into_response(),
        };
    }

    if let Some(image) = body
        .get("image")
        .and_then(Value::as_str)
        .filter(|image| !image.is_empty())
    {
        tracing::info!("Legacy analysis request: {}", describe_image_ref(image));
        return match handler.analyzer().analyze(image).await {
            Ok(record) => AxumJson(record).into_response(),
            Err(e) => {
                tracing::error!("Legacy analysis failed: {e}");
                internal_error(&e.to_string())
            }
        };
    }

    (
        StatusCode::BAD_REQUEST,
        AxumJson(json!({ "error": "Invalid request format" })),
    )
        .into_response()
}

fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        AxumJson(json!({
            "error": "Internal server error",
            "message": message
        })),
    )
        .into_response()
}

/// Health check endpoint.
async fn handle_health() -> AxumJson<Value> {
    AxumJson(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
