//! MCP capability negotiation during initialization.

use serde_json::Value;

use crate::types::{InitializeParams, InitializeResult, MCP_VERSION};

/// Answer an `initialize` request.
///
/// The result never depends on the client's params; they are only inspected
/// for logging.
pub fn negotiate(params: Option<&Value>) -> InitializeResult {
    let parsed = params
        .cloned()
        .and_then(|p| serde_json::from_value::<InitializeParams>(p).ok())
        .unwrap_or_default();

    if let Some(requested) = parsed.protocol_version.as_deref() {
        if requested != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, server supports {}. Proceeding with server version.",
                requested,
                MCP_VERSION
            );
        }
    }

    match parsed.client_info {
        Some(client) => tracing::info!(
            "Initialized with client: {} v{}",
            client.name,
            client.version
        ),
        None => tracing::info!("Initialized with anonymous client"),
    }

    InitializeResult::default_result()
}
