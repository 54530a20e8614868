//! Stdio transport — reads JSON-RPC from stdin, writes to stdout.

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult, RequestId};

use super::framing;

/// Stdio transport for desktop MCP clients.
pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    /// Run the transport loop — reads from stdin, writes to stdout.
    pub async fn run(&self) -> McpResult<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin);
        let mut line = String::new();

        tracing::info!("Stdio transport started");

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await.map_err(McpError::Io)?;

            if bytes_read == 0 {
                tracing::info!("EOF on stdin, shutting down");
                break;
            }

            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(&line).await {
                write_line(&mut stdout, &response).await?;
            }
        }

        Ok(())
    }

    /// Handle one line of input, returning the reply to write, if any.
    pub async fn handle_line(&self, line: &str) -> Option<serde_json::Value> {
        match framing::parse_line(line) {
            Ok(value) => self.handler.handle_value(value).await,
            Err(e) => {
                tracing::warn!("Parse error: {e}");
                serde_json::to_value(e.to_json_rpc_error(RequestId::Null)).ok()
            }
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, value: &serde_json::Value) -> McpResult<()> {
    let framed = framing::frame_message(value)?;
    out.write_all(framed.as_bytes())
        .await
        .map_err(McpError::Io)?;
    out.flush().await.map_err(McpError::Io)?;
    Ok(())
}
