//! NutriVision MCP Server — food photo nutrition analysis as an MCP tool.

pub mod config;
pub mod protocol;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{resolve_addr, resolve_api_key};
pub use protocol::ProtocolHandler;
pub use transport::{HttpTransport, StdioTransport};
