//! MCP tool implementations.

pub mod analyze_food_image;
pub mod registry;

pub use registry::ToolRegistry;
