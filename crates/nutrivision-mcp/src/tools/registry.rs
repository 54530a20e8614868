//! Tool registration and dispatch.

use serde_json::Value;

use nutrivision::NutritionAnalyzer;

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::analyze_food_image;

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![analyze_food_image::definition()]
    }

    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        analyzer: &dyn NutritionAnalyzer,
    ) -> McpResult<ToolCallResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            analyze_food_image::TOOL_NAME => {
                Ok(analyze_food_image::execute(args, analyzer).await?.into())
            }
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}
