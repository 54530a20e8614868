//! Tool: analyze_food_image — Estimate nutrition facts from a food photo.

use serde_json::{json, Value};

use nutrivision::{describe_image_ref, NutritionAnalyzer};

use crate::types::{McpError, McpResult, ToolDefinition, ToolOutcome};

pub const TOOL_NAME: &str = "analyze_food_image";

/// Prefix for the text of a failed analysis.
pub const ERROR_PREFIX: &str = "Error analyzing food: ";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_NAME.to_string(),
        description: Some(
            "Analyze a food image and return nutrition information: name, description, \
             calories, protein, fat, carbs, fiber, sugar, sodium, serving size and ingredients"
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "imageUrl": {
                    "type": "string",
                    "description": "URL of the food image, or a base64 data URL (data:image/jpeg;base64,...)"
                }
            },
            "required": ["imageUrl"]
        }),
    }
}

/// Pull a non-empty `imageUrl` string out of the tool arguments.
fn image_url(args: &Value) -> McpResult<&str> {
    args.get("imageUrl")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| McpError::InvalidParams("imageUrl is required".to_string()))
}

pub async fn execute(args: Value, analyzer: &dyn NutritionAnalyzer) -> McpResult<ToolOutcome> {
    let image_url = image_url(&args)?;
    tracing::info!("Analyzing food image: {}", describe_image_ref(image_url));

    match analyzer.analyze(image_url).await {
        Ok(record) => Ok(ToolOutcome::Success(record)),
        Err(e) => {
            tracing::warn!("Food analysis failed: {e}");
            Ok(ToolOutcome::Failure(format!("{ERROR_PREFIX}{e}")))
        }
    }
}
