//! Core data types for nutrition analysis.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nutrition facts for a single dish as reported by the vision model.
///
/// The server treats model output as opaque JSON; this type is a typed view
/// used for summaries. Unknown keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NutritionRecord {
    /// Interpret a model reply as a nutrition record.
    pub fn from_value(value: &Value) -> VisionResult<Self> {
        serde_json::from_value(value.clone()).map_err(VisionError::Parse)
    }

    /// One-line summary, e.g. `Apple: 95 kcal (P 0.5g / F 0.3g / C 25g)`.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{}: {} kcal (P {}g / F {}g / C {}g)",
            if self.name.is_empty() { "Unknown food" } else { self.name.as_str() },
            self.calories,
            self.protein,
            self.fat,
            self.carbs
        );
        if let Some(serving) = &self.serving_size {
            line.push_str(&format!(" per {serving}"));
        }
        line
    }
}

/// Errors raised by the vision analysis client.
#[derive(thiserror::Error, Debug)]
pub enum VisionError {
    #[error("Vision API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vision API error: {status} {message}")]
    Status { status: u16, message: String },

    #[error("No content in response")]
    NoContent,

    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience result type.
pub type VisionResult<T> = Result<T, VisionError>;
