//! Cleanup and parsing of model replies.

use serde_json::Value;

use crate::types::VisionResult;

/// Remove a surrounding markdown code fence (```` ```json ```` / ```` ``` ````) from a reply.
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }

    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

/// Parse a model reply as JSON after stripping code fences.
pub fn parse_nutrition_reply(text: &str) -> VisionResult<Value> {
    let cleaned = strip_code_fences(text);
    Ok(serde_json::from_str(cleaned)?)
}
