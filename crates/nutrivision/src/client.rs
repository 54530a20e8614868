//! Vision analysis client — sends a food image to a multimodal chat-completion endpoint.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::image::describe_image_ref;
use crate::reply::parse_nutrition_reply;
use crate::types::{VisionError, VisionResult};

/// Default chat-completion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default vision-capable model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default completion token budget.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Instruction sent alongside every image.
pub const NUTRITION_PROMPT: &str = "\
Analyze this food image and provide detailed nutrition information. \
Return ONLY a valid JSON object with exactly these fields:\n\
{\n\
  \"name\": \"name of the food or dish\",\n\
  \"description\": \"brief description of the food\",\n\
  \"calories\": number (total kcal),\n\
  \"protein\": number (grams),\n\
  \"fat\": number (grams),\n\
  \"carbs\": number (grams),\n\
  \"fiber\": number (grams),\n\
  \"sugar\": number (grams),\n\
  \"sodium\": number (milligrams),\n\
  \"servingSize\": \"estimated serving size\",\n\
  \"ingredients\": [\"list\", \"of\", \"visible\", \"ingredients\"]\n\
}\n\
Do not wrap the JSON in markdown or code blocks and do not add any other text.";

/// Settings for the outbound vision call.
#[derive(Clone)]
pub struct VisionConfig {
    /// Bearer credential. May be empty; the remote service rejects the call then.
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
}

impl VisionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl std::fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Anything that can turn an image reference into nutrition data.
#[async_trait]
pub trait NutritionAnalyzer: Send + Sync {
    /// Analyze an image URL or base64 data URL and return the parsed model reply.
    async fn analyze(&self, image_url: &str) -> VisionResult<Value>;
}

/// Client for a chat-completion endpoint that accepts image input.
#[derive(Debug, Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    config: VisionConfig,
}

impl VisionClient {
    pub fn new(config: VisionConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    pub fn with_http_client(config: VisionConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Chat-completion body: one user message with the instruction and the image.
    pub fn request_body(&self, image_url: &str) -> Value {
        json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": NUTRITION_PROMPT },
                    { "type": "image_url", "image_url": { "url": image_url } }
                ]
            }],
            "max_tokens": self.config.max_tokens
        })
    }
}

#[async_trait]
impl NutritionAnalyzer for VisionClient {
    async fn analyze(&self, image_url: &str) -> VisionResult<Value> {
        tracing::debug!(
            "Requesting nutrition analysis from {} ({}) for {}",
            self.config.endpoint,
            self.config.model,
            describe_image_ref(image_url)
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(image_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!("Vision API returned {status}");
            return Err(VisionError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .filter(|c| !c.is_empty())
            .ok_or(VisionError::NoContent)?;

        parse_nutrition_reply(content)
    }
}
