//! Image to text description via a vision-capable chat endpoint

use crate::error::LlmError;
use crate::prompts;
use async_trait::async_trait;
use barkeep_core::config::LlmConfig;
use barkeep_core::error::Result;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};
use std::path::Path;
use tracing::{debug, info, warn};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DESCRIPTION_MAX_TOKENS: u32 = 300;

/// Turns an image reference (file path or URL) into a short description
#[async_trait]
pub trait ImageDescriber: Send + Sync {
    async fn describe(&self, image_ref: &str) -> Result<String>;
}

/// [`ImageDescriber`] speaking the OpenAI chat completions wire format
pub struct OpenAiImageDescriber {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiImageDescriber {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        info!("Initializing image describer");
        info!("  Model: {}", config.vision_model);

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to create HTTP client: {e}")))?;

        let base = config
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');

        Ok(Self {
            client,
            endpoint: format!("{base}/chat/completions"),
            api_key: config
                .api_key
                .clone()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok()),
            model: config.vision_model.clone(),
        })
    }
}

#[async_trait]
impl ImageDescriber for OpenAiImageDescriber {
    async fn describe(&self, image_ref: &str) -> Result<String> {
        let url = image_url(image_ref).await?;

        let body = json!({
            "model": self.model,
            "temperature": 0.0,
            "max_tokens": DESCRIPTION_MAX_TOKENS,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": prompts::IMAGE_DESCRIPTION},
                    {"type": "image_url", "image_url": {"url": url}}
                ]
            }]
        });

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request.send().await.map_err(|e| {
            let error_kind = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connection"
            } else {
                "request"
            };
            warn!("Image description failed ({error_kind}): {e}");
            LlmError::Request(format!("Image description request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Request(format!("Vision API returned {status}: {text}")).into());
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Request(format!("Invalid vision API response: {e}")))?;

        let description = payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        debug!("Image description: {description}");
        Ok(description.to_string())
    }
}

/// Remote references pass through; local files become base64 data URLs
pub async fn image_url(image_ref: &str) -> Result<String> {
    let trimmed = image_ref.trim();
    if ["http://", "https://", "data:"]
        .iter()
        .any(|scheme| trimmed.starts_with(scheme))
    {
        return Ok(trimmed.to_string());
    }

    let path = Path::new(trimmed);
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LlmError::Image(format!("Failed to read {}: {e}", path.display())))?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{encoded}", mime_type(path)))
}

fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "image/jpeg",
    }
}
