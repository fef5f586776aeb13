//! Anthropic messages backend

use crate::error::LlmError;
use crate::model::LanguageModel;
use async_trait::async_trait;
use barkeep_core::config::LlmConfig;
use barkeep_core::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub struct AnthropicModel {
    client: Arc<claudius::Anthropic>,
    model: claudius::Model,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl AnthropicModel {
    pub(crate) fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        info!("Initializing Anthropic chat model");
        info!("  Model: {}", config.model);

        let client = claudius::Anthropic::new(Some(api_key)).map_err(|e| {
            LlmError::Config(format!("Failed to create Anthropic client: {e}"))
        })?;

        Ok(Self {
            client: Arc::new(client),
            model: claudius::Model::Custom(config.model.clone()),
            model_name: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

#[async_trait]
impl LanguageModel for AnthropicModel {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let params = claudius::MessageCreateParams::new(
            self.max_tokens,
            vec![claudius::MessageParam::user(user.to_string())],
            self.model.clone(),
        )
        .with_system_blocks(vec![claudius::TextBlock::new(system.to_string())])
        .with_temperature(self.temperature)
        .map_err(|e| LlmError::Config(format!("Invalid temperature: {e}")))?;

        debug!("Messages request to {}", self.model_name);

        let response = tokio::time::timeout(self.timeout, self.client.send(params))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| LlmError::Request(format!("Anthropic API call failed: {e}")))?;

        let response_text = response
            .content
            .iter()
            .filter_map(|block| match block {
                claudius::ContentBlock::Text(text_block) => Some(text_block.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if response_text.trim().is_empty() {
            return Err(LlmError::EmptyResponse.into());
        }

        Ok(response_text)
    }
}
