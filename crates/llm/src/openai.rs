//! OpenAI-compatible chat completions backend

use crate::error::LlmError;
use crate::model::LanguageModel;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use barkeep_core::config::LlmConfig;
use barkeep_core::error::Result;
use std::time::Duration;
use tracing::{debug, info};

pub struct OpenAiChatModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiChatModel {
    pub(crate) fn new(config: &LlmConfig, api_key: Option<String>) -> Self {
        info!("Initializing OpenAI-compatible chat model");
        info!("  Model: {}", config.model);

        let mut openai_config = OpenAIConfig::new();
        if let Some(ref base_url) = config.api_base_url {
            info!("  Base URL: {base_url}");
            openai_config = openai_config.with_api_base(base_url);
        }
        if let Some(key) = api_key {
            openai_config = openai_config.with_api_key(key);
        }

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(|e| LlmError::Request(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user)
                    .build()
                    .map_err(|e| LlmError::Request(e.to_string()))?
                    .into(),
            ])
            .build()
            .map_err(|e| LlmError::Request(e.to_string()))?;

        debug!("Chat completion request to {}", self.model);

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| LlmError::Request(format!("Chat completion failed: {e}")))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        Ok(content)
    }
}
