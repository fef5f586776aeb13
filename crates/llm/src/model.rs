//! Language model trait and factory

use crate::anthropic::AnthropicModel;
use crate::error::LlmError;
use crate::openai::OpenAiChatModel;
use async_trait::async_trait;
use barkeep_core::config::LlmConfig;
use barkeep_core::error::Result;
use std::sync::Arc;

/// A hosted chat model answering one system + user exchange
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Returns the text of the model's reply
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Which chat backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageModelProvider {
    OpenAi,
    Anthropic,
}

impl std::str::FromStr for LanguageModelProvider {
    type Err = LlmError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(LlmError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Resolves the API key: config first, then the provider's environment variable
pub(crate) fn resolve_api_key(
    provider: LanguageModelProvider,
    configured: Option<&String>,
) -> Option<String> {
    let env_var = match provider {
        LanguageModelProvider::OpenAi => "OPENAI_API_KEY",
        LanguageModelProvider::Anthropic => "ANTHROPIC_API_KEY",
    };
    configured.cloned().or_else(|| std::env::var(env_var).ok())
}

/// Create the configured language model
pub fn create_language_model(config: &LlmConfig) -> Result<Arc<dyn LanguageModel>> {
    let provider: LanguageModelProvider = config.provider.parse()?;
    let api_key = resolve_api_key(provider, config.api_key.as_ref());

    match provider {
        LanguageModelProvider::OpenAi => Ok(Arc::new(OpenAiChatModel::new(config, api_key))),
        LanguageModelProvider::Anthropic => {
            let api_key = api_key.ok_or_else(|| LlmError::MissingApiKey("anthropic".into()))?;
            Ok(Arc::new(AnthropicModel::new(config, api_key)?))
        }
    }
}
