use std::path::Path;

use allie_core::config::LlmConfig;
use allie_core::error::{AllieError, Result};
use allie_core::types::{ChatMessage, ChatRequest};
use allie_llm::openai::OpenAiLlm;
use allie_llm::provider::{LlmProvider, TranscriptionProvider};

/// Chat and transcription dispatch over the configured provider.
///
/// Only "openai" (or any OpenAI-compatible endpoint via `base_url`) is
/// supported today; an unknown provider name is rejected at startup.
pub struct LlmDispatch {
    provider: OpenAiLlm,
    model: String,
}

impl LlmDispatch {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let provider = match config.provider.as_str() {
            "openai" => OpenAiLlm::new(config.api_key.clone(), config.model.clone())
                .with_base_url(config.base_url.clone())
                .with_transcription_model(config.transcription_model.clone()),
            other => {
                return Err(AllieError::Config(format!(
                    "unknown LLM provider: '{other}'. Supported: openai"
                )))
            }
        };
        if config.api_key.is_empty() {
            tracing::warn!("no LLM API key configured; chat and transcription will fail");
        }
        Ok(Self {
            provider,
            model: config.model.clone(),
        })
    }

    /// One completion over `messages`. The reply is trimmed.
    pub async fn chat(&self, messages: Vec<ChatMessage>, temperature: f32) -> Result<String> {
        let provider = self.provider.name();
        let model = &self.model;
        tracing::info!(provider, model = %model, turns = messages.len(), "calling chat llm");

        let request = ChatRequest {
            messages,
            max_tokens: None,
            temperature: Some(temperature),
        };
        match self.provider.chat(request).await {
            Ok(response) => {
                if let Some(usage) = &response.usage {
                    tracing::debug!(
                        input_tokens = usage.input_tokens,
                        output_tokens = usage.output_tokens,
                        "chat llm ok"
                    );
                }
                Ok(response.content.trim().to_string())
            }
            Err(e) => {
                tracing::error!(provider, error = %e, "chat llm failed");
                Err(e)
            }
        }
    }
}

impl TranscriptionProvider for LlmDispatch {
    async fn transcribe(&self, path: &Path) -> Result<String> {
        tracing::info!(path = %path.display(), "calling transcription");
        self.provider.transcribe(path).await
    }
}
