use std::path::Path;

use allie_core::error::{AllieError, Result};
use allie_core::types::{ChatMessage, ChatRequest, ChatResponse, Usage};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;

use crate::provider::{LlmProvider, TranscriptionProvider};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// OpenAI chat completion and audio transcription provider.
///
/// One instance is built at startup and shared; `reqwest::Client` pools
/// connections internally and is safe to use concurrently.
pub struct OpenAiLlm {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    transcription_model: String,
}

impl OpenAiLlm {
    /// Create a new OpenAI provider.
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key
    /// * `model` - Chat model identifier (e.g. "gpt-4")
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: OPENAI_BASE_URL.to_string(),
            transcription_model: "whisper-1".to_string(),
        }
    }

    /// Point the provider at another OpenAI-compatible API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_transcription_model(mut self, model: impl Into<String>) -> Self {
        self.transcription_model = model.into();
        self
    }

    fn llm_err(message: String) -> AllieError {
        AllieError::Llm {
            provider: "openai".to_string(),
            message,
        }
    }
}

impl LlmProvider for OpenAiLlm {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(model = %self.model, messages = request.messages.len(), "openai chat request");
        let body = CompletionBody {
            model: &self.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::llm_err(format!("request failed: {e}")))?;

        let status = response.status().as_u16();
        let response_text = response
            .text()
            .await
            .map_err(|e| Self::llm_err(format!("failed to read response body: {e}")))?;

        if !(200..300).contains(&status) {
            return Err(AllieError::Http {
                status,
                body: response_text,
            });
        }

        let parsed: serde_json::Value = serde_json::from_str(&response_text)
            .map_err(|e| Self::llm_err(format!("failed to parse response JSON: {e}")))?;

        let content = parsed["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|choice| choice["message"]["content"].as_str())
            .ok_or_else(|| Self::llm_err("missing choices[0].message.content in response".to_string()))?
            .to_string();

        let usage = match (
            parsed["usage"]["prompt_tokens"].as_u64(),
            parsed["usage"]["completion_tokens"].as_u64(),
        ) {
            (Some(input), Some(output)) => Some(Usage {
                input_tokens: input as u32,
                output_tokens: output as u32,
            }),
            _ => None,
        };

        Ok(ChatResponse { content, usage })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

impl TranscriptionProvider for OpenAiLlm {
    async fn transcribe(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "openai transcription request");
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/mpeg")
            .map_err(|e| AllieError::Transcription(format!("invalid mime type: {e}")))?;
        let form = Form::new()
            .text("model", self.transcription_model.clone())
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AllieError::Transcription(format!("request failed: {e}")))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AllieError::Transcription(format!("failed to read response body: {e}")))?;

        if !(200..300).contains(&status) {
            return Err(AllieError::Http { status, body: text });
        }

        let parsed: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| AllieError::Transcription(format!("failed to parse response JSON: {e}")))?;

        parsed["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AllieError::Transcription("missing text in response".to_string()))
    }
}
