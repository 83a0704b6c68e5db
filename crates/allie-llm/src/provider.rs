use allie_core::error::Result;
use allie_core::types::{ChatRequest, ChatResponse};
use std::path::Path;

/// Trait for LLM chat completion providers.
pub trait LlmProvider: Send + Sync {
    /// Send a chat request and receive a completion response.
    fn chat(&self, request: ChatRequest) -> impl std::future::Future<Output = Result<ChatResponse>> + Send;

    /// Return the provider name (e.g. "openai").
    fn name(&self) -> &str;
}

/// Trait for speech-to-text providers.
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe the audio file at `path`. The provider infers the audio
    /// format from the file extension, so callers must make sure it has one.
    fn transcribe(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}
