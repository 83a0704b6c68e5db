use allie_core::error::Result;
use allie_core::types::ChatMessage;

use super::Brain;

/// Tone of the fallback conversation. Unknown keys fall back to `Friendly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Personality {
    #[default]
    Friendly,
    Sassy,
    Motivational,
    Humorous,
}

impl Personality {
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "sassy" => Self::Sassy,
            "motivational" => Self::Motivational,
            "humorous" => Self::Humorous,
            _ => Self::Friendly,
        }
    }

    /// `personality` wins over `mode`; blank values are ignored.
    pub fn resolve(personality: Option<&str>, mode: Option<&str>) -> Self {
        personality
            .into_iter()
            .chain(mode)
            .find(|k| !k.trim().is_empty())
            .map(Self::from_key)
            .unwrap_or_default()
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::Friendly => "You are Allie, a warm and kind assistant who speaks in a friendly, encouraging tone.",
            Self::Sassy => "You are Allie, a sarcastic, witty assistant who doesn’t hold back and loves throwing playful shade.",
            Self::Motivational => "You are Allie, a high-energy motivational coach who inspires users like a personal hype squad.",
            Self::Humorous => "You are Allie, a clever, funny assistant who always responds with a comedic twist.",
        }
    }
}

/// System prompt, then the client's history in order, then the new prompt.
pub fn build_messages(personality: Personality, history: &[ChatMessage], prompt: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(personality.system_prompt()));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(prompt));
    messages
}

impl Brain {
    /// Free-form conversation in the given personality.
    pub async fn converse(
        &self,
        prompt: &str,
        history: &[ChatMessage],
        personality: Personality,
    ) -> Result<String> {
        tracing::info!(?personality, history = history.len(), "fallback chat");
        let messages = build_messages(personality, history, prompt);
        self.llm.chat(messages, self.config.llm.temperature).await
    }

    /// Bare completion: no personality and no history.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        self.llm
            .chat(vec![ChatMessage::user(prompt)], self.config.llm.temperature)
            .await
    }
}
