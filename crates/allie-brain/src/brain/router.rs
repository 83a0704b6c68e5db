use allie_core::error::{AllieError, Result};
use allie_core::types::ChatMessage;
use serde::Deserialize;

use super::chat::Personality;
use super::handlers::NAME_REPLY;
use super::Brain;
use crate::service::intent::{classify, Intent};

/// Body of `POST /api/smart`.
#[derive(Debug, Default, Deserialize)]
pub struct SmartRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(rename = "conversationHistory", default)]
    pub history: Vec<ChatMessage>,
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

impl Brain {
    /// Route a prompt to exactly one handler. Only the chat fallback can fail;
    /// every provider-backed handler degrades to an apology instead.
    pub async fn handle_smart(&self, request: SmartRequest) -> Result<String> {
        let prompt = request
            .prompt
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| AllieError::BadRequest("Prompt is required".to_string()))?;

        let intent = classify(&prompt);
        tracing::info!(intent = intent.name(), "routing smart request");

        let reply = match intent {
            Intent::Time => self.time_reply().await,
            Intent::Weather { city } => self.weather_reply(&city).await,
            Intent::Name => NAME_REPLY.to_string(),
            Intent::Joke => self.joke_reply().await,
            Intent::SportsSchedule { date_offset_days } => self.sports_reply(date_offset_days).await,
            Intent::Chat => {
                let personality = Personality::resolve(
                    request.personality.as_deref(),
                    request.mode.as_deref(),
                );
                self.converse(&prompt, &request.history, personality).await?
            }
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{mock_brain, MockState};
    use serde_json::json;

    fn smart(value: serde_json::Value) -> SmartRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_reads_camel_case_history() {
        let req = smart(json!({
            "prompt": "hi",
            "conversationHistory": [{ "role": "user", "content": "earlier" }],
            "mode": "sassy"
        }));
        assert_eq!(req.history.len(), 1);
        assert_eq!(req.mode.as_deref(), Some("sassy"));
        assert!(req.personality.is_none());
    }

    #[tokio::test]
    async fn test_missing_prompt_is_bad_request() {
        let (_guard, brain, _state) = mock_brain(MockState::default()).await;
        let err = brain.handle_smart(smart(json!({}))).await.unwrap_err();
        assert!(matches!(err, AllieError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_name_intent_skips_llm() {
        let (_guard, brain, state) = mock_brain(MockState::default()).await;
        let reply = brain.handle_smart(smart(json!({ "prompt": "who are you?" }))).await.unwrap();
        assert_eq!(reply, NAME_REPLY);
        assert!(state.last_chat().is_none());
    }

    #[tokio::test]
    async fn test_weather_intent_reaches_provider() {
        let (_guard, brain, _state) = mock_brain(MockState::default()).await;
        let reply = brain
            .handle_smart(smart(json!({ "prompt": "What's the weather in Chicago?" })))
            .await
            .unwrap();
        assert!(reply.starts_with("The current weather in Chicago, US"));
    }

    #[tokio::test]
    async fn test_chat_fallback_uses_history_and_personality() {
        let (_guard, brain, state) = mock_brain(MockState::default()).await;
        let reply = brain
            .handle_smart(smart(json!({
                "prompt": "how do I stay focused?",
                "conversationHistory": [
                    { "role": "user", "content": "I'm tired" },
                    { "role": "assistant", "content": "Take a break!" }
                ],
                "personality": "sassy"
            })))
            .await
            .unwrap();
        assert_eq!(reply, "mock reply");

        let body = state.last_chat().unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["content"], Personality::Sassy.system_prompt());
        assert_eq!(messages[2]["content"], "Take a break!");
        assert_eq!(messages[3]["content"], "how do I stay focused?");
    }

    #[tokio::test]
    async fn test_out_of_range_day_count_reports_scores_failure() {
        let (_guard, brain, _state) = mock_brain(MockState::default()).await;
        let reply = brain
            .handle_smart(smart(json!({ "prompt": "nba 99999999999999999999 days ago" })))
            .await
            .unwrap();
        assert_eq!(reply, "Failed to fetch NBA live scores.");
    }

    #[tokio::test]
    async fn test_chat_failure_is_upstream_error() {
        let (_guard, brain) = crate::testutil::offline_brain().await;
        let err = brain
            .handle_smart(smart(json!({ "prompt": "explain monads" })))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), allie_core::error::ErrorKind::Upstream);
    }
}
