use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generate a fresh record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Current wall-clock time in UTC.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// One turn of a conversation. Clients send the rolling history with every
/// request; the server never stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Create a plain text message.
    pub fn text(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text("user", content)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A reminder created from a "remind me to ..." command.
///
/// `time` and `date` hold the raw lowercased tokens the user typed (or
/// `"unspecified"`); they are display strings, not parsed instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub id: String,
    pub task: String,
    pub task_lower: String,
    pub time: String,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

impl ScheduleEvent {
    pub fn new(task: impl Into<String>, time: impl Into<String>, date: impl Into<String>) -> Self {
        let task = task.into();
        Self {
            id: new_id(),
            task_lower: task.to_lowercase(),
            task,
            time: time.into(),
            date: date.into(),
            created_at: now_utc(),
        }
    }

    /// `"{task} at {time} on {date}"`, the line format used by list and
    /// disambiguation replies.
    pub fn summary(&self) -> String {
        format!("{} at {} on {}", self.task, self.time, self.date)
    }
}
