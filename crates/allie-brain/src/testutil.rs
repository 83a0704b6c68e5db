//! Local stand-ins for every upstream provider, plus a `Brain` wired to them.

use std::sync::{Arc, Mutex};

use allie_core::config::Config;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::brain::Brain;

pub const MOCK_JOKE: &str = "I'm afraid for the calendar. Its days are numbered.";

/// Canned provider payloads and a record of the last chat request.
#[derive(Clone)]
pub struct MockState {
    pub scoreboard: Value,
    pub jokes: Value,
    pub last_chat: Arc<Mutex<Option<Value>>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            scoreboard: json!({ "response": { "Events": [] } }),
            jokes: json!([{ "joke": MOCK_JOKE }]),
            last_chat: Arc::new(Mutex::new(None)),
        }
    }
}

impl MockState {
    pub fn with_scoreboard(scoreboard: Value) -> Self {
        Self {
            scoreboard,
            ..Self::default()
        }
    }

    pub fn last_chat(&self) -> Option<Value> {
        self.last_chat.lock().unwrap().clone()
    }
}

async fn chat(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    *state.last_chat.lock().unwrap() = Some(body);
    Json(json!({
        "choices": [{ "message": { "role": "assistant", "content": "  mock reply\n" } }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 2 }
    }))
}

async fn transcriptions() -> Json<Value> {
    Json(json!({ "text": "transcribed audio" }))
}

async fn weather(Path(city): Path<String>) -> impl IntoResponse {
    if city != "Chicago" {
        return (StatusCode::NOT_FOUND, Json(json!({ "cod": "404", "message": "city not found" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "name": "Chicago",
            "sys": { "country": "US" },
            "weather": [{ "description": "light rain" }],
            "main": { "temp": 51.37, "humidity": 81 },
            "wind": { "speed": 9.22 }
        })),
    )
}

async fn scoreboard(State(state): State<MockState>) -> Json<Value> {
    Json(state.scoreboard)
}

async fn jokes(State(state): State<MockState>) -> Json<Value> {
    Json(state.jokes)
}

async fn timezone() -> Json<Value> {
    Json(json!({
        "timezone": "America/Chicago",
        "date_time_txt": "Sunday, April 27, 2025 15:42:10",
        "geo": { "city": "Chicago", "country_name": "United States" }
    }))
}

/// Serve every provider route on an ephemeral local port. Returns the base URL.
pub async fn serve_mock(state: MockState) -> String {
    let app = Router::new()
        .route("/chat/completions", post(chat))
        .route("/audio/transcriptions", post(transcriptions))
        .route("/city/{city}/US", get(weather))
        .route("/nba-scoreboard-by-date", get(scoreboard))
        .route("/v1/dadjokes", get(jokes))
        .route("/timezone", get(timezone))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Config pointing every provider at `base_url` and storage into `dir`.
pub fn test_config(dir: &TempDir, base_url: &str) -> Config {
    let mut config = Config::default();
    config.server.uploads_dir = dir.path().join("uploads").to_string_lossy().into_owned();
    config.database.path = dir.path().join("allie.db").to_string_lossy().into_owned();
    config.llm.api_key = "sk-test".to_string();
    config.llm.base_url = base_url.to_string();
    config.integrations.rapidapi_key = "rapid-test".to_string();
    config.integrations.ipgeolocation_key = "geo-test".to_string();
    config.integrations.weather_url = base_url.to_string();
    config.integrations.scoreboard_url = base_url.to_string();
    config.integrations.jokes_url = base_url.to_string();
    config.integrations.timezone_url = base_url.to_string();
    config.integrations.timeout_secs = 5;
    config
}

/// A Brain backed by the mock providers. Keep the `TempDir` alive for the
/// duration of the test.
pub async fn mock_brain(state: MockState) -> (TempDir, Brain, MockState) {
    let base = serve_mock(state.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let brain = Brain::new(test_config(&dir, &base)).await.unwrap();
    (dir, brain, state)
}

/// A Brain whose providers all refuse connections.
pub async fn offline_brain() -> (TempDir, Brain) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir, "http://127.0.0.1:1");
    config.integrations.timeout_secs = 2;
    let brain = Brain::new(config).await.unwrap();
    (dir, brain)
}
