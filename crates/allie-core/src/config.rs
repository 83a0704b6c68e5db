use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AllieError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub integrations: IntegrationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Where multipart uploads land before they are handed to transcription.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
}

fn default_port() -> u16 {
    5000
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            uploads_dir: default_uploads_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    /// OpenAI-compatible API root, without a trailing slash.
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_llm_model() -> String {
    "gpt-4".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_llm_model(),
            api_key: String::new(),
            base_url: default_llm_base_url(),
            temperature: default_temperature(),
            transcription_model: default_transcription_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    #[serde(default)]
    pub turso_url: String,
    #[serde(default)]
    pub turso_token: String,
}

fn default_db_path() -> String {
    "allie.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            turso_url: String::new(),
            turso_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationsConfig {
    #[serde(default)]
    pub rapidapi_key: String,
    #[serde(default)]
    pub ipgeolocation_key: String,
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    #[serde(default = "default_scoreboard_url")]
    pub scoreboard_url: String,
    #[serde(default = "default_jokes_url")]
    pub jokes_url: String,
    #[serde(default = "default_timezone_url")]
    pub timezone_url: String,
    /// Per-request timeout for every third-party call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_weather_url() -> String {
    "https://open-weather13.p.rapidapi.com".to_string()
}

fn default_scoreboard_url() -> String {
    "https://nba-api-free-data.p.rapidapi.com".to_string()
}

fn default_jokes_url() -> String {
    "https://dad-jokes-by-api-ninjas.p.rapidapi.com".to_string()
}

fn default_timezone_url() -> String {
    "https://api.ipgeolocation.io".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            rapidapi_key: String::new(),
            ipgeolocation_key: String::new(),
            weather_url: default_weather_url(),
            scoreboard_url: default_scoreboard_url(),
            jokes_url: default_jokes_url(),
            timezone_url: default_timezone_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config: defaults → allie.toml → env vars (env wins).
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| AllieError::Config(format!("failed to read config: {e}")))?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AllieError::Config(format!("failed to parse config: {e}")))
    }

    /// Override fields from environment-style lookups. The variable names
    /// match what the deployment already exports.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PORT") {
            match v.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("ignoring invalid PORT value {v:?}"),
            }
        }
        if let Some(v) = lookup("ALLIE_UPLOADS_DIR") {
            self.server.uploads_dir = v;
        }
        if let Some(v) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = v;
        }
        if let Some(v) = lookup("ALLIE_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = lookup("ALLIE_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = lookup("ALLIE_DB_PATH") {
            self.database.path = v;
        }
        if let Some(v) = lookup("ALLIE_TURSO_URL") {
            self.database.turso_url = v;
        }
        if let Some(v) = lookup("ALLIE_TURSO_TOKEN") {
            self.database.turso_token = v;
        }
        if let Some(v) = lookup("RAPIDAPI_KEY") {
            self.integrations.rapidapi_key = v;
        }
        if let Some(v) = lookup("IPGEOLOCATION_API_KEY") {
            self.integrations.ipgeolocation_key = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.llm.transcription_model, "whisper-1");
        assert!((config.llm.temperature - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.database.path, "allie.db");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [llm]
            model = "gpt-4o-mini"

            [integrations]
            timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.integrations.timeout_secs, 3);
        assert_eq!(
            config.integrations.weather_url,
            "https://open-weather13.p.rapidapi.com"
        );
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::from_toml("[server]\nport = 8080").unwrap();
        let env: HashMap<&str, &str> = [
            ("PORT", "9000"),
            ("OPENAI_API_KEY", "sk-test"),
            ("RAPIDAPI_KEY", "rapid"),
        ]
        .into_iter()
        .collect();

        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.api_key, "sk-test");
        assert_eq!(config.integrations.rapidapi_key, "rapid");
        assert!(config.integrations.ipgeolocation_key.is_empty());
    }

    #[test]
    fn test_invalid_port_env_ignored() {
        let mut config = Config::default();
        config.apply_env(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = Config::from_toml("[server\nport = 1").unwrap_err();
        assert!(matches!(err, AllieError::Config(_)));
    }
}
