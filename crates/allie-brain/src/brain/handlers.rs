use allie_core::error::{AllieError, Result};
use chrono::Utc;

use super::Brain;
use crate::service::sports::{format_scoreboard, nba_dates};

pub const NAME_REPLY: &str = "My name is Allie, short for Artificial Language Learning & Interaction Engine. I’m here to help you with whatever you need!";

const NO_JOKE: &str = "Couldn't find a dad joke right now, sorry!";
const JOKE_FAILED: &str = "Failed to fetch a dad joke.";
const TIME_FAILED: &str = "Sorry, I couldn't fetch the current local time.";
const NO_GAMES: &str = "No NBA games found for that date.";
const SCORES_FAILED: &str = "Failed to fetch NBA live scores.";

/// The weather provider only takes a bare city name: drop commas and keep the
/// first word ("Chicago, Illinois" becomes "Chicago").
pub fn normalize_city(city: &str) -> String {
    city.replace(',', "")
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string()
}

impl Brain {
    /// Weather sentence for `city`. Provider failures become an apology.
    pub async fn weather_reply(&self, city: &str) -> String {
        match self.fetch_weather(city).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(city, error = %e, "weather lookup failed");
                format!("Sorry, I couldn't retrieve the weather for \"{city}\".")
            }
        }
    }

    async fn fetch_weather(&self, city: &str) -> Result<String> {
        let query = normalize_city(city);
        if query.is_empty() {
            return Err(AllieError::BadRequest("empty city".to_string()));
        }
        let weather = self.integrations.weather.current(&query).await?;
        let description = weather
            .description()
            .ok_or_else(|| AllieError::Integration("weather payload has no conditions".to_string()))?;
        Ok(format!(
            "The current weather in {}, {} is {} with a temperature of {:.1}°F, humidity of {}% and wind speed of {:.1} mph.",
            weather.name, weather.sys.country, description, weather.main.temp, weather.main.humidity, weather.wind.speed
        ))
    }

    /// Scoreboard for today shifted by `offset_days`, grouped by game state.
    pub async fn sports_reply(&self, offset_days: i64) -> String {
        let (compact, readable) = match nba_dates(Utc::now(), offset_days) {
            Ok(dates) => dates,
            Err(e) => {
                tracing::warn!(offset_days, error = %e, "nba date out of range");
                return SCORES_FAILED.to_string();
            }
        };

        let body = match self.integrations.scoreboard.games_on(&compact).await {
            Ok(games) if games.is_empty() => NO_GAMES.to_string(),
            Ok(games) => format_scoreboard(&games),
            Err(e) => {
                tracing::warn!(date = %compact, error = %e, "nba scoreboard failed");
                SCORES_FAILED.to_string()
            }
        };
        format!("NBA games for {readable}:\n\n{body}")
    }

    pub async fn joke_reply(&self) -> String {
        match self.integrations.jokes.dad_joke().await {
            Ok(Some(joke)) => joke,
            Ok(None) => NO_JOKE.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "dad joke failed");
                JOKE_FAILED.to_string()
            }
        }
    }

    pub async fn time_reply(&self) -> String {
        match self.integrations.timezone.local_time().await {
            Ok(t) => format!(
                "The current local time is {} in {}, {} ({}).",
                t.date_time_txt, t.geo.city, t.geo.country_name, t.timezone
            ),
            Err(e) => {
                tracing::warn!(error = %e, "local time lookup failed");
                TIME_FAILED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{mock_brain, MockState};
    use serde_json::json;

    #[test]
    fn test_normalize_city() {
        assert_eq!(normalize_city("Chicago, Illinois"), "Chicago");
        assert_eq!(normalize_city("  New York "), "New");
        assert_eq!(normalize_city(","), "");
    }

    #[tokio::test]
    async fn test_weather_reply_formats_sentence() {
        let (_guard, brain, _state) = mock_brain(MockState::default()).await;
        let reply = brain.weather_reply("Chicago, Illinois").await;
        assert_eq!(
            reply,
            "The current weather in Chicago, US is light rain with a temperature of 51.4°F, humidity of 81% and wind speed of 9.2 mph."
        );
    }

    #[tokio::test]
    async fn test_weather_reply_apologizes_on_failure() {
        let (_guard, brain, _state) = mock_brain(MockState::default()).await;
        let reply = brain.weather_reply("Atlantis").await;
        assert_eq!(reply, "Sorry, I couldn't retrieve the weather for \"Atlantis\".");
    }

    #[tokio::test]
    async fn test_sports_reply_sections() {
        let state = MockState::with_scoreboard(json!({ "response": { "Events": [
            { "competitions": { "competitors": [
                { "homeAway": "home", "team": { "displayName": "Boston Celtics" }, "score": "88" },
                { "homeAway": "away", "team": { "displayName": "Miami Heat" }, "score": "80" }
              ]},
              "status": { "type": { "name": "STATUS_IN_PROGRESS" }, "period": 3, "displayClock": "4:12" } },
            { "competitions": [{ "competitors": [
                { "homeAway": "home", "team": { "displayName": "LA Lakers" }, "score": "110" },
                { "homeAway": "away", "team": { "displayName": "Denver Nuggets" }, "score": "104" }
              ]}],
              "status": { "type": { "name": "STATUS_FINAL" } } }
        ]}}));
        let (_guard, brain, _state) = mock_brain(state).await;

        let reply = brain.sports_reply(-1).await;
        assert!(reply.starts_with("NBA games for "));
        assert!(reply.contains(":\n\n🔴 LIVE NOW (1):\nMiami Heat 80 - 88 Boston Celtics (LIVE 🔴 Q3 4:12)"));
        assert!(reply.contains("🏁 FINAL SCORES (1):\nDenver Nuggets 104 - 110 LA Lakers (Final)"));
        assert!(!reply.contains("UPCOMING"));
    }

    #[tokio::test]
    async fn test_sports_reply_no_games() {
        let (_guard, brain, _state) = mock_brain(MockState::default()).await;
        let reply = brain.sports_reply(0).await;
        assert!(reply.ends_with(":\n\nNo NBA games found for that date."));
        assert!(!reply.contains("LIVE NOW"));
    }

    #[tokio::test]
    async fn test_sports_reply_null_payload_means_no_games() {
        let state = MockState::with_scoreboard(json!({ "response": null }));
        let (_guard, brain, _state) = mock_brain(state).await;
        assert!(brain.sports_reply(0).await.ends_with(":\n\nNo NBA games found for that date."));
    }

    #[tokio::test]
    async fn test_joke_reply_empty_list() {
        let state = MockState {
            jokes: json!([]),
            ..MockState::default()
        };
        let (_guard, brain, _state) = mock_brain(state).await;
        assert_eq!(brain.joke_reply().await, NO_JOKE);
    }

    #[tokio::test]
    async fn test_time_reply() {
        let (_guard, brain, _state) = mock_brain(MockState::default()).await;
        assert_eq!(
            brain.time_reply().await,
            "The current local time is Sunday, April 27, 2025 15:42:10 in Chicago, United States (America/Chicago)."
        );
    }

    #[tokio::test]
    async fn test_replies_degrade_when_providers_are_down() {
        let (_guard, brain) = crate::testutil::offline_brain().await;
        assert_eq!(brain.joke_reply().await, JOKE_FAILED);
        assert_eq!(brain.time_reply().await, TIME_FAILED);
        assert!(brain.sports_reply(0).await.ends_with(SCORES_FAILED));
    }
}
