use allie_core::error::{AllieError, Result};
use serde::Deserialize;

use crate::http::{send_json, RapidApi};

/// Which display bucket a game belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Live,
    Final,
    Scheduled,
}

impl GameStatus {
    /// Map the provider's status code. Anything other than in-progress or
    /// final (pre-game, postponed, delayed) counts as scheduled.
    pub fn from_code(code: &str) -> Self {
        match code {
            "STATUS_IN_PROGRESS" => Self::Live,
            "STATUS_FINAL" => Self::Final,
            _ => Self::Scheduled,
        }
    }
}

/// One game flattened out of the provider payload.
#[derive(Debug, Clone, PartialEq)]
pub struct GameEvent {
    pub home: String,
    pub home_score: String,
    pub away: String,
    pub away_score: String,
    pub status: GameStatus,
    pub period: String,
    pub clock: String,
}

// Both levels may be missing or an explicit null; either means no games.
#[derive(Debug, Default, Deserialize)]
struct ScoreboardResponse {
    #[serde(default)]
    response: Option<ScoreboardBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ScoreboardBody {
    #[serde(rename = "Events", default)]
    events: Option<Vec<RawEvent>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEvent {
    #[serde(default)]
    competitions: Option<Competitions>,
    #[serde(default)]
    status: Option<RawStatus>,
}

/// The provider has been seen returning `competitions` both as a single
/// object and as an array of one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Competitions {
    One(Competition),
    Many(Vec<Competition>),
}

impl Competitions {
    fn competitors(&self) -> &[Competitor] {
        match self {
            Self::One(c) => &c.competitors,
            Self::Many(list) => list.first().map(|c| c.competitors.as_slice()).unwrap_or(&[]),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Competition {
    #[serde(default)]
    competitors: Vec<Competitor>,
}

#[derive(Debug, Default, Deserialize)]
struct Competitor {
    #[serde(rename = "homeAway", default)]
    home_away: String,
    #[serde(default)]
    team: Option<Team>,
    #[serde(default)]
    score: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct Team {
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawStatus {
    #[serde(rename = "type", default)]
    kind: Option<StatusType>,
    #[serde(rename = "displayClock", default)]
    display_clock: Option<String>,
    #[serde(default)]
    period: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct StatusType {
    #[serde(default)]
    name: Option<String>,
}

/// Render a JSON scalar the way it would read in a sentence. Scores arrive as
/// strings or numbers depending on the feed.
fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl RawEvent {
    fn into_game(self) -> GameEvent {
        let competitors = self
            .competitions
            .as_ref()
            .map(Competitions::competitors)
            .unwrap_or(&[]);
        let side = |which: &str| competitors.iter().find(|c| c.home_away == which);
        let name = |c: Option<&Competitor>, fallback: &str| {
            c.and_then(|c| c.team.as_ref())
                .and_then(|t| t.display_name.clone())
                .unwrap_or_else(|| fallback.to_string())
        };
        let score = |c: Option<&Competitor>| {
            c.and_then(|c| c.score.as_ref())
                .and_then(scalar_text)
                .unwrap_or_else(|| "0".to_string())
        };

        let home = side("home");
        let away = side("away");
        let status = self.status.unwrap_or_default();
        let code = status
            .kind
            .and_then(|k| k.name)
            .unwrap_or_else(|| "STATUS_SCHEDULED".to_string());

        GameEvent {
            home: name(home, "Home Team"),
            home_score: score(home),
            away: name(away, "Away Team"),
            away_score: score(away),
            status: GameStatus::from_code(&code),
            period: status.period.as_ref().and_then(scalar_text).unwrap_or_default(),
            clock: status.display_clock.unwrap_or_default(),
        }
    }
}

/// Flatten a raw scoreboard payload into games.
pub fn parse_games(payload: serde_json::Value) -> Result<Vec<GameEvent>> {
    let parsed: ScoreboardResponse = serde_json::from_value(payload)
        .map_err(|e| AllieError::Integration(format!("scoreboard parse failed: {e}")))?;
    Ok(parsed
        .response
        .and_then(|body| body.events)
        .unwrap_or_default()
        .into_iter()
        .map(RawEvent::into_game)
        .collect())
}

pub struct ScoreboardClient {
    api: RapidApi,
}

impl ScoreboardClient {
    pub fn new(api: RapidApi) -> Self {
        Self { api }
    }

    /// Fetch every game on a date given as `YYYYMMDD`.
    pub async fn games_on(&self, date: &str) -> Result<Vec<GameEvent>> {
        tracing::debug!(date, "fetching nba scoreboard");
        let payload: serde_json::Value = send_json(
            "scoreboard",
            self.api.get("/nba-scoreboard-by-date").query(&[("date", date)]),
        )
        .await?;
        parse_games(payload)
    }
}
