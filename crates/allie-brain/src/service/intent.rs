use once_cell::sync::Lazy;
use regex::Regex;

/// What the user is asking for. Exactly one intent is chosen per prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Current local time or date.
    Time,
    /// Current weather for a city.
    Weather { city: String },
    /// "Who are you?"
    Name,
    /// A dad joke.
    Joke,
    /// NBA scoreboard for today, or `date_offset_days` relative to today.
    SportsSchedule { date_offset_days: i64 },
    /// Anything else goes to the language model.
    Chat,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Weather { .. } => "weather",
            Self::Name => "name",
            Self::Joke => "joke",
            Self::SportsSchedule { .. } => "sports",
            Self::Chat => "chat",
        }
    }
}

/// One entry in the classification table: a predicate that also extracts the
/// intent's parameters. Returning `None` passes the prompt to the next rule.
pub struct IntentRule {
    pub name: &'static str,
    pub detect: fn(&str) -> Option<Intent>,
}

/// Evaluated top to bottom; the first rule that fires wins.
pub const RULES: &[IntentRule] = &[
    IntentRule { name: "time", detect: detect_time },
    IntentRule { name: "weather", detect: detect_weather },
    IntentRule { name: "name", detect: detect_name },
    IntentRule { name: "joke", detect: detect_joke },
    IntentRule { name: "sports", detect: detect_sports },
];

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)what(['’]| i)?s the time|what(['’]| i)?s the date|current time|current date|local time")
        .expect("valid time regex")
});

static WEATHER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:weather|temperature|degrees|hot|cold|warm|rain|raining|snow|snowing) in ([a-z\s,]+)")
        .expect("valid weather regex")
});

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)what(['’]| i)?s your name|who are you|tell me about yourself")
        .expect("valid name regex")
});

static JOKE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)tell me a joke|dad joke|make me laugh|joke|say something funny")
        .expect("valid joke regex")
});

static NBA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)nba schedule|nba games|nba scores|nba today|nba yesterday|nba right now|who(['’]s| is) winning right now|nba playoffs|nba \d+ days? ago",
    )
    .expect("valid nba regex")
});

static DAYS_AGO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+) days? ago\b").expect("valid days-ago regex"));

/// Classify a prompt. Falls back to `Intent::Chat` when no rule fires.
pub fn classify(prompt: &str) -> Intent {
    RULES
        .iter()
        .find_map(|rule| (rule.detect)(prompt))
        .unwrap_or(Intent::Chat)
}

fn detect_time(prompt: &str) -> Option<Intent> {
    TIME_RE.is_match(prompt).then_some(Intent::Time)
}

fn detect_weather(prompt: &str) -> Option<Intent> {
    extract_city(prompt).map(|city| Intent::Weather { city })
}

fn detect_name(prompt: &str) -> Option<Intent> {
    NAME_RE.is_match(prompt).then_some(Intent::Name)
}

fn detect_joke(prompt: &str) -> Option<Intent> {
    JOKE_RE.is_match(prompt).then_some(Intent::Joke)
}

fn detect_sports(prompt: &str) -> Option<Intent> {
    NBA_RE.is_match(prompt).then(|| Intent::SportsSchedule {
        date_offset_days: detect_nba_date_offset(prompt),
    })
}

/// Text after "<weather keyword> in", trimmed. `None` when the keyword is
/// absent or nothing usable follows it.
pub fn extract_city(prompt: &str) -> Option<String> {
    let city = WEATHER_RE
        .captures(prompt)?
        .get(1)?
        .as_str()
        .trim_matches(|c: char| c.is_whitespace() || c == ',');
    (!city.is_empty()).then(|| city.to_string())
}

/// "N days ago" → -N, "yesterday" → -1, otherwise today (0). A count too
/// large to represent saturates, so date arithmetic rejects it later.
pub fn detect_nba_date_offset(prompt: &str) -> i64 {
    if let Some(days) = DAYS_AGO_RE
        .captures(prompt)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().parse::<i64>().unwrap_or(i64::MAX))
    {
        return days.saturating_neg();
    }
    if prompt.to_lowercase().contains("yesterday") {
        return -1;
    }
    0
}
