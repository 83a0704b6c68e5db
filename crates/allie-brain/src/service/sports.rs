use allie_core::error::{AllieError, Result};
use allie_integrations::scoreboard::{GameEvent, GameStatus};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::America::New_York;

/// The scoreboard provider keys games by US Eastern calendar date.
///
/// Returns `(YYYYMMDD, "Month D, YYYY")` for `now` shifted by
/// `offset_days`.
pub fn nba_dates(now: DateTime<Utc>, offset_days: i64) -> Result<(String, String)> {
    let shifted = Duration::try_days(offset_days)
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| AllieError::BadRequest(format!("date offset out of range: {offset_days}")))?;
    let local = shifted.with_timezone(&New_York);
    Ok((
        local.format("%Y%m%d").to_string(),
        local.format("%B %-d, %Y").to_string(),
    ))
}

fn game_line(game: &GameEvent) -> String {
    let suffix = match game.status {
        GameStatus::Live => format!("LIVE 🔴 Q{} {}", game.period, game.clock),
        GameStatus::Final => "Final".to_string(),
        GameStatus::Scheduled => "Scheduled".to_string(),
    };
    format!(
        "{} {} - {} {} ({suffix})",
        game.away, game.away_score, game.home_score, game.home
    )
}

/// Group games into live, final, and upcoming sections. Empty sections are
/// omitted; an empty slate yields an empty string.
pub fn format_scoreboard(games: &[GameEvent]) -> String {
    let sections = [
        (GameStatus::Live, "🔴 LIVE NOW"),
        (GameStatus::Final, "🏁 FINAL SCORES"),
        (GameStatus::Scheduled, "🕒 UPCOMING GAMES"),
    ];

    let mut blocks = Vec::new();
    for (status, heading) in sections {
        let lines: Vec<String> = games
            .iter()
            .filter(|g| g.status == status)
            .map(game_line)
            .collect();
        if lines.is_empty() {
            continue;
        }
        blocks.push(format!("{heading} ({}):\n{}", lines.len(), lines.join("\n")));
    }
    blocks.join("\n\n").trim().to_string()
}
