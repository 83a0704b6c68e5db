pub mod http;
pub mod jokes;
pub mod scoreboard;
pub mod timezone;
pub mod weather;

use allie_core::config::IntegrationsConfig;
use allie_core::error::Result;

use crate::jokes::JokeClient;
use crate::scoreboard::ScoreboardClient;
use crate::timezone::TimezoneClient;
use crate::weather::WeatherClient;

/// Every third-party data provider the intent handlers call, built once from
/// config and sharing a single connection pool.
pub struct Integrations {
    pub weather: WeatherClient,
    pub scoreboard: ScoreboardClient,
    pub jokes: JokeClient,
    pub timezone: TimezoneClient,
}

impl Integrations {
    pub fn from_config(config: &IntegrationsConfig) -> Result<Self> {
        let client = http::build_client(config.timeout_secs)?;
        let rapid = |base_url: &str| {
            http::RapidApi::new(client.clone(), base_url, &config.rapidapi_key)
        };

        Ok(Self {
            weather: WeatherClient::new(rapid(&config.weather_url)?),
            scoreboard: ScoreboardClient::new(rapid(&config.scoreboard_url)?),
            jokes: JokeClient::new(rapid(&config.jokes_url)?),
            timezone: TimezoneClient::new(
                client,
                config.timezone_url.clone(),
                config.ipgeolocation_key.clone(),
            ),
        })
    }
}
