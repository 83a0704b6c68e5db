use allie_core::error::Result;
use serde::Deserialize;

use crate::http::{encode_segment, send_json, RapidApi};

/// Current conditions for one city, in imperial units.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub name: String,
    pub sys: Sys,
    pub weather: Vec<Condition>,
    pub main: Main,
    pub wind: Wind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Main {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

impl CurrentWeather {
    pub fn description(&self) -> Option<&str> {
        self.weather.first().map(|c| c.description.as_str())
    }
}

pub struct WeatherClient {
    api: RapidApi,
}

impl WeatherClient {
    pub fn new(api: RapidApi) -> Self {
        Self { api }
    }

    /// Fetch current weather for a US city.
    pub async fn current(&self, city: &str) -> Result<CurrentWeather> {
        tracing::debug!(city, "fetching weather");
        let path = format!("/city/{}/US", encode_segment(city));
        send_json("weather", self.api.get(&path).query(&[("units", "imperial")])).await
    }
}
