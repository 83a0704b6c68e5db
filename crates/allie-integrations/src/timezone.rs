use allie_core::error::Result;
use reqwest::Client;
use serde::Deserialize;

use crate::http::send_json;

/// Local time at the caller's IP, as reported by the geolocation provider.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalTime {
    pub date_time_txt: String,
    pub timezone: String,
    pub geo: Geo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geo {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country_name: String,
}

pub struct TimezoneClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TimezoneClient {
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub async fn local_time(&self) -> Result<LocalTime> {
        let request = self
            .client
            .get(format!("{}/timezone", self.base_url))
            .query(&[("apiKey", self.api_key.as_str())]);
        send_json("timezone", request).await
    }
}
