use allie_core::error::Result;
use serde::Deserialize;

use crate::http::{send_json, RapidApi};

#[derive(Debug, Deserialize)]
struct DadJoke {
    #[serde(default)]
    joke: String,
}

pub struct JokeClient {
    api: RapidApi,
}

impl JokeClient {
    pub fn new(api: RapidApi) -> Self {
        Self { api }
    }

    /// Fetch one dad joke. `None` when the provider answered with an empty list.
    pub async fn dad_joke(&self) -> Result<Option<String>> {
        let jokes: Vec<DadJoke> = send_json("jokes", self.api.get("/v1/dadjokes")).await?;
        Ok(jokes
            .into_iter()
            .next()
            .map(|j| j.joke)
            .filter(|j| !j.trim().is_empty()))
    }
}
