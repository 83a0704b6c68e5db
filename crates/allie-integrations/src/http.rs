use std::time::Duration;

use allie_core::error::{AllieError, Result};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// Build the shared HTTP client used by every provider.
pub fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AllieError::Config(format!("failed to build http client: {e}")))
}

/// Send a request and decode a JSON body, mapping every failure mode
/// (transport, non-2xx, malformed body) into an `AllieError`.
pub async fn send_json<T: DeserializeOwned>(provider: &str, request: RequestBuilder) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| AllieError::Integration(format!("{provider} request failed: {e}")))?;

    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| AllieError::Integration(format!("{provider} read failed: {e}")))?;

    if !(200..300).contains(&status) {
        return Err(AllieError::Http { status, body: text });
    }

    serde_json::from_str(&text)
        .map_err(|e| AllieError::Integration(format!("{provider} parse failed: {e}")))
}

/// A RapidAPI-hosted endpoint: every call carries the account key and the
/// host the key is being used against.
#[derive(Clone)]
pub struct RapidApi {
    client: Client,
    base_url: String,
    host: String,
    key: String,
}

impl RapidApi {
    /// Fails when `base_url` is not an absolute URL with a host.
    pub fn new(client: Client, base_url: &str, key: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self {
            host: host_of(&base_url)?,
            client,
            base_url,
            key: key.to_string(),
        })
    }

    /// GET `{base_url}{path}` with the RapidAPI auth headers attached.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .header("X-RapidAPI-Key", &self.key)
            .header("X-RapidAPI-Host", &self.host)
    }
}

/// Host portion of a URL, without scheme, port, or path.
fn host_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url)
        .map_err(|e| AllieError::Config(format!("invalid provider url {url:?}: {e}")))?;
    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| AllieError::Config(format!("provider url {url:?} has no host")))
}

/// Percent-encode a single path segment.
pub fn encode_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
