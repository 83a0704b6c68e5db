use allie_core::config::Config;
use allie_core::error::Result;
use allie_integrations::Integrations;

use crate::service::llm::LlmDispatch;
use crate::service::store::ScheduleStore;

mod chat;
mod handlers;
mod router;
mod scheduling;
mod transcribe;

pub use chat::Personality;
pub use handlers::normalize_city;
pub use router::SmartRequest;
pub use scheduling::DeleteRequest;
pub use transcribe::transcribe_file;

/// Everything a request handler needs, built once at startup and shared
/// behind an `Arc` by the HTTP layer.
///
/// Brain owns no per-request state; conversation history arrives with each
/// request and is never stored.
pub struct Brain {
    pub(crate) config: Config,
    pub(crate) llm: LlmDispatch,
    pub(crate) integrations: Integrations,
    pub(crate) store: ScheduleStore,
}

impl Brain {
    /// Initialize a new Brain with the given configuration.
    pub async fn new(config: Config) -> Result<Self> {
        let store = if !config.database.turso_url.is_empty() {
            tracing::info!(url = %config.database.turso_url, "opening remote schedule store");
            ScheduleStore::new_remote(&config.database.turso_url, &config.database.turso_token)
                .await?
        } else {
            tracing::info!(path = %config.database.path, "opening local schedule store");
            ScheduleStore::new(&config.database.path).await?
        };

        let llm = LlmDispatch::new(&config.llm)?;
        let integrations = Integrations::from_config(&config.integrations)?;

        if config.integrations.rapidapi_key.is_empty() {
            tracing::warn!("no RapidAPI key configured; weather, sports and jokes will apologize");
        }

        Ok(Self {
            config,
            llm,
            integrations,
            store,
        })
    }
}
