use allie_core::config::Config;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Pick up API keys from `.env` during local development.
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let config_path = std::env::var("ALLIE_CONFIG").unwrap_or_else(|_| "allie.toml".to_string());

    let config = Config::load(Path::new(&config_path)).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to load config");
        std::process::exit(1);
    });

    let port = config.server.port;
    tracing::info!(config = %config_path, port, "allie: starting");

    let brain = Arc::new(
        allie_brain::brain::Brain::new(config)
            .await
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "failed to initialize brain");
                std::process::exit(1);
            }),
    );

    if let Err(e) = allie_brain::http::serve(brain, port).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
