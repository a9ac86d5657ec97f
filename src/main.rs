// RunAI Check: running shoe wear assessment backed by Google Gemini.

mod analysis;
mod config;
mod data_uri;
mod gemini;
mod page;
mod server;

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    analysis::ShoeAnalyzer,
    config::Config,
    gemini::GeminiClient,
    server::{router, AppState},
};

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let config = Config::parse();
    init_tracing(config.log_json);

    if config.api_key.is_empty() {
        tracing::warn!("GOOGLE_API_KEY is not set; every analysis will fail");
    }

    let client = GeminiClient::from_config(&config);
    info!(model = client.model_name(), "Gemini client ready");

    let state = Arc::new(AppState {
        analyzer: ShoeAnalyzer::new(client),
        max_upload_bytes: config.max_upload_bytes,
    });

    let app = router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
