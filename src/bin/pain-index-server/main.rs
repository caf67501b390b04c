mod api;
mod config;

use std::sync::Arc;

use api::app_router;
use config::Config;
use pain_index::PainIndexTracker;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let log_format = std::env::var("PAIN_INDEX_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // config parsing logs its fallbacks, so the subscriber goes in first
    dotenvy::dotenv().ok();
    init_tracing();
    let config = Config::from_env()?;

    let tracker = Arc::new(PainIndexTracker::new(config.leaderboard.clone())?);
    let router = app_router(tracker, &config)?;

    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
