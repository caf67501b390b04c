use std::sync::Arc;

use crate::config::Config;
use anyhow::Context;
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use pain_index::{Asset, ComponentHealth, HealthStatus, PainIndexTracker, ProviderMetrics};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub type AppState = Arc<PainIndexTracker>;

async fn healthz() -> &'static str {
    "ok"
}

/// Leaderboard ordered by pain score, served from the cache when fresh.
async fn get_leaderboard(State(tracker): State<AppState>) -> Json<Vec<Asset>> {
    Json(tracker.get_leaderboard().await)
}

async fn get_health(State(tracker): State<AppState>) -> (StatusCode, Json<ComponentHealth>) {
    let health = tracker.health_check().await;
    let status = match health.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
    };
    (status, Json(health))
}

async fn get_metrics(State(tracker): State<AppState>) -> Json<Vec<ProviderMetrics>> {
    Json(tracker.provider_metrics().await)
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.cors_allow.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let origins = config
        .cors_allow
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {o}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(layer.allow_origin(origins))
}

pub fn app_router(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/health", get(get_health))
        .route("/api/metrics", get(get_metrics))
        .with_state(state)
        .layer(cors_layer(config)?)
        .layer(TraceLayer::new_for_http());
    Ok(router)
}
