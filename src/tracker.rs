//! Pain index tracker service
//!
//! Wires configuration, providers, the chain and the cache into the single
//! query the transport layer needs.

use crate::{
    cache::{AggregationCache, Clock, SystemClock},
    config::{LeaderboardConfig, ProviderSelection},
    error::ProviderError,
    metrics::ProviderMetrics,
    provider::MarketDataProvider,
    providers::{CoinGeckoProvider, CoinMarketCapProvider, ProviderChain},
    types::{Asset, ComponentHealth, HealthStatus, LeaderboardSnapshot},
};
use std::sync::Arc;

/// Pain index tracker
///
/// Serves the leaderboard from the cache and refreshes it from the providers
/// when it expires.
///
/// # Example
/// ```no_run
/// use pain_index::{LeaderboardConfig, PainIndexTracker};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tracker = PainIndexTracker::new(LeaderboardConfig::from_env())?;
/// for asset in tracker.get_leaderboard().await {
///     println!("#{} {} pain={}", asset.rank, asset.symbol, asset.pain_score);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PainIndexTracker {
    cache: AggregationCache,
    clock: Arc<dyn Clock>,
}

impl PainIndexTracker {
    /// Creates a tracker with the providers selected by `config`
    ///
    /// By default CoinMarketCap is the primary and CoinGecko the fallback.
    pub fn new(config: LeaderboardConfig) -> Result<Self, ProviderError> {
        let providers: Vec<Arc<dyn MarketDataProvider>> = match config.providers {
            ProviderSelection::CoinMarketCap => {
                vec![Arc::new(CoinMarketCapProvider::new(&config)?)]
            }
            ProviderSelection::CoinGecko => vec![Arc::new(CoinGeckoProvider::new(&config)?)],
            ProviderSelection::Failover => vec![
                Arc::new(CoinMarketCapProvider::new(&config)?),
                Arc::new(CoinGeckoProvider::new(&config)?),
            ],
        };

        Ok(Self::with_providers(providers, &config, Arc::new(SystemClock)))
    }

    /// Creates a tracker with custom providers and clock
    ///
    /// This is primarily for testing with mock providers.
    pub fn with_providers(
        providers: Vec<Arc<dyn MarketDataProvider>>,
        config: &LeaderboardConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let chain = ProviderChain::new(providers, config.request_timeout);
        tracing::info!(
            providers = ?chain.provider_names(),
            ttl_secs = config.cache_ttl.as_secs(),
            "Pain index tracker ready"
        );

        Self {
            cache: AggregationCache::new(chain, config.cache_ttl),
            clock,
        }
    }

    /// Gets the ranked leaderboard, refreshing it if the cache expired
    pub async fn get_leaderboard(&self) -> Vec<Asset> {
        self.snapshot().await.assets.clone()
    }

    /// Gets the full cached snapshot, refreshing it if the cache expired
    pub async fn snapshot(&self) -> Arc<LeaderboardSnapshot> {
        self.cache.get(self.clock.now()).await
    }

    /// Forces an immediate refresh
    ///
    /// This bypasses the TTL and walks the provider chain right away.
    pub async fn refresh_now(&self) -> Arc<LeaderboardSnapshot> {
        self.cache.refresh(self.clock.now()).await
    }

    /// Gets metrics for every provider in the chain, in priority order
    pub async fn provider_metrics(&self) -> Vec<ProviderMetrics> {
        self.cache.chain().metrics().await
    }

    /// Perform a health check on the tracker
    ///
    /// Does not trigger a refresh.
    pub async fn health_check(&self) -> ComponentHealth {
        let now = self.clock.now();
        let mut details = std::collections::HashMap::new();
        details.insert(
            "providers".to_string(),
            serde_json::json!(self.cache.chain().provider_names()),
        );
        details.insert(
            "ttl_secs".to_string(),
            serde_json::json!(self.cache.ttl().as_secs()),
        );

        let (status, message) = match self.cache.peek().await {
            None => (
                HealthStatus::Unhealthy,
                "No leaderboard has been computed yet".to_string(),
            ),
            Some(snapshot) => {
                let age = snapshot.age(now);
                details.insert("assets".to_string(), serde_json::json!(snapshot.assets.len()));
                details.insert("age_secs".to_string(), serde_json::json!(age.as_secs()));
                details.insert("provider".to_string(), serde_json::json!(snapshot.provider));
                details.insert("snapshot_id".to_string(), serde_json::json!(snapshot.id));

                if snapshot.is_exhausted() {
                    (
                        HealthStatus::Unhealthy,
                        "Last refresh found no provider with data".to_string(),
                    )
                } else if snapshot.is_stale(now, self.cache.ttl()) {
                    (
                        HealthStatus::Degraded,
                        format!("Leaderboard is stale (age: {}s)", age.as_secs()),
                    )
                } else {
                    (
                        HealthStatus::Healthy,
                        format!(
                            "Serving {} assets from {}",
                            snapshot.assets.len(),
                            snapshot.provider.unwrap_or("none")
                        ),
                    )
                }
            }
        };

        ComponentHealth {
            name: "pain_index_tracker".to_string(),
            status,
            message: Some(message),
            details,
            last_checked: now,
        }
    }
}
