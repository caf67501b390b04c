//! Cascading provider chain

use crate::{
    error::ProviderError,
    metrics::{MetricsCollector, ProviderMetrics},
    provider::MarketDataProvider,
    types::RawAssetRecord,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of walking the chain once
#[derive(Debug)]
pub enum ChainOutcome {
    /// A provider returned usable records
    Fetched {
        provider: &'static str,
        records: Vec<RawAssetRecord>,
    },
    /// Every provider failed or came back empty
    Exhausted,
}

struct ChainLink {
    provider: Arc<dyn MarketDataProvider>,
    metrics: MetricsCollector,
}

/// Tries providers in priority order and keeps the first listing with a usable record
///
/// There is no merging and no retry: one provider wins the whole refresh.
pub struct ProviderChain {
    links: Vec<ChainLink>,
    timeout: Duration,
}

impl ProviderChain {
    /// Creates a new chain
    ///
    /// The providers are tried in the order they are provided; each attempt is cut
    /// off after `timeout`.
    pub fn new(providers: Vec<Arc<dyn MarketDataProvider>>, timeout: Duration) -> Self {
        let links = providers
            .into_iter()
            .map(|provider| ChainLink {
                metrics: MetricsCollector::new(provider.provider_name()),
                provider,
            })
            .collect();

        Self { links, timeout }
    }

    /// Names of the providers, in priority order
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.links.iter().map(|l| l.provider.provider_name()).collect()
    }

    async fn attempt(&self, link: &ChainLink) -> Result<Vec<RawAssetRecord>, ProviderError> {
        let name = link.provider.provider_name();
        match tokio::time::timeout(self.timeout, link.provider.try_fetch()).await {
            Ok(Ok(records)) if !records.iter().any(RawAssetRecord::has_identity) => {
                Err(ProviderError::EmptyPayload(name))
            }
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout),
        }
    }

    /// Walks the chain once
    pub async fn fetch(&self) -> ChainOutcome {
        for link in &self.links {
            let name = link.provider.provider_name();
            let start = Instant::now();

            match self.attempt(link).await {
                Ok(records) => {
                    link.metrics.record_success(start.elapsed()).await;
                    tracing::info!(
                        provider = name,
                        count = records.len(),
                        latency_ms = start.elapsed().as_millis() as u64,
                        "Provider returned listing"
                    );
                    return ChainOutcome::Fetched {
                        provider: name,
                        records,
                    };
                }
                Err(e) => {
                    link.metrics
                        .record_failure(start.elapsed(), e.to_string())
                        .await;
                    tracing::warn!(provider = name, error = %e, "Provider unavailable, falling through");
                }
            }
        }

        tracing::warn!(
            providers = self.links.len(),
            "All providers exhausted, serving an empty leaderboard"
        );
        ChainOutcome::Exhausted
    }

    /// Current metrics for every provider, in priority order
    pub async fn metrics(&self) -> Vec<ProviderMetrics> {
        let mut metrics = Vec::with_capacity(self.links.len());
        for link in &self.links {
            metrics.push(link.metrics.get_metrics().await);
        }
        metrics
    }
}
