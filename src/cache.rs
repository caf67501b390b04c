//! Time-boxed leaderboard cache
//!
//! Holds the last computed [`LeaderboardSnapshot`] and rebuilds it lazily, on the
//! first request that finds it missing or older than the TTL.

use crate::{
    assembler::assemble_all,
    providers::{ChainOutcome, ProviderChain},
    ranking::rank_assets,
    types::LeaderboardSnapshot,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Memoizes chain + assembly + ranking for `ttl`
///
/// At most one refresh runs at a time. Callers that arrive while a refresh is in
/// flight wait for it and then get its snapshot.
pub struct AggregationCache {
    chain: ProviderChain,
    ttl: Duration,
    entry: RwLock<Option<Arc<LeaderboardSnapshot>>>,
    refresh_lock: Mutex<()>,
}

impl AggregationCache {
    /// Creates an empty cache over a provider chain
    pub fn new(chain: ProviderChain, ttl: Duration) -> Self {
        Self {
            chain,
            ttl,
            entry: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Returns the leaderboard as of `now`, refreshing it if missing or stale
    pub async fn get(&self, now: DateTime<Utc>) -> Arc<LeaderboardSnapshot> {
        if let Some(snapshot) = self.fresh(now).await {
            tracing::debug!(snapshot_id = %snapshot.id, "Serving cached leaderboard");
            return snapshot;
        }

        let _guard = self.refresh_lock.lock().await;

        // another caller may have refreshed while we waited
        if let Some(snapshot) = self.fresh(now).await {
            return snapshot;
        }

        tracing::info!("Leaderboard cache expired, refreshing from providers");
        self.rebuild(now).await
    }

    /// Rebuilds the leaderboard regardless of its age
    pub async fn refresh(&self, now: DateTime<Utc>) -> Arc<LeaderboardSnapshot> {
        let _guard = self.refresh_lock.lock().await;
        self.rebuild(now).await
    }

    /// Current snapshot without triggering a refresh
    pub async fn peek(&self) -> Option<Arc<LeaderboardSnapshot>> {
        self.entry.read().await.clone()
    }

    /// Configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The chain this cache refreshes from
    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    async fn fresh(&self, now: DateTime<Utc>) -> Option<Arc<LeaderboardSnapshot>> {
        self.entry
            .read()
            .await
            .as_ref()
            .filter(|snapshot| !snapshot.is_stale(now, self.ttl))
            .cloned()
    }

    /// Must be called with `refresh_lock` held
    async fn rebuild(&self, now: DateTime<Utc>) -> Arc<LeaderboardSnapshot> {
        let snapshot = match self.chain.fetch().await {
            ChainOutcome::Fetched { provider, records } => {
                let assets = rank_assets(assemble_all(records));
                LeaderboardSnapshot::new(Some(provider), assets, now)
            }
            ChainOutcome::Exhausted => LeaderboardSnapshot::new(None, Vec::new(), now),
        };
        let snapshot = Arc::new(snapshot);

        tracing::info!(
            snapshot_id = %snapshot.id,
            provider = snapshot.provider.unwrap_or("none"),
            assets = snapshot.assets.len(),
            "Leaderboard refreshed"
        );

        *self.entry.write().await = Some(snapshot.clone());
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{mock::MockProvider, MarketDataProvider};
    use crate::types::{Quote, RawAssetRecord};
    use chrono::TimeZone;
    use tokio::task::JoinSet;

    const TTL: Duration = Duration::from_secs(900);

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn secs(n: i64) -> chrono::Duration {
        chrono::Duration::seconds(n)
    }

    fn record(name: &str, symbol: &str, change_24h: f64) -> RawAssetRecord {
        RawAssetRecord::new(name, symbol, Quote::daily(10.0, change_24h))
    }

    fn cache_over(providers: &[&MockProvider]) -> AggregationCache {
        let providers = providers
            .iter()
            .map(|p| Arc::new((*p).clone()) as Arc<dyn MarketDataProvider>)
            .collect();
        AggregationCache::new(ProviderChain::new(providers, Duration::from_secs(1)), TTL)
    }

    #[tokio::test]
    async fn test_refresh_ranks_assets() {
        let primary = MockProvider::returning(
            "primary",
            vec![
                record("Calm", "CLM", 2.0),
                record("Bitcoin Cash", "bch", -15.0),
                record("Dumped", "DMP", -25.0),
                record("Also Calm", "AC", 0.0),
            ],
        );
        let cache = cache_over(&[&primary]);

        let snapshot = cache.get(t0()).await;
        let ranked: Vec<_> = snapshot
            .assets
            .iter()
            .map(|a| (a.rank, a.id.as_str(), a.pain_score))
            .collect();

        assert_eq!(
            ranked,
            vec![
                (1, "dumped-dmp", 56),
                (2, "bitcoin-cash-bch", 33),
                (3, "calm-clm", 0),
                (4, "also-calm-ac", 0),
            ]
        );
        assert_eq!(snapshot.provider, Some("primary"));
        assert_eq!(snapshot.computed_at, t0());
    }

    #[tokio::test]
    async fn test_fresh_hits_do_not_call_providers() {
        let primary = MockProvider::returning("primary", vec![record("A", "A", -1.0)]);
        let cache = cache_over(&[&primary]);

        let first = cache.get(t0()).await;
        let second = cache.get(t0() + secs(900)).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(primary.call_count(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_refreshes_once() {
        let primary = MockProvider::returning("primary", vec![record("A", "A", -1.0)]);
        let cache = cache_over(&[&primary]);

        let first = cache.get(t0()).await;
        let second = cache.get(t0() + secs(901)).await;
        let third = cache.get(t0() + secs(1000)).await;

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &third));
        assert_eq!(second.computed_at, t0() + secs(901));
        assert_eq!(primary.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fallback_uses_secondary_exclusively() {
        let primary = MockProvider::returning("primary", Vec::new());
        let secondary = MockProvider::returning(
            "secondary",
            vec![record("Solana", "SOL", -12.0), record("Ether", "ETH", -30.0)],
        );
        let cache = cache_over(&[&primary, &secondary]);

        let snapshot = cache.get(t0()).await;
        let ids: Vec<_> = snapshot.assets.iter().map(|a| a.id.as_str()).collect();

        assert_eq!(ids, vec!["ether-eth", "solana-sol"]);
        assert_eq!(snapshot.provider, Some("secondary"));
    }

    #[tokio::test]
    async fn test_exhausted_chain_caches_empty_leaderboard() {
        let primary = MockProvider::failing("primary");
        let secondary = MockProvider::returning("secondary", Vec::new());
        let cache = cache_over(&[&primary, &secondary]);

        let first = cache.get(t0()).await;
        assert!(first.assets.is_empty());
        assert!(first.is_exhausted());

        let second = cache.get(t0() + secs(60)).await;
        assert!(second.assets.is_empty());
        assert_eq!(primary.call_count(), 1);
        assert_eq!(secondary.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_records_are_dropped() {
        let primary = MockProvider::returning(
            "primary",
            vec![
                record("Good", "GD", -5.0),
                RawAssetRecord {
                    symbol: Some("NONAME".to_string()),
                    ..Default::default()
                },
                record("Fine", "FN", -50.0),
            ],
        );
        let cache = cache_over(&[&primary]);

        let snapshot = cache.get(t0()).await;
        let ranked: Vec<_> = snapshot.assets.iter().map(|a| (a.rank, a.id.as_str())).collect();
        assert_eq!(ranked, vec![(1, "fine-fn"), (2, "good-gd")]);
    }

    #[tokio::test]
    async fn test_unusable_primary_listing_uses_secondary() {
        let primary = MockProvider::returning(
            "primary",
            vec![
                RawAssetRecord {
                    symbol: Some("BTC".to_string()),
                    ..Default::default()
                },
                RawAssetRecord {
                    name: Some("Nameless".to_string()),
                    ..Default::default()
                },
            ],
        );
        let secondary = MockProvider::returning("secondary", vec![record("Ether", "ETH", -3.0)]);
        let cache = cache_over(&[&primary, &secondary]);

        let snapshot = cache.get(t0()).await;
        assert_eq!(snapshot.provider, Some("secondary"));
        assert_eq!(snapshot.assets.len(), 1);
        assert_eq!(snapshot.assets[0].id, "ether-eth");

        let later = cache.get(t0() + secs(600)).await;
        assert!(Arc::ptr_eq(&snapshot, &later));
        assert_eq!(secondary.call_count(), 1);
    }

    #[tokio::test]
    async fn test_forced_refresh() {
        let primary = MockProvider::returning("primary", vec![record("A", "A", -1.0)]);
        let cache = cache_over(&[&primary]);

        assert!(cache.peek().await.is_none());
        cache.get(t0()).await;
        let forced = cache.refresh(t0() + secs(5)).await;

        assert_eq!(primary.call_count(), 2);
        assert_eq!(forced.computed_at, t0() + secs(5));
        assert!(Arc::ptr_eq(&forced, &cache.peek().await.unwrap()));
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let primary = MockProvider::returning("primary", vec![record("A", "A", -1.0)])
            .with_delay(Duration::from_millis(50));
        let cache = Arc::new(cache_over(&[&primary]));

        let mut callers = JoinSet::new();
        for _ in 0..8 {
            let cache = cache.clone();
            callers.spawn(async move { cache.get(t0()).await });
        }

        let mut snapshots = Vec::new();
        while let Some(result) = callers.join_next().await {
            snapshots.push(result.unwrap());
        }

        assert_eq!(primary.call_count(), 1);
        assert!(snapshots.iter().all(|s| Arc::ptr_eq(s, &snapshots[0])));
    }
}
