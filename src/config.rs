//! Runtime configuration for the leaderboard
//!
//! Defaults come from [`crate::constants`]; each value can be overridden with a
//! `PAIN_INDEX_*` environment variable. Unparseable values fall back to the
//! default and log a warning.

use crate::constants::{
    CACHE_TTL_SECS, COINGECKO_API_URL, COINMARKETCAP_LISTING_URL, LISTING_LIMIT,
    REQUEST_TIMEOUT_SECS,
};
use std::str::FromStr;
use std::time::Duration;

/// Which providers to query, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderSelection {
    /// CoinMarketCap first, CoinGecko as fallback
    Failover,
    CoinMarketCap,
    CoinGecko,
}

impl ProviderSelection {
    /// Parses a provider name; anything unknown selects the failover chain
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "coinmarketcap" | "cmc" => Self::CoinMarketCap,
            "coingecko" => Self::CoinGecko,
            _ => Self::Failover,
        }
    }
}

/// Settings consumed by the tracker, the providers and the cache
#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    /// How long a computed leaderboard is served before refreshing
    pub cache_ttl: Duration,
    /// Per-provider request timeout
    pub request_timeout: Duration,
    /// Number of assets requested from each provider
    pub listing_limit: u32,
    pub providers: ProviderSelection,
    pub coinmarketcap_url: String,
    pub coingecko_url: String,
    /// Optional CoinGecko demo API key
    pub coingecko_api_key: Option<String>,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(CACHE_TTL_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            listing_limit: LISTING_LIMIT,
            providers: ProviderSelection::Failover,
            coinmarketcap_url: COINMARKETCAP_LISTING_URL.to_string(),
            coingecko_url: COINGECKO_API_URL.to_string(),
            coingecko_api_key: None,
        }
    }
}

impl LeaderboardConfig {
    /// Reads overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache_ttl = parse_or(&lookup, "PAIN_INDEX_CACHE_TTL_SECS", CACHE_TTL_SECS);
        let request_timeout = parse_or(
            &lookup,
            "PAIN_INDEX_REQUEST_TIMEOUT_SECS",
            REQUEST_TIMEOUT_SECS,
        );
        let listing_limit = parse_or(&lookup, "PAIN_INDEX_LISTING_LIMIT", LISTING_LIMIT);

        Self {
            cache_ttl: Duration::from_secs(cache_ttl),
            request_timeout: Duration::from_secs(request_timeout),
            listing_limit,
            providers: lookup("PAIN_INDEX_PROVIDER")
                .map(|name| ProviderSelection::from_name(&name))
                .unwrap_or(defaults.providers),
            coinmarketcap_url: non_empty(lookup("PAIN_INDEX_COINMARKETCAP_URL"))
                .unwrap_or(defaults.coinmarketcap_url),
            coingecko_url: non_empty(lookup("PAIN_INDEX_COINGECKO_URL"))
                .unwrap_or(defaults.coingecko_url),
            coingecko_api_key: non_empty(lookup("PAIN_INDEX_COINGECKO_API_KEY")),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "Invalid setting, using default");
            default
        }),
        None => default,
    }
}
