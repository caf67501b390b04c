//! Types for the pain index leaderboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Market snapshot of a single asset
///
/// Percent changes are signed; providers that do not report a period leave it at 0.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Price in USD
    #[serde(default)]
    pub price: f64,

    /// 24h price change percentage
    #[serde(default)]
    pub percent_change_24h: f64,

    /// 7d price change percentage
    #[serde(default)]
    pub percent_change_7d: f64,

    /// 30d price change percentage
    #[serde(default)]
    pub percent_change_30d: f64,
}

impl Quote {
    /// Creates a quote with all three change periods
    pub fn new(price: f64, change_24h: f64, change_7d: f64, change_30d: f64) -> Self {
        Self {
            price,
            percent_change_24h: change_24h,
            percent_change_7d: change_7d,
            percent_change_30d: change_30d,
        }
    }

    /// Creates a quote for sources that only report a daily change
    pub fn daily(price: f64, change_24h: f64) -> Self {
        Self::new(price, change_24h, 0.0, 0.0)
    }
}

/// Loosely-typed record as produced by a provider
///
/// Nothing here is validated yet; the assembler decides whether the record is usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAssetRecord {
    /// Provider-specific identifier, if any
    pub source_id: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub quote: Option<Quote>,
    pub logo_url: Option<String>,
}

/// True when an identity field holds something other than whitespace
pub fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl RawAssetRecord {
    /// True when both name and symbol are usable
    pub fn has_identity(&self) -> bool {
        is_present(self.name.as_deref()) && is_present(self.symbol.as_deref())
    }

    /// Creates a record with name, symbol and quote set
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, quote: Quote) -> Self {
        Self {
            source_id: None,
            name: Some(name.into()),
            symbol: Some(symbol.into()),
            quote: Some(quote),
            logo_url: None,
        }
    }

    /// Sets the logo URL
    pub fn with_logo(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }

    /// Sets the provider-specific identifier
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }
}

/// A ranked leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// 1-based position on the leaderboard, 0 until ranked
    pub rank: u32,

    /// Slug of the name followed by the lowercase symbol, e.g. `bitcoin-cash-bch`
    pub id: String,

    pub name: String,

    pub symbol: String,

    /// Price in USD
    pub price: f64,

    /// Currently the 24h change.
    ///
    /// Neither provider reports the distance from the all-time high, the field
    /// keeps its name for API compatibility.
    pub percent_from_ath: f64,

    /// Severity of the recent decline, 0..=100
    pub pain_score: u8,

    pub logo_url: String,
}

/// One computed leaderboard, as held by the cache
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardSnapshot {
    /// Identifier of this refresh, used to correlate log lines
    pub id: Uuid,

    /// Provider the assets came from, `None` when every provider came back empty
    pub provider: Option<&'static str>,

    /// Assets ordered by rank
    pub assets: Vec<Asset>,

    /// When the snapshot was computed
    pub computed_at: DateTime<Utc>,
}

impl LeaderboardSnapshot {
    /// Creates a new snapshot
    pub fn new(
        provider: Option<&'static str>,
        assets: Vec<Asset>,
        computed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider,
            assets,
            computed_at,
        }
    }

    /// Age of the snapshot at `now`; negative ages (clock skew) clamp to zero
    pub fn age(&self, now: DateTime<Utc>) -> std::time::Duration {
        now.signed_duration_since(self.computed_at)
            .to_std()
            .unwrap_or_default()
    }

    /// Check if the snapshot is older than `ttl` at `now`
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: std::time::Duration) -> bool {
        self.age(now) > ttl
    }

    /// True when the refresh that produced this snapshot found no provider with data
    pub fn is_exhausted(&self) -> bool {
        self.provider.is_none()
    }
}

/// Overall system health status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// System is healthy and all components are operational
    Healthy,
    /// System is degraded but still functional
    Degraded,
    /// System is unhealthy and requires attention
    Unhealthy,
}

/// Component health information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional status message
    pub message: Option<String>,
    /// Component-specific details
    pub details: std::collections::HashMap<String, serde_json::Value>,
    /// Last checked timestamp
    pub last_checked: DateTime<Utc>,
}
