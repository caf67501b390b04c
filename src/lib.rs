//! # Pain Index
//!
//! Ranks cryptocurrency assets by a "pain score": how hard their price has
//! fallen recently. Listings come from off-chain market data providers
//! (CoinMarketCap first, CoinGecko as fallback) and the computed leaderboard is
//! cached for 15 minutes.
//!
//! ## Usage
//!
//! ```no_run
//! use pain_index::{LeaderboardConfig, PainIndexTracker};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = PainIndexTracker::new(LeaderboardConfig::from_env())?;
//!
//! for asset in tracker.get_leaderboard().await {
//!     println!("#{} {} ({}): pain {}", asset.rank, asset.name, asset.symbol, asset.pain_score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! PainIndexTracker::get_leaderboard()
//!     ↓
//! AggregationCache (fresh for 15 min)
//!     ↓ on expiry
//! ProviderChain (CoinMarketCap → CoinGecko, first non-empty wins)
//!     ↓
//! assembler (raw record → Asset, pain score)
//!     ↓
//! ranking (stable sort by pain, dense ranks)
//! ```
//!
//! ## Pain Score
//!
//! Only declines count. The 24h, 7d and 30d declines are weighted 50/30/20,
//! scaled by 2.5, and a 24h drop beyond 10% (+15) or 20% (+10 more) adds a
//! bonus. The result is floored and capped at 100.
//!
//! ## Failure Handling
//!
//! Provider failures, timeouts and empty listings fall through to the next
//! provider. Records missing a name or symbol are dropped. When every
//! provider comes back empty the tracker caches an empty leaderboard for the
//! usual TTL instead of failing.

pub mod assembler;
pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod provider;
pub mod providers;
pub mod ranking;
pub mod score;
pub mod tracker;
pub mod types;

// Re-export commonly used types
pub use cache::{AggregationCache, Clock, SystemClock};
pub use config::{LeaderboardConfig, ProviderSelection};
pub use error::{ProviderError, RecordError};
pub use metrics::ProviderMetrics;
pub use provider::MarketDataProvider;
pub use tracker::PainIndexTracker;
pub use types::{
    Asset, ComponentHealth, HealthStatus, LeaderboardSnapshot, Quote, RawAssetRecord,
};
