//! Market data provider implementations

pub mod chain;
pub mod coingecko;
pub mod coinmarketcap;

pub use chain::{ChainOutcome, ProviderChain};
pub use coingecko::CoinGeckoProvider;
pub use coinmarketcap::CoinMarketCapProvider;

use crate::constants::USER_AGENTS;
use rand::seq::SliceRandom;

/// Picks a browser user agent for a new HTTP client
pub(crate) fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}
