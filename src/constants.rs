//! Constants for the pain index
//!
//! Compile-time defaults for the leaderboard. Every value here can be overridden
//! at runtime through the environment, see [`crate::config::LeaderboardConfig`].

/// How long a computed leaderboard stays fresh (in seconds)
pub const CACHE_TTL_SECS: u64 = 15 * 60;

/// HTTP request timeout when calling a provider (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Number of assets requested from each provider
pub const LISTING_LIMIT: u32 = 100;

/// CoinMarketCap data-api listing endpoint (the one coinmarketcap.com itself uses)
pub const COINMARKETCAP_LISTING_URL: &str =
    "https://api.coinmarketcap.com/data-api/v3/cryptocurrency/listing";

/// CoinMarketCap static logo location, `{id}.png` is appended
pub const COINMARKETCAP_LOGO_URL: &str = "https://s2.coinmarketcap.com/static/img/coins/64x64";

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko endpoint for market listings
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// Browser user agents rotated across provider clients
///
/// The CoinMarketCap data-api rejects non-browser agents with a 403.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/605.1.15 \
     (KHTML, like Gecko) Version/16.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36",
];

/// Weight of the 24h decline in the pain score
pub const WEIGHT_24H: f64 = 0.50;

/// Weight of the 7d decline in the pain score
pub const WEIGHT_7D: f64 = 0.30;

/// Weight of the 30d decline in the pain score
pub const WEIGHT_30D: f64 = 0.20;

/// Multiplier applied to the weighted decline
pub const SCORE_SCALE: f64 = 2.5;

/// 24h decline (in percent) past which the first escalation bonus applies
pub const CRASH_THRESHOLD_24H: f64 = 10.0;

/// Bonus added once the 24h decline passes [`CRASH_THRESHOLD_24H`]
pub const CRASH_BONUS: f64 = 15.0;

/// 24h decline (in percent) past which the second escalation bonus applies
pub const CAPITULATION_THRESHOLD_24H: f64 = 20.0;

/// Bonus added on top of [`CRASH_BONUS`] once the 24h decline passes
/// [`CAPITULATION_THRESHOLD_24H`]
pub const CAPITULATION_BONUS: f64 = 10.0;

/// Upper bound of the pain score
pub const MAX_PAIN_SCORE: u8 = 100;
