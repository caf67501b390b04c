//! CoinGecko market listing provider implementation

use crate::{
    config::LeaderboardConfig,
    constants::COINGECKO_MARKETS_ENDPOINT,
    error::ProviderError,
    provider::MarketDataProvider,
    types::{Quote, RawAssetRecord},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// One entry of the `/coins/markets` response
#[derive(Debug, Deserialize)]
struct MarketEntry {
    id: Option<String>,
    symbol: Option<String>,
    name: Option<String>,
    image: Option<String>,
    current_price: Option<f64>,
    price_change_percentage_24h: Option<f64>,
}

/// CoinGecko listing provider
///
/// Only reports a price and a 24h change; the 7d and 30d periods stay at zero.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    limit: u32,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider
    pub fn new(config: &LeaderboardConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(super::random_user_agent())
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            base_url: config.coingecko_url.trim_end_matches('/').to_string(),
            api_key: config.coingecko_api_key.clone(),
            limit: config.listing_limit,
        })
    }

    /// Builds the CoinGecko API URL for the market listing
    fn build_url(&self) -> String {
        format!(
            "{}{}?vs_currency=usd&order=market_cap_desc&per_page={}&page=1",
            self.base_url, COINGECKO_MARKETS_ENDPOINT, self.limit
        )
    }
}

/// Parses a `/coins/markets` body into raw records
///
/// Entries without a price are skipped.
pub fn parse_markets(body: &str) -> Result<Vec<RawAssetRecord>, ProviderError> {
    let entries: Vec<MarketEntry> = serde_json::from_str(body).map_err(|e| {
        ProviderError::InvalidResponse(format!("Failed to parse CoinGecko markets: {}", e))
    })?;

    let records = entries
        .into_iter()
        .filter_map(|entry| {
            let price = entry.current_price?;
            Some(RawAssetRecord {
                source_id: entry.id,
                name: entry.name,
                symbol: entry.symbol.map(|s| s.to_uppercase()),
                quote: Some(Quote::daily(
                    price,
                    entry.price_change_percentage_24h.unwrap_or_default(),
                )),
                logo_url: entry.image,
            })
        })
        .collect();

    Ok(records)
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn try_fetch(&self) -> Result<Vec<RawAssetRecord>, ProviderError> {
        let url = self.build_url();
        tracing::debug!(url = %url, "Fetching CoinGecko markets");

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request.send().await.map_err(ProviderError::from_request)?;

        if response.status().as_u16() == 429 {
            return Err(ProviderError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let body = response.text().await.map_err(ProviderError::from_request)?;
        let records = parse_markets(&body)?;

        if records.is_empty() {
            return Err(ProviderError::EmptyPayload(self.provider_name()));
        }

        tracing::debug!(count = records.len(), "Fetched CoinGecko markets");
        Ok(records)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
