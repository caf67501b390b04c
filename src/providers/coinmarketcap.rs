//! CoinMarketCap listing provider implementation
//!
//! Uses the public data-api endpoint that backs coinmarketcap.com. It needs no key
//! but expects browser-like headers.

use crate::{
    config::LeaderboardConfig,
    constants::COINMARKETCAP_LOGO_URL,
    error::ProviderError,
    provider::MarketDataProvider,
    types::{Quote, RawAssetRecord},
};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER},
    Client,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ListingResponse {
    data: Option<ListingData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingData {
    #[serde(default)]
    crypto_currency_list: Vec<ListedCoin>,
}

#[derive(Debug, Deserialize)]
struct ListedCoin {
    id: Option<u64>,
    name: Option<String>,
    symbol: Option<String>,
    #[serde(default)]
    quotes: Vec<ListedQuote>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedQuote {
    name: Option<String>,
    price: Option<f64>,
    percent_change24h: Option<f64>,
    percent_change7d: Option<f64>,
    percent_change30d: Option<f64>,
}

impl From<&ListedQuote> for Quote {
    fn from(q: &ListedQuote) -> Self {
        Quote::new(
            q.price.unwrap_or_default(),
            q.percent_change24h.unwrap_or_default(),
            q.percent_change7d.unwrap_or_default(),
            q.percent_change30d.unwrap_or_default(),
        )
    }
}

/// CoinMarketCap listing provider
pub struct CoinMarketCapProvider {
    client: Client,
    url: String,
    limit: u32,
}

impl CoinMarketCapProvider {
    /// Creates a new CoinMarketCap provider
    pub fn new(config: &LeaderboardConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://coinmarketcap.com"));
        headers.insert(REFERER, HeaderValue::from_static("https://coinmarketcap.com/"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(super::random_user_agent())
            .default_headers(headers)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            url: config.coinmarketcap_url.clone(),
            limit: config.listing_limit,
        })
    }

    fn query(&self) -> [(&'static str, String); 8] {
        [
            ("start", "1".to_string()),
            ("limit", self.limit.to_string()),
            ("sortBy", "market_cap".to_string()),
            ("sortType", "desc".to_string()),
            ("convert", "USD".to_string()),
            ("cryptoType", "all".to_string()),
            ("tagType", "all".to_string()),
            ("audited", "false".to_string()),
        ]
    }
}

/// Parses a listing body into raw records
///
/// Coins without a USD quote are skipped. Missing name or symbol is left for the
/// assembler to reject.
pub fn parse_listing(body: &str) -> Result<Vec<RawAssetRecord>, ProviderError> {
    let response: ListingResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::InvalidResponse(format!("Failed to parse CoinMarketCap listing: {}", e))
    })?;

    let coins = response
        .data
        .map(|d| d.crypto_currency_list)
        .unwrap_or_default();

    let records = coins
        .into_iter()
        .filter_map(|coin| {
            let quote = coin
                .quotes
                .iter()
                .find(|q| q.name.as_deref() == Some("USD"))
                .map(Quote::from)?;

            Some(RawAssetRecord {
                source_id: coin.id.map(|id| id.to_string()),
                name: coin.name,
                symbol: coin.symbol,
                quote: Some(quote),
                logo_url: coin
                    .id
                    .map(|id| format!("{}/{}.png", COINMARKETCAP_LOGO_URL, id)),
            })
        })
        .collect();

    Ok(records)
}

#[async_trait]
impl MarketDataProvider for CoinMarketCapProvider {
    async fn try_fetch(&self) -> Result<Vec<RawAssetRecord>, ProviderError> {
        tracing::debug!(url = %self.url, limit = self.limit, "Fetching CoinMarketCap listing");

        let response = self
            .client
            .get(&self.url)
            .query(&self.query())
            .send()
            .await
            .map_err(ProviderError::from_request)?;

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
        let records = parse_listing(&body)?;

        if records.is_empty() {
            return Err(ProviderError::EmptyPayload(self.provider_name()));
        }

        tracing::debug!(count = records.len(), "Fetched CoinMarketCap listing");
        Ok(records)
    }

    fn provider_name(&self) -> &'static str {
        "coinmarketcap"
    }
}
