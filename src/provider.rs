//! Provider abstraction for fetching market listings from external APIs

use crate::{error::ProviderError, types::RawAssetRecord};
use async_trait::async_trait;

/// Trait for market data providers
///
/// Implementations fetch a batch of raw asset records from one external
/// source (CoinMarketCap, CoinGecko, ...).
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the provider's current listing
    ///
    /// # Returns
    /// The raw records in the provider's own order, or an error if the provider
    /// is unavailable. An empty `Ok` is allowed; callers decide what it means.
    async fn try_fetch(&self) -> Result<Vec<RawAssetRecord>, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Scripted outcome of one `try_fetch` call
    #[derive(Clone)]
    pub enum MockResponse {
        Records(Vec<RawAssetRecord>),
        Unavailable,
        Hang,
    }

    /// Mock provider for testing
    ///
    /// Responses are consumed in order; the last one repeats once the script runs out.
    #[derive(Clone)]
    pub struct MockProvider {
        name: &'static str,
        responses: Arc<Mutex<VecDeque<MockResponse>>>,
        call_count: Arc<AtomicUsize>,
        delay: Option<Duration>,
    }

    impl MockProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                responses: Arc::new(Mutex::new(VecDeque::new())),
                call_count: Arc::new(AtomicUsize::new(0)),
                delay: None,
            }
        }

        pub fn returning(name: &'static str, records: Vec<RawAssetRecord>) -> Self {
            let provider = Self::new(name);
            provider.push(MockResponse::Records(records));
            provider
        }

        pub fn failing(name: &'static str) -> Self {
            let provider = Self::new(name);
            provider.push(MockResponse::Unavailable);
            provider
        }

        pub fn hanging(name: &'static str) -> Self {
            let provider = Self::new(name);
            provider.push(MockResponse::Hang);
            provider
        }

        /// Sleeps before answering, to widen race windows in concurrency tests
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn push(&self, response: MockResponse) {
            self.responses.lock().unwrap().push_back(response);
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        fn next_response(&self) -> MockResponse {
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                responses.pop_front().unwrap()
            } else {
                responses
                    .front()
                    .cloned()
                    .unwrap_or(MockResponse::Records(Vec::new()))
            }
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        async fn try_fetch(&self) -> Result<Vec<RawAssetRecord>, ProviderError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            match self.next_response() {
                MockResponse::Records(records) => Ok(records),
                MockResponse::Unavailable => {
                    Err(ProviderError::ApiError("HTTP 503: mock outage".to_string()))
                }
                MockResponse::Hang => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
