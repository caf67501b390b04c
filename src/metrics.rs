//! Provider health metrics collection and reporting
//!
//! Tracks latency percentiles, success rates and the last failure of each
//! provider in the chain.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples to keep for metrics calculation
const MAX_SAMPLES: usize = 100;

/// Metrics for a single provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderMetrics {
    /// Name of the provider
    pub provider_name: String,
    /// 50th percentile latency of successful attempts in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency of successful attempts in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of attempts tracked
    pub total_requests: u64,
    /// Number of failed attempts
    pub failed_requests: u64,
    /// Most recent failure, if the provider has ever failed
    pub last_error: Option<String>,
    /// When the provider last returned usable data
    pub last_success_at: Option<DateTime<Utc>>,
}

impl ProviderMetrics {
    /// Creates metrics with no data
    pub fn empty(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_requests: 0,
            failed_requests: 0,
            last_error: None,
            last_success_at: None,
        }
    }
}

#[derive(Debug, Clone)]
struct LatencySample {
    duration_ms: f64,
    success: bool,
}

#[derive(Debug, Default)]
struct MetricsState {
    samples: VecDeque<LatencySample>,
    total_requests: u64,
    failed_requests: u64,
    last_error: Option<String>,
    last_success_at: Option<DateTime<Utc>>,
}

/// Collects and computes metrics for one provider
pub struct MetricsCollector {
    provider_name: String,
    state: RwLock<MetricsState>,
}

impl MetricsCollector {
    /// Creates a new metrics collector for a provider
    pub fn new(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            state: RwLock::new(MetricsState {
                samples: VecDeque::with_capacity(MAX_SAMPLES),
                ..Default::default()
            }),
        }
    }

    /// Records a successful attempt
    pub async fn record_success(&self, duration: Duration) {
        let mut state = self.state.write().await;
        state.last_success_at = Some(Utc::now());
        Self::push_sample(&mut state, duration, true);
    }

    /// Records a failed attempt and remembers why it failed
    pub async fn record_failure(&self, duration: Duration, reason: impl Into<String>) {
        let mut state = self.state.write().await;
        state.failed_requests += 1;
        state.last_error = Some(reason.into());
        Self::push_sample(&mut state, duration, false);
    }

    fn push_sample(state: &mut MetricsState, duration: Duration, success: bool) {
        state.total_requests += 1;
        if state.samples.len() >= MAX_SAMPLES {
            state.samples.pop_front();
        }
        state.samples.push_back(LatencySample {
            duration_ms: duration.as_secs_f64() * 1000.0,
            success,
        });
    }

    /// Computes current metrics from collected samples
    pub async fn get_metrics(&self) -> ProviderMetrics {
        let state = self.state.read().await;

        if state.total_requests == 0 {
            return ProviderMetrics::empty(&self.provider_name);
        }

        let mut latencies: Vec<f64> = state
            .samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.duration_ms)
            .collect();
        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let total = state.total_requests;
        let failed = state.failed_requests;

        ProviderMetrics {
            provider_name: self.provider_name.clone(),
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate: (total - failed) as f64 / total as f64,
            total_requests: total,
            failed_requests: failed,
            last_error: state.last_error.clone(),
            last_success_at: state.last_success_at,
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_collector() {
        let collector = MetricsCollector::new("test");

        collector.record_success(Duration::from_millis(100)).await;
        collector.record_success(Duration::from_millis(200)).await;
        collector
            .record_failure(Duration::from_millis(150), "Request timeout")
            .await;

        let metrics = collector.get_metrics().await;

        assert_eq!(metrics.provider_name, "test");
        assert_eq!(metrics.total_requests, 3);
        assert_eq!(metrics.failed_requests, 1);
        assert!(metrics.success_rate > 0.6 && metrics.success_rate < 0.7);
        assert_eq!(metrics.last_error.as_deref(), Some("Request timeout"));
        assert!(metrics.last_success_at.is_some());
    }

    #[tokio::test]
    async fn test_empty_metrics() {
        let metrics = MetricsCollector::new("idle").get_metrics().await;
        assert_eq!(metrics.total_requests, 0);
        assert_eq!(metrics.success_rate, 1.0);
        assert!(metrics.last_error.is_none());
    }

    #[test]
    fn test_percentile() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        assert_eq!(percentile(&values, 50.0), 5.0);
        assert_eq!(percentile(&values, 99.0), 9.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }
}
