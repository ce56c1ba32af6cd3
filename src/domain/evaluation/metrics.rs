//! Metrics calculator
//!
//! The single definition of "success rate" and "mean latency" used by the
//! evaluator and the experiment ledger alike.

use serde::{Deserialize, Serialize};

use super::outcome::sanitize_latency;
use super::InvocationOutcome;

/// Normalized metrics for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Latency in seconds (0 when unknown)
    pub latency_seconds: f64,
    /// Tokens consumed (0 when unknown)
    pub tokens: u32,
    /// Whether the invocation succeeded
    pub success: bool,
    /// Token throughput, when latency is non-zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_per_second: Option<f64>,
}

/// Aggregated metrics over a set of outcomes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    /// Number of outcomes
    pub count: u64,
    /// Number of successful outcomes
    pub success_count: u64,
    /// Mean latency over successful outcomes only; `None` when none succeeded
    pub mean_latency: Option<f64>,
    /// success_count / count, 0.0 when count is 0
    pub success_rate: f64,
    /// Sum of tokens over all outcomes
    pub total_tokens: u64,
}

/// Derive metrics from a single outcome. Total; never fails.
pub fn derive(outcome: &InvocationOutcome) -> Metrics {
    let latency_seconds = sanitize_latency(outcome.latency_seconds());
    let tokens = outcome.token_count();

    let tokens_per_second = if latency_seconds > 0.0 && tokens > 0 {
        Some(tokens as f64 / latency_seconds)
    } else {
        None
    };

    Metrics {
        latency_seconds,
        tokens,
        success: outcome.succeeded(),
        tokens_per_second,
    }
}

/// Aggregate a sequence of outcomes
pub fn aggregate<'a, I>(outcomes: I) -> AggregateMetrics
where
    I: IntoIterator<Item = &'a InvocationOutcome>,
{
    let mut result = AggregateMetrics::default();
    let mut latency_sum = 0.0;

    for outcome in outcomes {
        let metrics = derive(outcome);
        result.count += 1;
        result.total_tokens += u64::from(metrics.tokens);

        if metrics.success {
            result.success_count += 1;
            latency_sum += metrics.latency_seconds;
        }
    }

    if result.count > 0 {
        result.success_rate = result.success_count as f64 / result.count as f64;
    }

    if result.success_count > 0 {
        result.mean_latency = Some(latency_sum / result.success_count as f64);
    }

    result
}
