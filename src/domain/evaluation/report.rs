//! Comparison report produced by running one input against several backends

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metrics::{aggregate, derive, AggregateMetrics, Metrics};
use super::InvocationOutcome;
use crate::domain::invocation::BackendId;

/// One backend's entry in a comparison report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub backend_id: BackendId,
    pub outcome: InvocationOutcome,
    pub metrics: Metrics,
    /// Score from the caller-supplied scorer, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl ComparisonEntry {
    /// Build an entry from an outcome, deriving its metrics
    pub fn new(outcome: InvocationOutcome) -> Self {
        Self {
            backend_id: outcome.backend_id().clone(),
            metrics: derive(&outcome),
            outcome,
            score: None,
        }
    }

    /// Attach a score
    pub fn with_score(mut self, score: Option<f64>) -> Self {
        self.score = score;
        self
    }
}

/// Side-by-side outcomes of several backends for one input.
///
/// Entries are in the order the backends were requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub input_reference: String,
    pub entries: Vec<ComparisonEntry>,
    pub generated_at: DateTime<Utc>,
}

impl ComparisonReport {
    /// Create a report stamped with the current time
    pub fn new(input_reference: impl Into<String>, entries: Vec<ComparisonEntry>) -> Self {
        Self {
            input_reference: input_reference.into(),
            entries,
            generated_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Backend ids in report order
    pub fn backend_ids(&self) -> Vec<&BackendId> {
        self.entries.iter().map(|e| &e.backend_id).collect()
    }

    /// Aggregate metrics across every entry
    pub fn summary(&self) -> AggregateMetrics {
        aggregate(self.entries.iter().map(|e| &e.outcome))
    }

    /// Fastest successful entry
    pub fn fastest(&self) -> Option<&ComparisonEntry> {
        self.entries
            .iter()
            .filter(|e| e.outcome.succeeded())
            .min_by(|a, b| {
                a.metrics
                    .latency_seconds
                    .partial_cmp(&b.metrics.latency_seconds)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Highest scored successful entry
    pub fn best_scored(&self) -> Option<&ComparisonEntry> {
        self.entries
            .iter()
            .filter(|e| e.outcome.succeeded() && e.score.is_some())
            .max_by(|a, b| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}
