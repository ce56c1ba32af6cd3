//! Experiment statistics projections
//!
//! Always recomputed from recorded outcomes; never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::ExperimentStatus;
use crate::domain::evaluation::AggregateMetrics;
use crate::domain::invocation::BackendId;

// ============================================================================
// GroupStatistics
// ============================================================================

/// Aggregated outcomes of one experiment group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistics {
    pub group_name: String,
    pub backend_id: BackendId,
    /// Distinct participants with at least one record in the group
    pub participant_count: u64,
    pub metrics: AggregateMetrics,
}

impl GroupStatistics {
    /// All-zero statistics for a group without records
    pub fn empty(group_name: impl Into<String>, backend_id: BackendId) -> Self {
        Self {
            group_name: group_name.into(),
            backend_id,
            participant_count: 0,
            metrics: AggregateMetrics::default(),
        }
    }

    /// Number of recorded outcomes
    pub fn record_count(&self) -> u64 {
        self.metrics.count
    }

    pub fn success_rate(&self) -> f64 {
        self.metrics.success_rate
    }

    pub fn mean_latency(&self) -> Option<f64> {
        self.metrics.mean_latency
    }
}

// ============================================================================
// LatencyComparison
// ============================================================================

/// Welch's t-test of a group's successful latencies against the baseline group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyComparison {
    pub baseline_group: String,
    pub group: String,
    pub p_value: f64,
    pub is_significant: bool,
    pub confidence_level: f64,
    pub baseline_mean: f64,
    pub group_mean: f64,
    /// Relative change from baseline to group, in percent
    pub relative_change: f64,
}

impl LatencyComparison {
    pub fn new(
        baseline_group: impl Into<String>,
        group: impl Into<String>,
        p_value: f64,
        confidence_level: f64,
        baseline_mean: f64,
        group_mean: f64,
    ) -> Self {
        let relative_change = if baseline_mean != 0.0 {
            (group_mean - baseline_mean) / baseline_mean * 100.0
        } else {
            0.0
        };

        Self {
            baseline_group: baseline_group.into(),
            group: group.into(),
            p_value,
            is_significant: p_value < (1.0 - confidence_level),
            confidence_level,
            baseline_mean,
            group_mean,
            relative_change,
        }
    }

    /// Lower latency is better
    pub fn group_is_faster(&self) -> bool {
        self.group_mean < self.baseline_mean
    }
}

// ============================================================================
// ExperimentStatistics
// ============================================================================

/// Per-group statistics of an experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentStatistics {
    pub experiment_name: String,
    pub status: ExperimentStatus,
    pub total_records: u64,
    /// One entry per defined group, in definition order
    pub groups: Vec<GroupStatistics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comparisons: Vec<LatencyComparison>,
    pub computed_at: DateTime<Utc>,
}

impl ExperimentStatistics {
    pub fn new(experiment_name: impl Into<String>, status: ExperimentStatus) -> Self {
        Self {
            experiment_name: experiment_name.into(),
            status,
            total_records: 0,
            groups: Vec::new(),
            comparisons: Vec::new(),
            computed_at: Utc::now(),
        }
    }

    /// Look up a group's statistics
    pub fn group(&self, name: &str) -> Option<&GroupStatistics> {
        self.groups.iter().find(|g| g.group_name == name)
    }

    /// Total distinct participants across groups
    pub fn total_participants(&self) -> u64 {
        self.groups.iter().map(|g| g.participant_count).sum()
    }

    /// Check if any comparison reached significance
    pub fn has_significant_result(&self) -> bool {
        self.comparisons.iter().any(|c| c.is_significant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_group() {
        let group = GroupStatistics::empty("A", BackendId::new("model-1"));
        assert_eq!(group.record_count(), 0);
        assert_eq!(group.participant_count, 0);
        assert_eq!(group.success_rate(), 0.0);
        assert!(group.mean_latency().is_none());
    }

    #[test]
    fn test_latency_comparison() {
        let cmp = LatencyComparison::new("A", "B", 0.01, 0.95, 2.0, 1.5);

        assert!(cmp.is_significant);
        assert!(cmp.group_is_faster());
        assert!((cmp.relative_change - (-25.0)).abs() < 1e-9);
    }

    #[test]
    fn test_not_significant() {
        let cmp = LatencyComparison::new("A", "B", 0.2, 0.95, 0.0, 1.0);
        assert!(!cmp.is_significant);
        assert_eq!(cmp.relative_change, 0.0);
    }

    #[test]
    fn test_group_lookup() {
        let mut stats = ExperimentStatistics::new("exp", ExperimentStatus::Active);
        stats.groups.push(GroupStatistics::empty("A", BackendId::new("m1")));
        stats.groups.push(GroupStatistics::empty("B", BackendId::new("m2")));

        assert!(stats.group("B").is_some());
        assert!(stats.group("C").is_none());
        assert_eq!(stats.total_participants(), 0);
        assert!(!stats.has_significant_result());
    }
}
