//! Weighted, deterministic group assignment

use super::consistent_hashing::ConsistentHasher;
use crate::domain::experiment::{ExperimentDefinition, ExperimentError, ExperimentValidationError};

/// Maps a participant into one of an experiment's groups.
///
/// The hash of (salt, experiment, participant) is scaled into
/// `[0, total_weight)` and resolved against the cumulative group weights in
/// definition order. Stateless; never touches storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentEngine;

impl AssignmentEngine {
    pub fn new() -> Self {
        Self
    }

    /// Assign a participant to a group, returning the group name
    pub fn assign<'a>(
        &self,
        experiment: &'a ExperimentDefinition,
        participant_id: &str,
    ) -> Result<&'a str, ExperimentError> {
        let groups = experiment.group_names();

        if groups.len() < 2 {
            return Err(ExperimentValidationError::InsufficientGroups(groups.len()).into());
        }

        experiment.validate_weights()?;

        let weights: Vec<f64> = groups
            .iter()
            .map(|g| experiment.weight_of(g).unwrap_or(1.0))
            .collect();
        let total_weight: f64 = weights.iter().sum();

        let hash = ConsistentHasher::hash_assignment(
            experiment.salt(),
            experiment.name(),
            participant_id,
        );
        let point = ConsistentHasher::unit_interval(hash) * total_weight;

        let mut cumulative = 0.0;

        for (group, weight) in groups.iter().zip(&weights) {
            cumulative += weight;

            if point < cumulative {
                return Ok(group.as_str());
            }
        }

        // Rounding can leave the point at exactly the total
        Ok(groups[groups.len() - 1].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn summary_quality() -> ExperimentDefinition {
        ExperimentDefinition::new("summary_quality")
            .with_group("A", "model-1")
            .with_group("B", "model-2")
    }

    fn count_groups(exp: &ExperimentDefinition, participants: usize) -> HashMap<String, usize> {
        let engine = AssignmentEngine::new();
        let mut counts = HashMap::new();

        for i in 1..=participants {
            let group = engine.assign(exp, &format!("u{}", i)).unwrap();
            *counts.entry(group.to_string()).or_insert(0) += 1;
        }

        counts
    }

    #[test]
    fn test_assignment_is_idempotent() {
        let engine = AssignmentEngine::new();
        let exp = summary_quality();

        let first = engine.assign(&exp, "u1").unwrap();
        let second = engine.assign(&exp, "u1").unwrap();

        assert_eq!(first, second);
        assert!(exp.group_names().iter().any(|g| g == first));
    }

    #[test]
    fn test_uniform_split_is_roughly_balanced() {
        let exp = summary_quality();
        let counts = count_groups(&exp, 100);

        let a = counts.get("A").copied().unwrap_or(0);
        let b = counts.get("B").copied().unwrap_or(0);

        assert_eq!(a + b, 100);
        assert!(a >= 20, "group A too small: {}", a);
        assert!(b >= 20, "group B too small: {}", b);
    }

    #[test]
    fn test_weighted_split() {
        let exp = summary_quality().with_weight("A", 9.0).with_weight("B", 1.0);
        let counts = count_groups(&exp, 2000);

        let a = counts.get("A").copied().unwrap_or(0);
        assert!(a > 1650 && a < 1950, "expected ~90% in A, got {}", a);
    }

    #[test]
    fn test_three_groups_all_used() {
        let exp = summary_quality().with_group("C", "model-3");
        let counts = count_groups(&exp, 300);

        assert_eq!(counts.len(), 3);
        for (group, count) in counts {
            assert!(count > 60, "group {} too small: {}", group, count);
        }
    }

    #[test]
    fn test_salt_reshuffles_assignment() {
        let engine = AssignmentEngine::new();
        let plain = summary_quality();
        let salted = summary_quality().with_salt("pepper");

        let moved = (1..=200)
            .filter(|i| {
                let p = format!("u{}", i);
                engine.assign(&plain, &p).unwrap() != engine.assign(&salted, &p).unwrap()
            })
            .count();

        assert!(moved > 0);
    }

    #[test]
    fn test_rejects_single_group() {
        let engine = AssignmentEngine::new();
        let exp = ExperimentDefinition::new("solo").with_group("A", "model-1");

        let err = engine.assign(&exp, "u1").unwrap_err();
        assert!(matches!(
            err,
            ExperimentError::InvalidExperiment(ExperimentValidationError::InsufficientGroups(1))
        ));
    }

    #[test]
    fn test_rejects_partial_weights() {
        let engine = AssignmentEngine::new();
        let exp = summary_quality().with_weight("A", 1.0);

        let err = engine.assign(&exp, "u1").unwrap_err();
        assert!(matches!(err, ExperimentError::InvalidExperiment(_)));
    }
}
