//! PMP LLM Experiments
//!
//! Evaluation and experimentation core of the LLM gateway:
//! - Side-by-side comparison of backends on one input
//! - Deterministic, weighted assignment of participants to experiment groups
//! - Append-only recording of outcomes and per-group statistics
//! - Welch's t-test latency comparisons between groups

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::invocation::InvocationAdapter;
use infrastructure::{
    experiment::{
        InMemoryAssignmentRepository, InMemoryExperimentRepository,
        InMemoryParticipantRecordRepository,
    },
    services::{ExperimentLedger, ExperimentRegistry, ModelEvaluator},
};
use tracing::info;

/// Ledger wired to the in-memory result stores
pub type InMemoryExperimentLedger = ExperimentLedger<
    InMemoryExperimentRepository,
    InMemoryAssignmentRepository,
    InMemoryParticipantRecordRepository,
>;

/// Shared services of the experimentation core
#[derive(Debug, Clone)]
pub struct ExperimentCore {
    pub evaluator: Arc<ModelEvaluator>,
    pub registry: Arc<ExperimentRegistry<InMemoryExperimentRepository>>,
    pub ledger: Arc<InMemoryExperimentLedger>,
}

/// Create the core services over in-memory stores
pub fn create_experiment_core(
    config: &AppConfig,
    adapter: Arc<dyn InvocationAdapter>,
) -> ExperimentCore {
    let evaluator = Arc::new(ModelEvaluator::new(adapter, &config.evaluation));

    let registry = Arc::new(
        ExperimentRegistry::new(Arc::new(InMemoryExperimentRepository::new()))
            .with_known_backends(config.experiments.known_backends.iter().map(String::as_str)),
    );

    let ledger = Arc::new(
        ExperimentLedger::new(
            registry.clone(),
            Arc::new(InMemoryAssignmentRepository::new()),
            Arc::new(InMemoryParticipantRecordRepository::new()),
        )
        .with_confidence_level(config.experiments.confidence_level)
        .with_evaluator(evaluator.clone()),
    );

    info!(
        timeout_ms = config.evaluation.invocation_timeout_ms,
        known_backends = config.experiments.known_backends.len(),
        "Experiment core initialized"
    );

    ExperimentCore {
        evaluator,
        registry,
        ledger,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::experiment::{ExperimentDefinition, ExperimentError};
    use crate::domain::invocation::{InvocationInput, MockBehavior, MockInvocationAdapter};

    #[tokio::test]
    async fn test_core_end_to_end() {
        let adapter = MockInvocationAdapter::new()
            .with_backend("model-1", MockBehavior::succeed("one", 4))
            .with_backend("model-2", MockBehavior::succeed("two", 6));
        let core = create_experiment_core(&AppConfig::default(), Arc::new(adapter));

        core.registry
            .register(
                ExperimentDefinition::new("summary_quality")
                    .with_group("A", "model-1")
                    .with_group("B", "model-2"),
            )
            .await
            .unwrap();

        for participant in ["u1", "u2", "u3"] {
            core.ledger
                .participate("summary_quality", participant, &InvocationInput::text("doc"))
                .await
                .unwrap();
        }

        let stats = core.ledger.statistics("summary_quality").await.unwrap();
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.total_participants(), 3);
    }

    #[tokio::test]
    async fn test_core_enforces_known_backends() {
        let mut config = AppConfig::default();
        config.experiments.known_backends = vec!["model-1".to_string()];
        let core = create_experiment_core(&config, Arc::new(MockInvocationAdapter::new()));

        let result = core
            .registry
            .register(
                ExperimentDefinition::new("summary_quality")
                    .with_group("A", "model-1")
                    .with_group("B", "model-9"),
            )
            .await;

        assert!(matches!(result, Err(ExperimentError::InvalidExperiment(_))));
    }
}
