//! Experiment ledger
//!
//! Owns participant assignments and records. Assignments are resolved once
//! per (experiment, participant) and reused afterwards; records are
//! append-only and statistics are recomputed from them on every read.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::evaluation::{aggregate, InvocationOutcome};
use crate::domain::experiment::{
    AssignmentRepository, ExperimentDefinition, ExperimentError, ExperimentRepository,
    ExperimentStatistics, ExperimentValidationError, GroupStatistics, LatencyComparison,
    ParticipantAssignment, ParticipantRecord, ParticipantRecordRepository,
};
use crate::domain::invocation::InvocationInput;
use crate::domain::DomainError;
use crate::infrastructure::experiment::{compare_latencies, AssignmentEngine};
use crate::infrastructure::observability::{record_assignment, record_participation};

use super::experiment_registry::ExperimentRegistry;
use super::model_evaluator::ModelEvaluator;

const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Ledger of experiment participation
#[derive(Debug)]
pub struct ExperimentLedger<R, A, RR>
where
    R: ExperimentRepository,
    A: AssignmentRepository,
    RR: ParticipantRecordRepository,
{
    registry: Arc<ExperimentRegistry<R>>,
    assignments: Arc<A>,
    records: Arc<RR>,
    engine: AssignmentEngine,
    confidence_level: f64,
    evaluator: Option<Arc<ModelEvaluator>>,
}

impl<R, A, RR> ExperimentLedger<R, A, RR>
where
    R: ExperimentRepository,
    A: AssignmentRepository,
    RR: ParticipantRecordRepository,
{
    /// Create a new ledger
    pub fn new(registry: Arc<ExperimentRegistry<R>>, assignments: Arc<A>, records: Arc<RR>) -> Self {
        Self {
            registry,
            assignments,
            records,
            engine: AssignmentEngine::new(),
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            evaluator: None,
        }
    }

    /// Confidence level of the latency significance tests
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Evaluator used by [`participate`](Self::participate)
    pub fn with_evaluator(mut self, evaluator: Arc<ModelEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn registry(&self) -> &Arc<ExperimentRegistry<R>> {
        &self.registry
    }

    // ========================================================================
    // Assignment
    // ========================================================================

    /// Resolve the participant's group, assigning one on first contact.
    ///
    /// A closed experiment still answers for participants assigned before
    /// it was closed.
    pub async fn assign(
        &self,
        experiment_name: &str,
        participant_id: &str,
    ) -> Result<ParticipantAssignment, ExperimentError> {
        let definition = self.registry.get(experiment_name).await?;
        self.resolve_assignment(&definition, participant_id).await
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Append an outcome for a participant of an active experiment
    pub async fn record(
        &self,
        experiment_name: &str,
        participant_id: &str,
        outcome: InvocationOutcome,
    ) -> Result<ParticipantRecord, ExperimentError> {
        let definition = self.registry.get(experiment_name).await?;

        if !definition.is_active() {
            return Err(ExperimentError::closed(experiment_name));
        }

        let assignment = self.resolve_assignment(&definition, participant_id).await?;
        self.append_for(&definition, &assignment, outcome).await
    }

    /// Assign the participant, run the group's backend and record the outcome
    pub async fn participate(
        &self,
        experiment_name: &str,
        participant_id: &str,
        input: &InvocationInput,
    ) -> Result<ParticipantRecord, ExperimentError> {
        let evaluator = self
            .evaluator
            .as_ref()
            .ok_or_else(|| DomainError::configuration("No model evaluator configured"))?;

        let definition = self.registry.get(experiment_name).await?;

        if !definition.is_active() {
            return Err(ExperimentError::closed(experiment_name));
        }

        let assignment = self.resolve_assignment(&definition, participant_id).await?;
        let outcome = evaluator
            .evaluate_single(&assignment.backend_id, input)
            .await;

        self.append_for(&definition, &assignment, outcome).await
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Every record of an experiment, in append order
    pub async fn records(
        &self,
        experiment_name: &str,
    ) -> Result<Vec<ParticipantRecord>, ExperimentError> {
        self.registry.get(experiment_name).await?;
        Ok(self.records.scan(experiment_name).await?)
    }

    /// Aggregate statistics per group, recomputed from the records
    pub async fn statistics(
        &self,
        experiment_name: &str,
    ) -> Result<ExperimentStatistics, ExperimentError> {
        debug!(experiment = %experiment_name, "Computing experiment statistics");

        let definition = self.registry.get(experiment_name).await?;
        let records = self.records.scan(experiment_name).await?;

        let mut by_group: HashMap<&str, Vec<&ParticipantRecord>> = HashMap::new();

        for record in &records {
            by_group.entry(record.group_name()).or_default().push(record);
        }

        let mut statistics = ExperimentStatistics::new(definition.name(), definition.status());
        statistics.total_records = records.len() as u64;

        for group in definition.group_names() {
            let Some(backend_id) = definition.backend_for(group) else {
                continue;
            };

            let group_stats = match by_group.get(group.as_str()) {
                Some(group_records) => {
                    let participants: HashSet<&str> = group_records
                        .iter()
                        .map(|r| r.participant_id())
                        .collect();

                    GroupStatistics {
                        group_name: group.clone(),
                        backend_id: backend_id.clone(),
                        participant_count: participants.len() as u64,
                        metrics: aggregate(group_records.iter().map(|r| r.outcome())),
                    }
                }
                None => GroupStatistics::empty(group.clone(), backend_id.clone()),
            };

            statistics.groups.push(group_stats);
        }

        statistics.comparisons = self.compare_groups(&definition, &by_group);

        Ok(statistics)
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    async fn resolve_assignment(
        &self,
        definition: &ExperimentDefinition,
        participant_id: &str,
    ) -> Result<ParticipantAssignment, ExperimentError> {
        let name = definition.name();

        if let Some(existing) = self.assignments.get(name, participant_id).await? {
            record_assignment(name, &existing.group_name, false);
            return Ok(existing);
        }

        if !definition.is_active() {
            return Err(ExperimentError::closed(name));
        }

        let group = self.engine.assign(definition, participant_id)?;
        let backend_id = definition
            .backend_for(group)
            .cloned()
            .ok_or_else(|| ExperimentValidationError::MissingBackend(group.to_string()))?;

        let stored = self
            .assignments
            .get_or_insert(ParticipantAssignment::new(
                name,
                participant_id,
                group,
                backend_id,
            ))
            .await?;

        record_assignment(name, &stored.group_name, true);
        info!(
            experiment = %name,
            participant_id = %participant_id,
            group = %stored.group_name,
            backend_id = %stored.backend_id,
            "Participant assigned"
        );

        Ok(stored)
    }

    async fn append_for(
        &self,
        definition: &ExperimentDefinition,
        assignment: &ParticipantAssignment,
        outcome: InvocationOutcome,
    ) -> Result<ParticipantRecord, ExperimentError> {
        let record = ParticipantRecord::new(assignment, outcome);

        self.records.append(record.clone()).await?;

        record_participation(
            definition.name(),
            record.group_name(),
            record.outcome().succeeded(),
        );
        debug!(
            experiment = %definition.name(),
            participant_id = %record.participant_id(),
            group = %record.group_name(),
            success = record.outcome().succeeded(),
            "Recorded participant outcome"
        );

        Ok(record)
    }

    /// Welch's t-test of every group's successful latencies against the first
    fn compare_groups(
        &self,
        definition: &ExperimentDefinition,
        by_group: &HashMap<&str, Vec<&ParticipantRecord>>,
    ) -> Vec<LatencyComparison> {
        let successful_latencies = |group: &str| -> Vec<f64> {
            by_group
                .get(group)
                .map(|records| {
                    records
                        .iter()
                        .filter(|r| r.outcome().succeeded())
                        .map(|r| r.outcome().latency_seconds())
                        .collect()
                })
                .unwrap_or_default()
        };

        let Some((baseline, others)) = definition.group_names().split_first() else {
            return Vec::new();
        };
        let baseline_samples = successful_latencies(baseline.as_str());

        others
            .iter()
            .filter_map(|group| {
                compare_latencies(
                    &baseline_samples,
                    &successful_latencies(group.as_str()),
                    baseline,
                    group,
                    self.confidence_level,
                )
            })
            .collect()
    }
}
