//! Experiment repository traits
//!
//! The result store capability the experiment core consumes. Records are
//! append-only and read back with a full scan per experiment.

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::assignment::ParticipantAssignment;
use super::entity::ExperimentDefinition;
use super::record::ParticipantRecord;
use crate::domain::DomainError;

// ============================================================================
// ExperimentRepository
// ============================================================================

/// Repository trait for experiment definitions
#[async_trait]
pub trait ExperimentRepository: Send + Sync + Debug {
    /// Store a new definition; fails with a conflict if the name is taken
    async fn create(
        &self,
        definition: ExperimentDefinition,
    ) -> Result<ExperimentDefinition, DomainError>;

    /// Get a definition by name
    async fn get(&self, name: &str) -> Result<Option<ExperimentDefinition>, DomainError>;

    /// Atomically move a definition to closed. Returns `None` if absent;
    /// closing a closed definition leaves it unchanged.
    async fn close(&self, name: &str) -> Result<Option<ExperimentDefinition>, DomainError>;

    /// List all definitions, oldest first
    async fn list(&self) -> Result<Vec<ExperimentDefinition>, DomainError>;
}

// ============================================================================
// AssignmentRepository
// ============================================================================

/// Repository trait for participant assignments
#[async_trait]
pub trait AssignmentRepository: Send + Sync + Debug {
    /// Get the stored assignment of a participant
    async fn get(
        &self,
        experiment_name: &str,
        participant_id: &str,
    ) -> Result<Option<ParticipantAssignment>, DomainError>;

    /// Store the assignment unless one already exists for the same
    /// (experiment, participant), in which case the existing one is
    /// returned. Must be atomic.
    async fn get_or_insert(
        &self,
        assignment: ParticipantAssignment,
    ) -> Result<ParticipantAssignment, DomainError>;
}

// ============================================================================
// ParticipantRecordRepository
// ============================================================================

/// Append-only repository trait for participant records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ParticipantRecordRepository: Send + Sync {
    /// Append a record
    async fn append(&self, record: ParticipantRecord) -> Result<(), DomainError>;

    /// Read every record of an experiment, in append order
    async fn scan(&self, experiment_name: &str) -> Result<Vec<ParticipantRecord>, DomainError>;

    /// Count the records of an experiment
    async fn count(&self, experiment_name: &str) -> Result<usize, DomainError> {
        Ok(self.scan(experiment_name).await?.len())
    }
}
