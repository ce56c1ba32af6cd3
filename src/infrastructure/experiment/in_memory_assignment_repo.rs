//! In-memory implementation of the assignment repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::experiment::{AssignmentRepository, ParticipantAssignment};
use crate::domain::DomainError;

type AssignmentKey = (String, String);

/// In-memory assignment repository.
///
/// `get_or_insert` runs under a single write lock, so concurrent first
/// assignments of one participant all observe the same stored group.
#[derive(Debug, Default)]
pub struct InMemoryAssignmentRepository {
    assignments: RwLock<HashMap<AssignmentKey, ParticipantAssignment>>,
}

impl InMemoryAssignmentRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored assignments
    pub fn len(&self) -> usize {
        self.assignments.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn get(
        &self,
        experiment_name: &str,
        participant_id: &str,
    ) -> Result<Option<ParticipantAssignment>, DomainError> {
        let assignments = self
            .assignments
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(assignments
            .get(&(experiment_name.to_string(), participant_id.to_string()))
            .cloned())
    }

    async fn get_or_insert(
        &self,
        assignment: ParticipantAssignment,
    ) -> Result<ParticipantAssignment, DomainError> {
        let mut assignments = self
            .assignments
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        let key = (
            assignment.experiment_name.clone(),
            assignment.participant_id.clone(),
        );

        Ok(assignments.entry(key).or_insert(assignment).clone())
    }
}
