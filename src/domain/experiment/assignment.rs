//! Participant assignment types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::invocation::BackendId;

/// The group a participant belongs to within one experiment.
///
/// Stored once per (experiment, participant) and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantAssignment {
    pub experiment_name: String,
    pub participant_id: String,
    pub group_name: String,
    pub backend_id: BackendId,
    pub assigned_at: DateTime<Utc>,
}

impl ParticipantAssignment {
    /// Create an assignment stamped with the current time
    pub fn new(
        experiment_name: impl Into<String>,
        participant_id: impl Into<String>,
        group_name: impl Into<String>,
        backend_id: impl Into<BackendId>,
    ) -> Self {
        Self {
            experiment_name: experiment_name.into(),
            participant_id: participant_id.into(),
            group_name: group_name.into(),
            backend_id: backend_id.into(),
            assigned_at: Utc::now(),
        }
    }

    /// Storage key of the assignment
    pub fn key(&self) -> (&str, &str) {
        (&self.experiment_name, &self.participant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assignment() {
        let assignment = ParticipantAssignment::new("exp-1", "u1", "A", "model-1");

        assert_eq!(assignment.key(), ("exp-1", "u1"));
        assert_eq!(assignment.group_name, "A");
        assert_eq!(assignment.backend_id.as_str(), "model-1");
    }
}
