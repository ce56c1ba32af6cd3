//! Participant record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assignment::ParticipantAssignment;
use crate::domain::evaluation::InvocationOutcome;
use crate::domain::invocation::BackendId;

/// Unique identifier for a participant record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantRecordId(String);

impl ParticipantRecordId {
    /// Create a record ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique ID
    pub fn generate() -> Self {
        Self(format!("prec-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantRecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ParticipantRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded participation in an experiment. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    id: ParticipantRecordId,
    experiment_name: String,
    participant_id: String,
    group_name: String,
    backend_id: BackendId,
    outcome: InvocationOutcome,
    recorded_at: DateTime<Utc>,
}

impl ParticipantRecord {
    /// Create a record for an assigned participant
    pub fn new(assignment: &ParticipantAssignment, outcome: InvocationOutcome) -> Self {
        Self {
            id: ParticipantRecordId::generate(),
            experiment_name: assignment.experiment_name.clone(),
            participant_id: assignment.participant_id.clone(),
            group_name: assignment.group_name.clone(),
            backend_id: assignment.backend_id.clone(),
            outcome,
            recorded_at: Utc::now(),
        }
    }

    /// Override the record timestamp
    pub fn with_recorded_at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = recorded_at;
        self
    }

    pub fn id(&self) -> &ParticipantRecordId {
        &self.id
    }

    pub fn experiment_name(&self) -> &str {
        &self.experiment_name
    }

    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn backend_id(&self) -> &BackendId {
        &self.backend_id
    }

    pub fn outcome(&self) -> &InvocationOutcome {
        &self.outcome
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
