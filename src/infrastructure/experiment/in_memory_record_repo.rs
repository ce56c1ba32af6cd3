//! In-memory implementation of the participant record repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::experiment::{ParticipantRecord, ParticipantRecordRepository};
use crate::domain::DomainError;

/// Append-only, per-experiment in-memory record log.
///
/// Scans clone the experiment's log under a read lock and release it
/// before returning, so readers never hold up appends for long.
#[derive(Debug, Default)]
pub struct InMemoryParticipantRecordRepository {
    records: RwLock<HashMap<String, Vec<ParticipantRecord>>>,
}

impl InMemoryParticipantRecordRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParticipantRecordRepository for InMemoryParticipantRecordRepository {
    async fn append(&self, record: ParticipantRecord) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        records
            .entry(record.experiment_name().to_string())
            .or_default()
            .push(record);

        Ok(())
    }

    async fn scan(&self, experiment_name: &str) -> Result<Vec<ParticipantRecord>, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(records.get(experiment_name).cloned().unwrap_or_default())
    }

    async fn count(&self, experiment_name: &str) -> Result<usize, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(records.get(experiment_name).map_or(0, Vec::len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluation::InvocationOutcome;
    use crate::domain::experiment::ParticipantAssignment;

    fn record(experiment: &str, participant: &str, latency: f64) -> ParticipantRecord {
        let assignment = ParticipantAssignment::new(experiment, participant, "A", "model-1");
        ParticipantRecord::new(
            &assignment,
            InvocationOutcome::success("model-1", "ok", 10, latency),
        )
    }

    #[tokio::test]
    async fn test_append_and_scan_in_order() {
        let repo = InMemoryParticipantRecordRepository::new();

        for i in 1..=5 {
            repo.append(record("exp-1", "u1", i as f64)).await.unwrap();
        }

        let records = repo.scan("exp-1").await.unwrap();
        let latencies: Vec<f64> = records
            .iter()
            .map(|r| r.outcome().latency_seconds())
            .collect();

        assert_eq!(latencies, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[tokio::test]
    async fn test_scan_is_per_experiment() {
        let repo = InMemoryParticipantRecordRepository::new();

        repo.append(record("exp-1", "u1", 1.0)).await.unwrap();
        repo.append(record("exp-2", "u1", 1.0)).await.unwrap();
        repo.append(record("exp-2", "u2", 1.0)).await.unwrap();

        assert_eq!(repo.count("exp-1").await.unwrap(), 1);
        assert_eq!(repo.count("exp-2").await.unwrap(), 2);
        assert!(repo.scan("exp-3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scan_is_a_snapshot() {
        let repo = InMemoryParticipantRecordRepository::new();
        repo.append(record("exp-1", "u1", 1.0)).await.unwrap();

        let snapshot = repo.scan("exp-1").await.unwrap();
        repo.append(record("exp-1", "u2", 2.0)).await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(repo.count("exp-1").await.unwrap(), 2);
    }
}
