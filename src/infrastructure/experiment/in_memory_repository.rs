//! In-memory implementation of the experiment repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::experiment::{ExperimentDefinition, ExperimentRepository};
use crate::domain::DomainError;

/// In-memory experiment repository implementation
#[derive(Debug, Default)]
pub struct InMemoryExperimentRepository {
    experiments: RwLock<HashMap<String, ExperimentDefinition>>,
}

impl InMemoryExperimentRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExperimentRepository for InMemoryExperimentRepository {
    async fn create(
        &self,
        definition: ExperimentDefinition,
    ) -> Result<ExperimentDefinition, DomainError> {
        let mut experiments = self
            .experiments
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        if experiments.contains_key(definition.name()) {
            return Err(DomainError::conflict(format!(
                "Experiment '{}' already exists",
                definition.name()
            )));
        }

        experiments.insert(definition.name().to_string(), definition.clone());
        Ok(definition)
    }

    async fn get(&self, name: &str) -> Result<Option<ExperimentDefinition>, DomainError> {
        let experiments = self
            .experiments
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(experiments.get(name).cloned())
    }

    async fn close(&self, name: &str) -> Result<Option<ExperimentDefinition>, DomainError> {
        let mut experiments = self
            .experiments
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        Ok(experiments.get_mut(name).map(|definition| {
            definition.close();
            definition.clone()
        }))
    }

    async fn list(&self) -> Result<Vec<ExperimentDefinition>, DomainError> {
        let experiments = self
            .experiments
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        let mut results: Vec<_> = experiments.values().cloned().collect();
        results.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.name().cmp(b.name()))
        });

        Ok(results)
    }
}
