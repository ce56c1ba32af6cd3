//! Experiment registry
//!
//! Holds the experiment definitions. Registration is validated and
//! conflict-checked atomically by the repository; definitions never change
//! after registration except for closing.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::experiment::{
    ExperimentDefinition, ExperimentError, ExperimentRepository, ExperimentValidationError,
};
use crate::domain::invocation::BackendId;
use crate::domain::DomainError;

/// Registry of experiment definitions
#[derive(Debug)]
pub struct ExperimentRegistry<R: ExperimentRepository> {
    repository: Arc<R>,
    known_backends: Option<HashSet<BackendId>>,
}

impl<R: ExperimentRepository> ExperimentRegistry<R> {
    /// Create a registry accepting any backend identifier
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            known_backends: None,
        }
    }

    /// Restrict registration to experiments referencing these backends only.
    /// An empty list leaves registration unrestricted.
    pub fn with_known_backends<I, B>(mut self, backends: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<BackendId>,
    {
        let backends: HashSet<BackendId> = backends.into_iter().map(Into::into).collect();
        self.known_backends = (!backends.is_empty()).then_some(backends);
        self
    }

    /// Register a new experiment
    pub async fn register(
        &self,
        definition: ExperimentDefinition,
    ) -> Result<ExperimentDefinition, ExperimentError> {
        debug!(experiment = %definition.name(), "Registering experiment");

        definition.validate()?;
        self.check_backends(&definition)?;

        let name = definition.name().to_string();
        let created = self
            .repository
            .create(definition)
            .await
            .map_err(|e| match e {
                DomainError::Conflict { .. } => ExperimentError::duplicate(&name),
                other => other.into(),
            })?;

        info!(
            experiment = %name,
            groups = created.group_names().len(),
            "Experiment registered"
        );

        Ok(created)
    }

    /// Get an experiment by name
    pub async fn get(&self, name: &str) -> Result<ExperimentDefinition, ExperimentError> {
        self.repository
            .get(name)
            .await?
            .ok_or_else(|| ExperimentError::unknown(name))
    }

    /// Close an experiment. Closing an already closed experiment is a no-op.
    pub async fn close(&self, name: &str) -> Result<ExperimentDefinition, ExperimentError> {
        debug!(experiment = %name, "Closing experiment");

        let closed = self
            .repository
            .close(name)
            .await?
            .ok_or_else(|| ExperimentError::unknown(name))?;

        info!(experiment = %name, "Experiment closed");

        Ok(closed)
    }

    /// List every registered experiment, oldest first
    pub async fn list(&self) -> Result<Vec<ExperimentDefinition>, ExperimentError> {
        Ok(self.repository.list().await?)
    }

    fn check_backends(&self, definition: &ExperimentDefinition) -> Result<(), ExperimentError> {
        let Some(known) = &self.known_backends else {
            return Ok(());
        };

        if let Some(unknown) = definition
            .referenced_backends()
            .into_iter()
            .find(|b| !known.contains(*b))
        {
            return Err(ExperimentValidationError::UnknownBackend(unknown.to_string()).into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::experiment::ExperimentStatus;
    use crate::infrastructure::experiment::InMemoryExperimentRepository;

    fn create_registry() -> ExperimentRegistry<InMemoryExperimentRepository> {
        ExperimentRegistry::new(Arc::new(InMemoryExperimentRepository::new()))
    }

    fn summary_quality() -> ExperimentDefinition {
        ExperimentDefinition::new("summary_quality")
            .with_group("A", "model-1")
            .with_group("B", "model-2")
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let registry = create_registry();

        let created = registry.register(summary_quality()).await.unwrap();
        assert_eq!(created.status(), ExperimentStatus::Active);

        let fetched = registry.get("summary_quality").await.unwrap();
        assert_eq!(fetched.backend_for("A").unwrap().as_str(), "model-1");
    }

    #[tokio::test]
    async fn test_register_duplicate_keeps_original() {
        let registry = create_registry();
        registry.register(summary_quality()).await.unwrap();

        let other = ExperimentDefinition::new("summary_quality")
            .with_group("X", "model-8")
            .with_group("Y", "model-9");
        let result = registry.register(other).await;

        assert!(matches!(
            result,
            Err(ExperimentError::DuplicateExperiment(name)) if name == "summary_quality"
        ));

        let stored = registry.get("summary_quality").await.unwrap();
        assert_eq!(stored.group_names(), &["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn test_register_invalid() {
        let registry = create_registry();

        let result = registry
            .register(ExperimentDefinition::new("solo").with_group("A", "model-1"))
            .await;

        assert!(matches!(
            result,
            Err(ExperimentError::InvalidExperiment(
                ExperimentValidationError::InsufficientGroups(1)
            ))
        ));
        assert!(registry.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_unknown_backend() {
        let registry = create_registry().with_known_backends(["model-1"]);

        let result = registry.register(summary_quality()).await;

        assert!(matches!(
            result,
            Err(ExperimentError::InvalidExperiment(
                ExperimentValidationError::UnknownBackend(b)
            )) if b == "model-2"
        ));
    }

    #[tokio::test]
    async fn test_empty_known_backends_is_unrestricted() {
        let registry = create_registry().with_known_backends(Vec::<String>::new());
        assert!(registry.register(summary_quality()).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_registration_has_one_winner() {
        let registry = Arc::new(create_registry());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry
                        .register(
                            ExperimentDefinition::new("race")
                                .with_group("A", format!("model-{}", i))
                                .with_group("B", "model-x"),
                        )
                        .await
                })
            })
            .collect();

        let mut winners = 0;
        let mut duplicates = 0;

        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(ExperimentError::DuplicateExperiment(_)) => duplicates += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(duplicates, 7);
    }

    #[tokio::test]
    async fn test_get_unknown() {
        let registry = create_registry();
        let result = registry.get("nope").await;
        assert!(matches!(result, Err(ExperimentError::UnknownExperiment(n)) if n == "nope"));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let registry = create_registry();
        registry.register(summary_quality()).await.unwrap();

        let first = registry.close("summary_quality").await.unwrap();
        assert_eq!(first.status(), ExperimentStatus::Closed);

        let second = registry.close("summary_quality").await.unwrap();
        assert_eq!(second.status(), ExperimentStatus::Closed);
        assert_eq!(second.closed_at(), first.closed_at());
    }

    #[tokio::test]
    async fn test_close_unknown() {
        let registry = create_registry();
        assert!(matches!(
            registry.close("nope").await,
            Err(ExperimentError::UnknownExperiment(_))
        ));
    }

    #[tokio::test]
    async fn test_list_oldest_first() {
        let registry = create_registry();
        registry.register(summary_quality()).await.unwrap();
        registry
            .register(
                ExperimentDefinition::new("tone")
                    .with_group("A", "model-1")
                    .with_group("B", "model-3"),
            )
            .await
            .unwrap();

        let names: Vec<String> = registry
            .list()
            .await
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();

        assert_eq!(names, vec!["summary_quality", "tone"]);
    }
}
