//! Experiment domain entities

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::validation::{
    validate_experiment_name, validate_group_name, ExperimentValidationError, MIN_GROUPS,
};
use crate::domain::invocation::BackendId;

// ============================================================================
// ExperimentStatus
// ============================================================================

/// Status of an experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentStatus {
    /// Accepting new participants and records
    #[default]
    Active,
    /// Terminal; readable but accepts no new records
    Closed,
}

impl ExperimentStatus {
    /// Check if the experiment accepts new records
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for ExperimentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

// ============================================================================
// ExperimentDefinition
// ============================================================================

/// A named partition of participants into groups, each bound to one backend.
///
/// Immutable once registered, except for its status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDefinition {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    group_names: Vec<String>,
    group_to_backend: BTreeMap<String, BackendId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weights: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    salt: Option<String>,
    status: ExperimentStatus,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    closed_at: Option<DateTime<Utc>>,
}

impl ExperimentDefinition {
    /// Create a new, empty, active experiment definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            group_names: Vec::new(),
            group_to_backend: BTreeMap::new(),
            weights: None,
            salt: None,
            status: ExperimentStatus::Active,
            created_at: Utc::now(),
            closed_at: None,
        }
    }

    // Builder methods

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a group bound to a backend
    pub fn with_group(mut self, group: impl Into<String>, backend: impl Into<BackendId>) -> Self {
        let group = group.into();
        self.group_to_backend.insert(group.clone(), backend.into());
        self.push_group_name(group);
        self
    }

    /// Add a group name without binding it to a backend
    pub fn with_group_name(mut self, group: impl Into<String>) -> Self {
        self.push_group_name(group.into());
        self
    }

    /// Bind a backend to a group without declaring the group
    pub fn with_backend_mapping(
        mut self,
        group: impl Into<String>,
        backend: impl Into<BackendId>,
    ) -> Self {
        self.group_to_backend.insert(group.into(), backend.into());
        self
    }

    /// Set the assignment weight of a group. Without any weights, groups
    /// split evenly.
    pub fn with_weight(mut self, group: impl Into<String>, weight: f64) -> Self {
        self.weights
            .get_or_insert_with(BTreeMap::new)
            .insert(group.into(), weight);
        self
    }

    /// Set a fixed assignment salt
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Generate a random assignment salt, fixed for the experiment's life
    pub fn with_random_salt(self) -> Self {
        let salt: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        self.with_salt(salt)
    }

    // Getters

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Group names in definition order
    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    pub fn group_to_backend(&self) -> &BTreeMap<String, BackendId> {
        &self.group_to_backend
    }

    pub fn weights(&self) -> Option<&BTreeMap<String, f64>> {
        self.weights.as_ref()
    }

    pub fn salt(&self) -> Option<&str> {
        self.salt.as_deref()
    }

    pub fn status(&self) -> ExperimentStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Backend bound to a group
    pub fn backend_for(&self, group: &str) -> Option<&BackendId> {
        self.group_to_backend.get(group)
    }

    /// Weight of a group; 1.0 for every group when no weights are configured
    pub fn weight_of(&self, group: &str) -> Option<f64> {
        match &self.weights {
            Some(weights) => weights.get(group).copied(),
            None => self.group_names.iter().any(|g| g == group).then_some(1.0),
        }
    }

    /// Distinct backends referenced by the experiment
    pub fn referenced_backends(&self) -> Vec<&BackendId> {
        let mut seen = HashSet::new();
        self.group_to_backend
            .values()
            .filter(|b| seen.insert(b.as_str()))
            .collect()
    }

    // Status transitions

    /// Close the experiment. Returns false if it was already closed.
    pub fn close(&mut self) -> bool {
        if !self.status.is_active() {
            return false;
        }

        self.status = ExperimentStatus::Closed;
        self.closed_at = Some(Utc::now());
        true
    }

    // Validation

    /// Check the definition is well formed: valid name, at least two groups,
    /// a total group → backend mapping, and weights (if any) covering every
    /// group with positive values.
    pub fn validate(&self) -> Result<(), ExperimentValidationError> {
        validate_experiment_name(&self.name)?;
        self.validate_groups()?;
        self.validate_weights()
    }

    /// Group and weight checks only; what the assignment engine relies on
    pub fn validate_groups(&self) -> Result<(), ExperimentValidationError> {
        if self.group_names.len() < MIN_GROUPS {
            return Err(ExperimentValidationError::InsufficientGroups(
                self.group_names.len(),
            ));
        }

        let mut seen = HashSet::new();

        for group in &self.group_names {
            validate_group_name(group)?;

            if !seen.insert(group.as_str()) {
                return Err(ExperimentValidationError::DuplicateGroup(group.clone()));
            }

            match self.group_to_backend.get(group) {
                None => return Err(ExperimentValidationError::MissingBackend(group.clone())),
                Some(backend) if backend.is_blank() => {
                    return Err(ExperimentValidationError::BlankBackend(group.clone()));
                }
                Some(_) => {}
            }
        }

        if let Some(extra) = self
            .group_to_backend
            .keys()
            .find(|g| !self.group_names.contains(g))
        {
            return Err(ExperimentValidationError::UnknownGroupInMapping(
                extra.clone(),
            ));
        }

        Ok(())
    }

    /// Weight checks
    pub fn validate_weights(&self) -> Result<(), ExperimentValidationError> {
        let Some(weights) = &self.weights else {
            return Ok(());
        };

        for group in &self.group_names {
            match weights.get(group) {
                None => return Err(ExperimentValidationError::MissingWeight(group.clone())),
                Some(w) if !w.is_finite() || *w <= 0.0 => {
                    return Err(ExperimentValidationError::InvalidWeight(group.clone(), *w));
                }
                Some(_) => {}
            }
        }

        if let Some(extra) = weights.keys().find(|g| !self.group_names.contains(g)) {
            return Err(ExperimentValidationError::UnknownGroupInWeights(
                extra.clone(),
            ));
        }

        Ok(())
    }

    // Private helpers

    fn push_group_name(&mut self, group: String) {
        if !self.group_names.contains(&group) {
            self.group_names.push(group);
        }
    }
}
