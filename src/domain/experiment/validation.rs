//! Experiment validation utilities

use thiserror::Error;

/// Maximum length for experiment names
pub const MAX_EXPERIMENT_NAME_LENGTH: usize = 64;

/// Maximum length for group names
pub const MAX_GROUP_NAME_LENGTH: usize = 50;

/// Minimum number of groups an experiment must define
pub const MIN_GROUPS: usize = 2;

/// Validation errors for experiment definitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExperimentValidationError {
    #[error("Experiment name cannot be empty")]
    EmptyName,

    #[error("Experiment name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Experiment name must start and end with a letter or number")]
    InvalidNameBoundary,

    #[error("Experiment name contains invalid character: '{0}'")]
    InvalidNameCharacter(char),

    #[error("Group name cannot be empty")]
    EmptyGroupName,

    #[error("Group name exceeds maximum length of {0} characters")]
    GroupNameTooLong(usize),

    #[error("Experiment must have at least 2 groups, got {0}")]
    InsufficientGroups(usize),

    #[error("Duplicate group name: '{0}'")]
    DuplicateGroup(String),

    #[error("Group '{0}' is not mapped to a backend")]
    MissingBackend(String),

    #[error("Group '{0}' is mapped to a blank backend id")]
    BlankBackend(String),

    #[error("Backend mapping references unknown group: '{0}'")]
    UnknownGroupInMapping(String),

    #[error("Backend '{0}' is not a known backend")]
    UnknownBackend(String),

    #[error("Weights do not cover group '{0}'")]
    MissingWeight(String),

    #[error("Weights reference unknown group: '{0}'")]
    UnknownGroupInWeights(String),

    #[error("Weight for group '{0}' must be a positive number, got {1}")]
    InvalidWeight(String, f64),
}

/// Validate an experiment name.
///
/// Names are ASCII alphanumerics joined by `-`, `_` or `.`.
pub fn validate_experiment_name(name: &str) -> Result<(), ExperimentValidationError> {
    if name.is_empty() {
        return Err(ExperimentValidationError::EmptyName);
    }

    if name.len() > MAX_EXPERIMENT_NAME_LENGTH {
        return Err(ExperimentValidationError::NameTooLong(
            MAX_EXPERIMENT_NAME_LENGTH,
        ));
    }

    let starts_ok = name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
    let ends_ok = name.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());

    if !starts_ok || !ends_ok {
        return Err(ExperimentValidationError::InvalidNameBoundary);
    }

    if let Some(ch) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(ExperimentValidationError::InvalidNameCharacter(ch));
    }

    Ok(())
}

/// Validate a group name
pub fn validate_group_name(name: &str) -> Result<(), ExperimentValidationError> {
    if name.trim().is_empty() {
        return Err(ExperimentValidationError::EmptyGroupName);
    }

    if name.len() > MAX_GROUP_NAME_LENGTH {
        return Err(ExperimentValidationError::GroupNameTooLong(
            MAX_GROUP_NAME_LENGTH,
        ));
    }

    Ok(())
}
