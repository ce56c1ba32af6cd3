//! Experiment error types

use thiserror::Error;

use super::validation::ExperimentValidationError;
use crate::domain::DomainError;

/// Structural errors raised by experiment operations.
///
/// Invocation failures never appear here; they are recorded as failed
/// outcomes instead.
#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("Unknown experiment: {0}")]
    UnknownExperiment(String),

    #[error("Experiment already exists: {0}")]
    DuplicateExperiment(String),

    #[error("Experiment is closed: {0}")]
    ExperimentClosed(String),

    #[error("Invalid experiment: {0}")]
    InvalidExperiment(#[from] ExperimentValidationError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ExperimentError {
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownExperiment(name.into())
    }

    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateExperiment(name.into())
    }

    pub fn closed(name: impl Into<String>) -> Self {
        Self::ExperimentClosed(name.into())
    }

    /// HTTP status the request layer answers with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownExperiment(_) => 404,
            Self::DuplicateExperiment(_) | Self::ExperimentClosed(_) => 409,
            Self::InvalidExperiment(_) => 422,
            Self::Domain(_) => 500,
        }
    }
}
