//! Experiment domain module for A/B testing
//!
//! Types and traits for partitioning participants into experiment groups,
//! each bound to one backend, and for recording and summarizing their
//! outcomes.

mod assignment;
mod entity;
mod error;
mod record;
mod repository;
mod statistics;
mod validation;

// Re-export all public types
pub use assignment::ParticipantAssignment;
pub use entity::{ExperimentDefinition, ExperimentStatus};
pub use error::ExperimentError;
pub use record::{ParticipantRecord, ParticipantRecordId};
pub use repository::{AssignmentRepository, ExperimentRepository, ParticipantRecordRepository};
pub use statistics::{ExperimentStatistics, GroupStatistics, LatencyComparison};
pub use validation::{validate_experiment_name, validate_group_name, ExperimentValidationError};

#[cfg(test)]
pub use repository::MockParticipantRecordRepository;
