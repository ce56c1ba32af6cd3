//! Infrastructure layer for experiment A/B testing
//!
//! Provides the assignment engine, statistics helpers and in-memory
//! result stores.

mod assignment_engine;
mod consistent_hashing;
mod in_memory_assignment_repo;
mod in_memory_record_repo;
mod in_memory_repository;
mod statistical;

pub use assignment_engine::AssignmentEngine;
pub use consistent_hashing::ConsistentHasher;
pub use in_memory_assignment_repo::InMemoryAssignmentRepository;
pub use in_memory_record_repo::InMemoryParticipantRecordRepository;
pub use in_memory_repository::InMemoryExperimentRepository;
pub use statistical::{compare_latencies, mean, std_dev, variance, welch_t_test};
