//! Domain layer - Core business logic and entities

pub mod error;
pub mod evaluation;
pub mod experiment;
pub mod invocation;

pub use error::DomainError;
