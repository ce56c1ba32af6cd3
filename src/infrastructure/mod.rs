//! Infrastructure layer - Service and adapter implementations

pub mod experiment;
pub mod invocation;
pub mod logging;
pub mod observability;
pub mod services;
