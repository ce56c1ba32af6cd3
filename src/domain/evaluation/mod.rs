//! Evaluation domain module
//!
//! Outcomes of single backend invocations, the metrics derived from them,
//! and the report produced when several backends are compared on one input.

pub mod metrics;
mod outcome;
mod report;
mod scorer;

pub use metrics::{aggregate, derive, AggregateMetrics, Metrics};
pub use outcome::{ErrorKind, InvocationOutcome};
pub use report::{ComparisonEntry, ComparisonReport};
pub use scorer::{FnScorer, OutputScorer};
