//! Pluggable output scoring
//!
//! The core does not define how good an output is. Callers that want a
//! quality signal in comparison reports supply a scorer.

use std::fmt;

use super::InvocationOutcome;
use crate::domain::invocation::InvocationInput;

/// Scores a successful output against the input that produced it
pub trait OutputScorer: Send + Sync + fmt::Debug {
    /// Return a score, or `None` if the output cannot be scored
    fn score(&self, input: &InvocationInput, outcome: &InvocationOutcome) -> Option<f64>;
}

/// Adapter turning a plain function into an [`OutputScorer`]
pub struct FnScorer<F>(F);

impl<F> FnScorer<F>
where
    F: Fn(&InvocationInput, &InvocationOutcome) -> Option<f64> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> fmt::Debug for FnScorer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnScorer").finish_non_exhaustive()
    }
}

impl<F> OutputScorer for FnScorer<F>
where
    F: Fn(&InvocationInput, &InvocationOutcome) -> Option<f64> + Send + Sync,
{
    fn score(&self, input: &InvocationInput, outcome: &InvocationOutcome) -> Option<f64> {
        (self.0)(input, outcome)
    }
}
