//! Model evaluator
//!
//! Runs one input against one or more backends through the invocation
//! adapter. Invocation failures, timeouts and adapter panics all come back
//! as failed outcomes; nothing is raised past this boundary.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::EvaluationConfig;
use crate::domain::evaluation::{
    ComparisonEntry, ComparisonReport, ErrorKind, InvocationOutcome, OutputScorer,
};
use crate::domain::invocation::{BackendId, InvocationAdapter, InvocationInput};
use crate::infrastructure::observability::{record_invocation, InvocationMetricParams};

/// Evaluates backends against inputs
#[derive(Debug, Clone)]
pub struct ModelEvaluator {
    adapter: Arc<dyn InvocationAdapter>,
    timeout: Duration,
    limiter: Option<Arc<Semaphore>>,
    scorer: Option<Arc<dyn OutputScorer>>,
}

impl ModelEvaluator {
    /// Create an evaluator from configuration
    pub fn new(adapter: Arc<dyn InvocationAdapter>, config: &EvaluationConfig) -> Self {
        Self {
            adapter,
            timeout: config.invocation_timeout(),
            limiter: config
                .max_concurrent_invocations
                .filter(|n| *n > 0)
                .map(|n| Arc::new(Semaphore::new(n))),
            scorer: None,
        }
    }

    /// Override the per-invocation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Score successful outputs in comparison reports
    pub fn with_scorer(mut self, scorer: Arc<dyn OutputScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Invoke a single backend exactly once
    pub async fn evaluate_single(
        &self,
        backend_id: &BackendId,
        input: &InvocationInput,
    ) -> InvocationOutcome {
        // The semaphore is never closed, so a failed acquire just runs unbounded
        let _permit = match &self.limiter {
            Some(limiter) => limiter.acquire().await.ok(),
            None => None,
        };

        let start = Instant::now();
        let call = AssertUnwindSafe(self.adapter.invoke(backend_id, input)).catch_unwind();
        let result = timeout(self.timeout, call).await;
        let elapsed = start.elapsed();

        let outcome = match result {
            Ok(Ok(Ok(response))) => {
                let latency = response.latency.unwrap_or(elapsed);
                InvocationOutcome::success(
                    backend_id.clone(),
                    response.text,
                    response.token_count,
                    latency.as_secs_f64(),
                )
            }
            Ok(Ok(Err(error))) => {
                warn!(backend_id = %backend_id, error = %error, "Backend invocation failed");
                InvocationOutcome::failure(
                    backend_id.clone(),
                    error.kind(),
                    error.to_string(),
                    elapsed.as_secs_f64(),
                )
            }
            Ok(Err(_panic)) => {
                warn!(backend_id = %backend_id, "Invocation adapter panicked");
                InvocationOutcome::failure(
                    backend_id.clone(),
                    ErrorKind::BackendError,
                    "Invocation adapter panicked",
                    elapsed.as_secs_f64(),
                )
            }
            Err(_) => {
                warn!(
                    backend_id = %backend_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Backend invocation timed out"
                );
                InvocationOutcome::failure(
                    backend_id.clone(),
                    ErrorKind::Timeout,
                    format!(
                        "Backend call timed out after {}ms",
                        self.timeout.as_millis()
                    ),
                    elapsed.as_secs_f64(),
                )
            }
        };

        record_invocation(InvocationMetricParams {
            backend: backend_id.as_str(),
            duration: elapsed,
            success: outcome.succeeded(),
            error_kind: outcome.error_kind().map(|k| k.as_str()),
            tokens: outcome.token_count(),
        });

        outcome
    }

    /// Run the input against every backend, concurrently. The report keeps
    /// the order of `backend_ids`, including duplicates.
    pub async fn compare(
        &self,
        backend_ids: &[BackendId],
        input: &InvocationInput,
    ) -> ComparisonReport {
        self.compare_with_reference(input.fingerprint(), backend_ids, input)
            .await
    }

    /// Same as [`compare`](Self::compare) with a caller-chosen input reference
    pub async fn compare_with_reference(
        &self,
        input_reference: impl Into<String>,
        backend_ids: &[BackendId],
        input: &InvocationInput,
    ) -> ComparisonReport {
        debug!(backends = backend_ids.len(), "Comparing backends");

        let outcomes = join_all(
            backend_ids
                .iter()
                .map(|backend_id| self.evaluate_single(backend_id, input)),
        )
        .await;

        let entries = outcomes
            .into_iter()
            .map(|outcome| {
                let score = self.score(input, &outcome);
                ComparisonEntry::new(outcome).with_score(score)
            })
            .collect();

        ComparisonReport::new(input_reference, entries)
    }

    fn score(&self, input: &InvocationInput, outcome: &InvocationOutcome) -> Option<f64> {
        if !outcome.succeeded() {
            return None;
        }

        self.scorer
            .as_ref()
            .and_then(|scorer| scorer.score(input, outcome))
    }
}
