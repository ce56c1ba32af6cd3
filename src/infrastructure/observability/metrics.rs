//! Operational metrics emitted through the `metrics` facade.
//!
//! Nothing is exported unless the host process installs a recorder.

use std::time::Duration;

use metrics::{counter, histogram};

/// Parameters for backend invocation metrics
pub struct InvocationMetricParams<'a> {
    pub backend: &'a str,
    pub duration: Duration,
    pub success: bool,
    pub error_kind: Option<&'a str>,
    pub tokens: u32,
}

/// Record one backend invocation
pub fn record_invocation(params: InvocationMetricParams<'_>) {
    let labels = [
        ("backend", params.backend.to_string()),
        ("status", if params.success { "success" } else { "error" }.to_string()),
    ];

    counter!("backend_invocations_total", &labels).increment(1);
    histogram!("backend_invocation_duration_seconds", &labels)
        .record(params.duration.as_secs_f64());

    if params.tokens > 0 {
        counter!("backend_tokens_total", &labels).increment(u64::from(params.tokens));
    }

    if let Some(kind) = params.error_kind {
        counter!(
            "backend_invocation_errors_total",
            "backend" => params.backend.to_string(),
            "kind" => kind.to_string()
        )
        .increment(1);
    }
}

/// Record a participant assignment; `fresh` is false when an existing
/// assignment was reused
pub fn record_assignment(experiment: &str, group: &str, fresh: bool) {
    counter!(
        "experiment_assignments_total",
        "experiment" => experiment.to_string(),
        "group" => group.to_string(),
        "fresh" => fresh.to_string()
    )
    .increment(1);
}

/// Record an appended participant record
pub fn record_participation(experiment: &str, group: &str, success: bool) {
    counter!(
        "experiment_records_total",
        "experiment" => experiment.to_string(),
        "group" => group.to_string(),
        "status" => if success { "success" } else { "error" }
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_invocation(InvocationMetricParams {
            backend: "model-1",
            duration: Duration::from_millis(250),
            success: false,
            error_kind: Some("timeout"),
            tokens: 0,
        });
        record_assignment("exp-1", "A", true);
        record_participation("exp-1", "A", true);
    }
}
