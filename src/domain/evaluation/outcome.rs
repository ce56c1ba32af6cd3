//! Invocation outcome types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::invocation::BackendId;

/// Classification of a failed invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    BackendError,
    InvalidInput,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::BackendError => "backend_error",
            Self::InvalidInput => "invalid_input",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured result of one backend invocation.
///
/// Failures are carried here as data; they are never raised past the
/// evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInvocationOutcome")]
pub struct InvocationOutcome {
    backend_id: BackendId,
    output_text: String,
    token_count: u32,
    latency_seconds: f64,
    succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl InvocationOutcome {
    /// Create a successful outcome
    pub fn success(
        backend_id: impl Into<BackendId>,
        output_text: impl Into<String>,
        token_count: u32,
        latency_seconds: f64,
    ) -> Self {
        Self {
            backend_id: backend_id.into(),
            output_text: output_text.into(),
            token_count,
            latency_seconds: sanitize_latency(latency_seconds),
            succeeded: true,
            error_kind: None,
            error_message: None,
        }
    }

    /// Create a failed outcome
    pub fn failure(
        backend_id: impl Into<BackendId>,
        error_kind: ErrorKind,
        error_message: impl Into<String>,
        latency_seconds: f64,
    ) -> Self {
        Self {
            backend_id: backend_id.into(),
            output_text: String::new(),
            token_count: 0,
            latency_seconds: sanitize_latency(latency_seconds),
            succeeded: false,
            error_kind: Some(error_kind),
            error_message: Some(error_message.into()),
        }
    }

    /// Attach partial token usage to a failed outcome
    pub fn with_token_count(mut self, token_count: u32) -> Self {
        self.token_count = token_count;
        self
    }

    pub fn backend_id(&self) -> &BackendId {
        &self.backend_id
    }

    pub fn output_text(&self) -> &str {
        &self.output_text
    }

    pub fn token_count(&self) -> u32 {
        self.token_count
    }

    pub fn latency_seconds(&self) -> f64 {
        self.latency_seconds
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Wire shape of [`InvocationOutcome`], checked before it becomes one
#[derive(Deserialize)]
struct RawInvocationOutcome {
    backend_id: BackendId,
    #[serde(default)]
    output_text: String,
    #[serde(default)]
    token_count: u32,
    latency_seconds: f64,
    succeeded: bool,
    #[serde(default)]
    error_kind: Option<ErrorKind>,
    #[serde(default)]
    error_message: Option<String>,
}

impl TryFrom<RawInvocationOutcome> for InvocationOutcome {
    type Error = String;

    fn try_from(raw: RawInvocationOutcome) -> Result<Self, Self::Error> {
        if raw.succeeded && raw.error_kind.is_some() {
            return Err(format!(
                "outcome for backend '{}' is marked succeeded but carries an error kind",
                raw.backend_id
            ));
        }

        Ok(Self {
            backend_id: raw.backend_id,
            output_text: raw.output_text,
            token_count: raw.token_count,
            latency_seconds: sanitize_latency(raw.latency_seconds),
            succeeded: raw.succeeded,
            error_kind: raw.error_kind,
            error_message: raw.error_message,
        })
    }
}

/// Latency is never negative or NaN
pub(crate) fn sanitize_latency(latency_seconds: f64) -> f64 {
    if latency_seconds.is_finite() && latency_seconds > 0.0 {
        latency_seconds
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_outcome() {
        let outcome = InvocationOutcome::success("model-1", "hello", 12, 0.75);

        assert!(outcome.succeeded());
        assert_eq!(outcome.backend_id().as_str(), "model-1");
        assert_eq!(outcome.output_text(), "hello");
        assert_eq!(outcome.token_count(), 12);
        assert!(outcome.error_kind().is_none());
    }

    #[test]
    fn test_failure_outcome() {
        let outcome =
            InvocationOutcome::failure("model-2", ErrorKind::Timeout, "timed out", 30.0);

        assert!(!outcome.succeeded());
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Timeout));
        assert_eq!(outcome.error_message(), Some("timed out"));
        assert_eq!(outcome.output_text(), "");
        assert_eq!(outcome.token_count(), 0);
    }

    #[test]
    fn test_latency_is_clamped() {
        assert_eq!(InvocationOutcome::success("m", "", 0, -1.0).latency_seconds(), 0.0);
        assert_eq!(
            InvocationOutcome::success("m", "", 0, f64::NAN).latency_seconds(),
            0.0
        );
    }

    #[test]
    fn test_deserialized_latency_is_clamped() {
        let negative: InvocationOutcome = serde_json::from_str(
            r#"{"backend_id":"m","output_text":"ok","token_count":1,"latency_seconds":-3.0,"succeeded":true}"#,
        )
        .unwrap();
        assert_eq!(negative.latency_seconds(), 0.0);

        let roundtrip: InvocationOutcome =
            serde_json::from_str(&serde_json::to_string(&InvocationOutcome::success("m", "ok", 2, 1.5)).unwrap())
                .unwrap();
        assert_eq!(roundtrip.latency_seconds(), 1.5);
    }

    #[test]
    fn test_deserialize_rejects_succeeded_with_error_kind() {
        let result = serde_json::from_str::<InvocationOutcome>(
            r#"{"backend_id":"m","output_text":"","token_count":0,"latency_seconds":1.0,"succeeded":true,"error_kind":"timeout"}"#,
        );
        assert!(result.is_err());

        let failed: InvocationOutcome = serde_json::from_str(
            r#"{"backend_id":"m","latency_seconds":1.0,"succeeded":false,"error_kind":"timeout","error_message":"slow"}"#,
        )
        .unwrap();
        assert_eq!(failed.error_kind(), Some(ErrorKind::Timeout));
    }

    #[test]
    fn test_error_kind_serialization() {
        let json = serde_json::to_string(&ErrorKind::BackendError).unwrap();
        assert_eq!(json, "\"backend_error\"");
        assert_eq!(ErrorKind::InvalidInput.to_string(), "invalid_input");
    }
}
