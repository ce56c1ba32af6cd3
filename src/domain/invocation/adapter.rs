//! Invocation adapter capability

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;

use super::{BackendId, InvocationInput};
use crate::domain::evaluation::ErrorKind;

/// Raw response returned by a backend call
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResponse {
    /// Generated text
    pub text: String,
    /// Tokens consumed by the call
    pub token_count: u32,
    /// Latency as reported by the backend, if it reports one
    pub latency: Option<Duration>,
}

impl InvocationResponse {
    /// Create a response without backend-reported latency
    pub fn new(text: impl Into<String>, token_count: u32) -> Self {
        Self {
            text: text.into(),
            token_count,
            latency: None,
        }
    }

    /// Set the backend-reported latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

/// Failure reported by an invocation adapter
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvocationError {
    #[error("Backend call timed out after {0}ms")]
    Timeout(u64),

    #[error("Backend '{backend}' failed: {message}")]
    Backend { backend: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown backend: {0}")]
    UnknownBackend(String),
}

impl InvocationError {
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Classify the failure into the outcome error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Backend { .. } | Self::UnknownBackend(_) => ErrorKind::BackendError,
        }
    }
}

/// Capability that actually calls a model backend.
///
/// Implementations resolve the backend id themselves; callers never branch
/// on it.
#[async_trait]
pub trait InvocationAdapter: Send + Sync + Debug {
    /// Invoke a backend once
    async fn invoke(
        &self,
        backend_id: &BackendId,
        input: &InvocationInput,
    ) -> Result<InvocationResponse, InvocationError>;
}
