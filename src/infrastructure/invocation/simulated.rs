//! Simulated invocation adapter for dry runs
//!
//! Sleeps for a configured latency and fails at a configured rate instead
//! of calling a real model.

use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::{SimulatedBackend, SimulationConfig};
use crate::domain::invocation::{
    BackendId, InvocationAdapter, InvocationError, InvocationInput, InvocationResponse,
};

const ECHO_PREVIEW_CHARS: usize = 48;

/// Invocation adapter backed by latency/failure profiles
#[derive(Debug, Clone, Default)]
pub struct SimulatedInvoker {
    profiles: HashMap<BackendId, SimulatedBackend>,
    fallback: Option<SimulatedBackend>,
}

impl SimulatedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `simulation` configuration section
    pub fn from_config(config: &SimulationConfig) -> Self {
        config
            .backends
            .iter()
            .fold(Self::new(), |invoker, (id, profile)| {
                invoker.with_backend(id.as_str(), profile.clone())
            })
    }

    /// Register a backend profile
    pub fn with_backend(mut self, id: impl Into<BackendId>, profile: SimulatedBackend) -> Self {
        self.profiles.insert(id.into(), profile);
        self
    }

    /// Profile used for backends without one; without it they are unknown
    pub fn with_fallback(mut self, profile: SimulatedBackend) -> Self {
        self.fallback = Some(profile);
        self
    }

    fn profile(&self, backend_id: &BackendId) -> Option<&SimulatedBackend> {
        self.profiles.get(backend_id).or(self.fallback.as_ref())
    }

    /// Draw latency and failure for one call
    fn sample(profile: &SimulatedBackend) -> (Duration, bool) {
        let mut rng = rand::thread_rng();

        let max_jitter = i64::try_from(profile.jitter_ms).unwrap_or(i64::MAX);
        let jitter = if max_jitter > 0 {
            rng.gen_range(-max_jitter..=max_jitter)
        } else {
            0
        };
        let mean = i64::try_from(profile.mean_latency_ms).unwrap_or(i64::MAX);
        let latency_ms = u64::try_from(mean.saturating_add(jitter)).unwrap_or(0);

        let failure_rate = if profile.failure_rate.is_finite() {
            profile.failure_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };

        (Duration::from_millis(latency_ms), rng.gen_bool(failure_rate))
    }
}

#[async_trait]
impl InvocationAdapter for SimulatedInvoker {
    async fn invoke(
        &self,
        backend_id: &BackendId,
        input: &InvocationInput,
    ) -> Result<InvocationResponse, InvocationError> {
        let profile = self
            .profile(backend_id)
            .ok_or_else(|| InvocationError::UnknownBackend(backend_id.to_string()))?;

        if input.is_empty() {
            return Err(InvocationError::invalid_input("Input has no text or images"));
        }

        let (latency, fails) = Self::sample(profile);
        tokio::time::sleep(latency).await;

        if fails {
            return Err(InvocationError::backend(
                backend_id.as_str(),
                "Simulated backend failure",
            ));
        }

        let preview: String = input.text.chars().take(ECHO_PREVIEW_CHARS).collect();

        Ok(
            InvocationResponse::new(format!("[{}] {}", backend_id, preview), profile.tokens)
                .with_latency(latency),
        )
    }
}
