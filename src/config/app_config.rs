use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub experiments: ExperimentsConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Model evaluator settings
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    /// Backend calls running longer than this become timeout outcomes
    #[serde(default = "default_invocation_timeout_ms")]
    pub invocation_timeout_ms: u64,
    /// Upper bound on in-flight backend calls per evaluator
    #[serde(default)]
    pub max_concurrent_invocations: Option<usize>,
}

/// Experiment registry and statistics settings
#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentsConfig {
    /// Confidence level for latency significance tests
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    /// When non-empty, experiments may only reference these backends
    #[serde(default)]
    pub known_backends: Vec<String>,
}

/// Backends served by the simulated invoker
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub backends: BTreeMap<String, SimulatedBackend>,
}

/// Latency/failure profile of a simulated backend
#[derive(Debug, Clone, Deserialize)]
pub struct SimulatedBackend {
    #[serde(default = "default_mean_latency_ms")]
    pub mean_latency_ms: u64,
    #[serde(default)]
    pub jitter_ms: u64,
    #[serde(default)]
    pub failure_rate: f64,
    #[serde(default = "default_tokens")]
    pub tokens: u32,
}

fn default_invocation_timeout_ms() -> u64 {
    30_000
}

fn default_confidence_level() -> f64 {
    0.95
}

fn default_mean_latency_ms() -> u64 {
    200
}

fn default_tokens() -> u32 {
    64
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            invocation_timeout_ms: default_invocation_timeout_ms(),
            max_concurrent_invocations: None,
        }
    }
}

impl EvaluationConfig {
    pub fn invocation_timeout(&self) -> Duration {
        Duration::from_millis(self.invocation_timeout_ms)
    }
}

impl Default for ExperimentsConfig {
    fn default() -> Self {
        Self {
            confidence_level: default_confidence_level(),
            known_backends: Vec::new(),
        }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self {
            mean_latency_ms: default_mean_latency_ms(),
            jitter_ms: 0,
            failure_rate: 0.0,
            tokens: default_tokens(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
