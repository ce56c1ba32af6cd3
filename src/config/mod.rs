//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, EvaluationConfig, ExperimentsConfig, LogFormat, LoggingConfig, SimulatedBackend,
    SimulationConfig,
};
