//! CLI module for PMP LLM Experiments
//!
//! Dry-run harness over the simulated invoker:
//! - `simulate`: drive participants through an experiment and print its statistics
//! - `compare`: run one input against several backends and print the report

pub mod compare;
pub mod simulate;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// PMP LLM Experiments - backend comparison and A/B experiments
#[derive(Parser)]
#[command(name = "pmp-llm-experiments")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a simulated experiment and print its statistics
    Simulate(simulate::SimulateArgs),

    /// Compare backends on one input and print the report
    Compare(compare::CompareArgs),
}

/// Load `.env` and configuration, then install logging
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging)?;

    Ok(config)
}
