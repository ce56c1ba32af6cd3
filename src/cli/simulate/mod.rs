//! Simulate command - runs participants through an experiment

use std::sync::Arc;

use clap::Args;
use futures::future::try_join_all;
use tracing::info;

use crate::config::SimulatedBackend;
use crate::create_experiment_core;
use crate::domain::experiment::ExperimentDefinition;
use crate::domain::invocation::InvocationInput;
use crate::infrastructure::invocation::SimulatedInvoker;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Experiment name
    #[arg(long, default_value = "simulation")]
    pub experiment: String,

    /// Group to backend mapping, e.g. `a=model-1,b=model-2`
    #[arg(long, required = true, value_delimiter = ',', value_parser = parse_pair)]
    pub groups: Vec<(String, String)>,

    /// Group weights, e.g. `a=9,b=1`; uniform when omitted
    #[arg(long, value_delimiter = ',', value_parser = parse_weight)]
    pub weights: Vec<(String, f64)>,

    /// Number of participants
    #[arg(long, default_value_t = 100)]
    pub participants: usize,

    /// Invocations per participant
    #[arg(long, default_value_t = 1)]
    pub runs_per_participant: usize,

    /// Input sent to the backends
    #[arg(long, default_value = "Summarize the quarterly report.")]
    pub prompt: String,

    /// Assignment salt
    #[arg(long)]
    pub salt: Option<String>,
}

/// Run the simulation
pub async fn run(args: SimulateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let invoker = SimulatedInvoker::from_config(&config.simulation)
        .with_fallback(SimulatedBackend::default());
    let core = create_experiment_core(&config, Arc::new(invoker));

    let definition = build_definition(&args);
    core.registry.register(definition).await?;

    info!(
        experiment = %args.experiment,
        participants = args.participants,
        runs = args.runs_per_participant,
        "Starting simulation"
    );

    let input = InvocationInput::text(&args.prompt);
    let ledger = &core.ledger;
    let experiment = args.experiment.as_str();

    try_join_all((1..=args.participants).map(|i| {
        let input = &input;
        async move {
            let participant = format!("participant-{}", i);

            for _ in 0..args.runs_per_participant {
                ledger.participate(experiment, &participant, input).await?;
            }

            Ok::<_, anyhow::Error>(())
        }
    }))
    .await?;

    let statistics = ledger.statistics(experiment).await?;
    println!("{}", serde_json::to_string_pretty(&statistics)?);

    Ok(())
}

fn build_definition(args: &SimulateArgs) -> ExperimentDefinition {
    let mut definition = args
        .groups
        .iter()
        .fold(ExperimentDefinition::new(&args.experiment), |def, (group, backend)| {
            def.with_group(group, backend.as_str())
        });

    for (group, weight) in &args.weights {
        definition = definition.with_weight(group, *weight);
    }

    match &args.salt {
        Some(salt) => definition.with_salt(salt),
        None => definition,
    }
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;

    Ok((key.trim().to_string(), value.trim().to_string()))
}

fn parse_weight(s: &str) -> Result<(String, f64), String> {
    let (group, weight) = parse_pair(s)?;
    let weight = weight
        .parse::<f64>()
        .map_err(|e| format!("invalid weight for '{}': {}", group, e))?;

    Ok((group, weight))
}
