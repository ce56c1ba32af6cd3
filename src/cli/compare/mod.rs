//! Compare command - runs one input against several backends

use std::sync::Arc;

use clap::Args;

use crate::config::SimulatedBackend;
use crate::create_experiment_core;
use crate::domain::invocation::{BackendId, InvocationInput};
use crate::infrastructure::invocation::SimulatedInvoker;

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Backend to compare; repeat for each backend
    #[arg(long = "backend", required = true)]
    pub backends: Vec<String>,

    /// Input text
    #[arg(long)]
    pub prompt: String,

    /// Image URL attached to the input; repeatable
    #[arg(long = "image-url")]
    pub image_urls: Vec<String>,

    /// Reference recorded in the report instead of the input digest
    #[arg(long)]
    pub reference: Option<String>,
}

/// Run the comparison
pub async fn run(args: CompareArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let invoker = SimulatedInvoker::from_config(&config.simulation)
        .with_fallback(SimulatedBackend::default());
    let core = create_experiment_core(&config, Arc::new(invoker));

    let input = args
        .image_urls
        .iter()
        .fold(InvocationInput::text(&args.prompt), |input, url| {
            input.with_image_url(url)
        });
    let backend_ids: Vec<BackendId> = args.backends.into_iter().map(BackendId::from).collect();

    let report = match args.reference {
        Some(reference) => {
            core.evaluator
                .compare_with_reference(reference, &backend_ids, &input)
                .await
        }
        None => core.evaluator.compare(&backend_ids, &input).await,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
