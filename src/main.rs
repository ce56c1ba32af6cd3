use clap::Parser;
use pmp_llm_experiments::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Simulate(args) => cli::simulate::run(args).await,
        Command::Compare(args) => cli::compare::run(args).await,
    }
}
