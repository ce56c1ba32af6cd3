//! Infrastructure services

mod experiment_ledger;
mod experiment_registry;
mod model_evaluator;

pub use experiment_ledger::ExperimentLedger;
pub use experiment_registry::ExperimentRegistry;
pub use model_evaluator::ModelEvaluator;
