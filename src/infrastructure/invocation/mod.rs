//! Invocation adapter implementations

mod simulated;

pub use simulated::SimulatedInvoker;
