//! Observability infrastructure - operational metrics

mod metrics;

pub use metrics::{
    record_assignment, record_invocation, record_participation, InvocationMetricParams,
};
