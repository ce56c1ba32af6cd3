//! Invocation domain module
//!
//! The invocation adapter is the only place where a backend is actually
//! called. Everything above it treats backends as opaque identifiers.

mod adapter;
mod backend;
mod input;

pub use adapter::{InvocationAdapter, InvocationError, InvocationResponse};
pub use backend::BackendId;
pub use input::{ImageInput, InvocationInput};

#[cfg(test)]
pub use adapter::mock::{MockBehavior, MockInvocationAdapter};
