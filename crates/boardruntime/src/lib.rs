//! Board execution runtime
//!
//! This crate hosts the executor registry and the graph runner that turns
//! a board into a sequential, dependency-ordered run with per-node failure
//! isolation.

mod registry;
mod runner;
mod runtime;

pub use registry::{ExecutorRegistry, Passthrough};
pub use runner::{GraphRunner, RunResult, CYCLE_ERROR_KEY};
pub use runtime::{BoardRuntime, RuntimeConfig};
