//! `engine` crate: the host side of the node contract: runs a node over a
//! batch of items and applies the continue-on-failure policy.

pub mod error;
pub mod executor;

pub use error::EngineError;
pub use executor::{ExecutionResult, ExecutorConfig, ItemExecutor};

#[cfg(test)]
mod executor_tests;
