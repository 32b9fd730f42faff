//! Error types for algo-lab-core

use serde::Serialize;
use thiserror::Error;

/// Result type alias for algo-lab-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up sweeps, generators or the harness
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Unknown input pattern: {0}")]
    UnknownPattern(String),

    #[error("Unknown graph type: {0}")]
    UnknownGraphType(String),

    #[error("Invalid sweep: {0}")]
    InvalidSweep(String),

    #[error("Node {node} is out of range for a graph with {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },

    #[error("Unknown sorting algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Unknown Fibonacci method: {0}")]
    UnknownMethod(String),
}

/// Why a single measured run did not produce a sample.
///
/// These never abort a sweep: the table builder renders them in place of the
/// missing value.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum Failure {
    #[error("recursion depth exceeded the limit of {limit} frames")]
    StackDepthExceeded { limit: usize },

    #[error("failed to allocate {bytes} bytes")]
    AllocationFailed { bytes: usize },

    #[error("{0}")]
    Panicked(String),

    #[error("{0}")]
    Unsupported(String),
}

impl Failure {
    /// Resource exhaustion (stack depth, memory) as opposed to any other failure
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, Self::StackDepthExceeded { .. } | Self::AllocationFailed { .. })
    }

    /// Text shown in a table cell in place of the value
    pub fn cell_text(&self) -> String {
        if self.is_resource_exhaustion() {
            "Error".to_string()
        } else {
            format!("Error: {}", self)
        }
    }
}
