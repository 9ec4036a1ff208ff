//! Graph and frequency error types.

use ads4gpts_core::AdError;
use thiserror::Error;

/// Errors from the Fibonacci threshold update.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrequencyError {
    /// The input was negative.
    #[error("Input must be a non-negative Fibonacci number, got {0}")]
    Negative(i64),

    /// The next threshold does not fit in a `u64`.
    #[error("Next Fibonacci number after {0} overflows")]
    Overflow(u64),
}

/// Errors that can occur during graph execution.
#[derive(Error, Debug)]
pub enum GraphError {
    /// No entry node defined.
    #[error("No entry node defined")]
    NoEntryNode,

    /// Node not found.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Node execution failed.
    #[error("Node '{node}' execution failed: {message}")]
    ExecutionFailed {
        /// Node name.
        node: String,
        /// Error message.
        message: String,
    },

    /// Maximum steps exceeded.
    #[error("Maximum steps exceeded: {0}")]
    MaxStepsExceeded(u32),

    /// The threshold update failed.
    #[error(transparent)]
    Frequency(#[from] FrequencyError),

    /// An ads4gpts error escaped a node.
    #[error(transparent)]
    Ad(#[from] AdError),
}

impl GraphError {
    /// Create a node not found error.
    pub fn node_not_found(name: impl Into<String>) -> Self {
        Self::NodeNotFound(name.into())
    }

    /// Create an execution failed error.
    pub fn execution_failed(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            node: node.into(),
            message: message.into(),
        }
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
