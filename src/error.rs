//! Error types for chain traversal
//!
//! The chain core signals rejected links and rejected traversals with plain
//! booleans. Errors are reserved for failures raised by concrete nodes and
//! dispatches, and for configuration loading.

use thiserror::Error;

/// Main error type for chain operations
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Node {node} failed: {source}")]
    NodeFailed {
        node: String,
        #[source]
        source: Box<ChainError>,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Processing failed: {message}")]
    ProcessingFailed { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl ChainError {
    /// Wrap an error raised by a node's `process` with the node's description
    pub fn node_failed<S: Into<String>>(node: S, source: ChainError) -> Self {
        Self::NodeFailed {
            node: node.into(),
            source: Box::new(source),
        }
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create processing failure error
    pub fn processing_failed<S: Into<String>>(message: S) -> Self {
        Self::ProcessingFailed {
            message: message.into(),
        }
    }
}

/// Result type for chain operations
pub type ChainResult<T> = Result<T, ChainError>;
