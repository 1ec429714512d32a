//! Observability
//!
//! Structured logging setup and span macros for chain traversal.

pub mod logging;

// Re-export for convenience
pub use logging::{
    init_default_logging, init_from_config, init_logging, parse_level, LogFormat,
};

// Span macros for structured logging
pub use logging::{chain_span, node_span};
