//! Structured logging system using tracing crate
//!
//! Chains report debug messages through their hooked logger and, in parallel,
//! as `tracing` debug events. This module installs the subscriber that turns
//! those events into output.
//!
//! ## Log Format Options
//!
//! - `json` - Structured JSON format for log aggregation systems
//! - `pretty` - Human-readable format with colors and indentation
//! - `compact` - Terminal-friendly format with colors but minimal spacing
//!
//! ## Environment Variables
//!
//! - `LOG_LEVEL`: Log level (ERROR, WARN, INFO, DEBUG, TRACE) - defaults to INFO
//! - `LOG_FORMAT`: Output format (json, pretty, compact) - defaults to compact
//! - `LOG_SPANS`: Include span events (true/false) - defaults to false
//! - `RUST_LOG`: Override log filtering (follows env_logger format)
//!
//! ```bash
//! LOG_FORMAT=json LOG_LEVEL=DEBUG chain-helper run --debug
//! ```

use std::env;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSection;

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format for structured logging (machine-readable)
    Json,
    /// Pretty format with colors and indentation (human-readable)
    Pretty,
    /// Compact format with colors but minimal spacing (terminal-friendly)
    Compact,
}

impl LogFormat {
    /// Parse log format from string, falling back to compact
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

/// Parse a level name (case-insensitive)
pub fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Some(Level::ERROR),
        "WARN" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}

fn span_events(include_spans: bool) -> fmt::format::FmtSpan {
    if include_spans {
        fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE
    } else {
        fmt::format::FmtSpan::NONE
    }
}

/// Initialize logging with manual configuration
///
/// Returns false when a global subscriber was already installed.
pub fn init_logging(level: Level, format: LogFormat, include_spans: bool) -> bool {
    // Allow RUST_LOG to override
    let filter = match env::var("RUST_LOG") {
        Ok(rust_log) => EnvFilter::new(rust_log),
        Err(_) => EnvFilter::new(level.to_string()),
    };

    let subscriber = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Json => subscriber
            .with(fmt::layer().json().with_span_events(span_events(include_spans)))
            .try_init(),
        LogFormat::Pretty => subscriber
            .with(
                fmt::layer()
                    .pretty()
                    .with_ansi(true)
                    .with_span_events(span_events(include_spans)),
            )
            .try_init(),
        LogFormat::Compact => subscriber
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(true)
                    .with_target(false)
                    .with_span_events(span_events(include_spans)),
            )
            .try_init(),
    };

    installed.is_ok()
}

/// Initialize logging from the `[logging]` configuration section
pub fn init_from_config(section: &LoggingSection) -> bool {
    let level = parse_level(&section.level).unwrap_or(Level::INFO);
    init_logging(level, LogFormat::parse(&section.format), section.spans)
}

/// Initialize logging from environment variables
pub fn init_default_logging() -> bool {
    let level = env::var("LOG_LEVEL")
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(Level::INFO);

    let format = env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let include_spans = env::var("LOG_SPANS")
        .unwrap_or_else(|_| "false".to_string())
        .to_lowercase()
        == "true";

    init_logging(level, LogFormat::parse(&format), include_spans)
}

/// Create a chain traversal span
#[macro_export]
macro_rules! chain_span {
    ($($field:tt)*) => {
        tracing::info_span!("chain_traversal", $($field)*)
    };
}

/// Create a node processing span
#[macro_export]
macro_rules! node_span {
    ($($field:tt)*) => {
        tracing::debug_span!("node_processing", $($field)*)
    };
}

// Re-export macros for convenience
pub use {chain_span, node_span};
