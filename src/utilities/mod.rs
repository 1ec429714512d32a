//! Utilities independent of the chain core

pub mod return_helper;

pub use return_helper::{ReturnHelper, ReturnStatus};

use thiserror::Error;

/// Caller errors raised by utility types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UtilityError {
    #[error("Messages passed to add_messages() must contain at least one element")]
    EmptyMessages,
    #[error("Results passed to add_results() must contain at least one element")]
    EmptyResults,
}

pub type UtilityResult<T> = Result<T, UtilityError>;
