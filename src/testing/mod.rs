//! Testing utilities and mock implementations
//!
//! Mock nodes, dispatches and loggers for exercising chains without writing
//! concrete implementations.

pub mod mocks;

pub use mocks::*;
