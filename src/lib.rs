//! Chain Helper
//!
//! A small chain-of-responsibility framework: named, versioned nodes are
//! linked into ordered or single-slot chains, and dispatches are routed
//! through them.
//!
//! # Overview
//!
//! - [`chain::Node`]: processing unit identified by key and version
//! - [`chain::Dispatch`]: unit of work with validity, consumption and result state
//! - [`chain::ChainHelper`]: router with ordered and event modes, consumption
//!   short-circuit and an optional debug logger hook
//! - [`utilities::ReturnHelper`]: status flag plus message and result lists
//!
//! # Quick Start
//!
//! ```rust
//! use chain_helper::chain::{ChainHelper, Dispatch, NodeInfo};
//! use chain_helper::testing::{CapturingLogger, MockDispatch, MockNode};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! // Event chains keep only the most recently linked node
//! let mut chain = ChainHelper::event();
//! chain
//!     .link_node(Arc::new(MockNode::new("k", "1")))
//!     .link_node(Arc::new(MockNode::new("k2", "2").with_result(json!("handled"))));
//!
//! assert_eq!(
//!     chain.node_list(),
//!     vec![NodeInfo { key: "k2".to_string(), version: "2".to_string() }]
//! );
//!
//! // Debug messages go to the hooked logger
//! let logger = CapturingLogger::new();
//! chain.toggle_debug(true).hook_logger(logger.sink());
//!
//! let mut dispatch = MockDispatch::valid();
//! assert!(chain.traverse(&mut dispatch, None).unwrap());
//! assert_eq!(dispatch.results(), Some(&[json!("handled")][..]));
//! assert!(!logger.messages().is_empty());
//! ```

pub mod chain;
pub mod config;
pub mod error;
pub mod observability;
pub mod testing;
pub mod utilities;

pub use chain::{ChainHelper, Dispatch, DispatchState, Node, NodeIdentity, NodeInfo, Sender};
pub use config::{ChainConfig, ConfigError};
pub use error::{ChainError, ChainResult};
pub use utilities::{ReturnHelper, ReturnStatus, UtilityError};
