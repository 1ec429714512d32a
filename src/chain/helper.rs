//! Chain router
//!
//! [`ChainHelper`] keeps a group of nodes and sends dispatches through them.
//!
//! ## Modes
//!
//! - **Ordered** chains keep every linked node, in link order, duplicates
//!   included. Traversal visits each node and stops early once a consumable
//!   dispatch has been consumed.
//! - **Event** chains hold at most one node; linking replaces it. Traversal
//!   invokes that single node and never checks consumption.
//!
//! ## Rejections
//!
//! Linking an invalid node is silently ignored. Traversal returns `Ok(false)`
//! without touching any node when the chain is empty, the dispatch is
//! invalid, or the dispatch is consumable and already consumed. With debug
//! enabled, every rejection is reported through the hooked logger.
//!
//! # Example
//!
//! ```rust
//! use chain_helper::chain::{ChainHelper, Dispatch};
//! use chain_helper::testing::{MockDispatch, MockNode};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let mut chain = ChainHelper::ordered();
//! chain
//!     .link_node(Arc::new(MockNode::new("first", "1").with_result(json!("a"))))
//!     .link_node(Arc::new(MockNode::new("second", "1").consuming()))
//!     .link_node(Arc::new(MockNode::new("third", "1").with_result(json!("c"))));
//!
//! let mut dispatch = MockDispatch::consumable();
//! assert!(chain.traverse(&mut dispatch, None).unwrap());
//!
//! // "third" never ran: "second" consumed the dispatch
//! assert!(dispatch.is_consumed());
//! assert_eq!(dispatch.results(), Some(&[json!("a")][..]));
//!
//! // A consumed dispatch is refused
//! assert!(!chain.traverse(&mut dispatch, None).unwrap());
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::chain::dispatch::Dispatch;
use crate::chain::node::{Node, NodeInfo};
use crate::chain::sender::Sender;
use crate::config::ChainSection;
use crate::error::{ChainError, ChainResult};

/// Debug message sink installed with [`ChainHelper::hook_logger`]
pub type Logger = Box<dyn Fn(&str) + Send + Sync>;

/// Group of nodes that dispatches are sent through
pub struct ChainHelper {
    nodes: Vec<Arc<dyn Node>>,
    is_event: bool,
    debug: bool,
    logger: Option<Logger>,
}

impl ChainHelper {
    /// Create a chain. An event chain holds at most one node at a time.
    pub fn new(is_event: bool, debug: bool) -> Self {
        Self {
            nodes: Vec::new(),
            is_event,
            debug,
            logger: None,
        }
    }

    /// Ordered chain with debug messages off
    pub fn ordered() -> Self {
        Self::new(false, false)
    }

    /// Event chain with debug messages off
    pub fn event() -> Self {
        Self::new(true, false)
    }

    pub fn from_config(section: &ChainSection) -> Self {
        Self::new(section.event, section.debug)
    }

    pub fn toggle_debug(&mut self, debug: bool) -> &mut Self {
        self.debug = debug;
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn is_event(&self) -> bool {
        self.is_event
    }

    /// Install the debug message sink, replacing any previous one
    pub fn hook_logger<F>(&mut self, logger: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.logger = Some(Box::new(logger));
    }

    pub fn has_logger(&self) -> bool {
        self.logger.is_some()
    }

    /// Key and version of every linked node, in link order
    pub fn node_list(&self) -> Vec<NodeInfo> {
        self.nodes.iter().map(|node| node.info()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Register a node with the chain
    ///
    /// Invalid nodes are ignored. Event chains replace their node; ordered
    /// chains append.
    pub fn link_node(&mut self, node: Arc<dyn Node>) -> &mut Self {
        if !node.is_valid() {
            if self.debug {
                self.log(&format!(
                    "Attempted to add invalid node: {}",
                    node.describe()
                ));
            }

            return self;
        }

        if self.is_event {
            if self.debug {
                self.log(&format!("Setting event node: {}", node.describe()));
            }

            self.nodes = vec![node];
        } else {
            if self.debug {
                self.log(&format!("Linking new node: {}", node.describe()));
            }

            self.nodes.push(node);
        }

        self
    }

    /// Send a dispatch through the linked nodes
    ///
    /// Returns `Ok(false)` when the chain is empty, the dispatch is invalid,
    /// or the dispatch is consumable and already consumed. `Ok(true)` means
    /// the nodes were invoked, not that any node consumed the dispatch.
    /// A node error stops the traversal and is returned as
    /// [`ChainError::NodeFailed`].
    ///
    /// When `sender` is `None`, nodes receive [`Sender::Chain`] with this
    /// chain.
    pub fn traverse(
        &self,
        dispatch: &mut dyn Dispatch,
        sender: Option<&dyn Any>,
    ) -> ChainResult<bool> {
        if self.nodes.is_empty() {
            if self.debug {
                self.log("Attempted to traverse chain with no nodes");
            }

            return Ok(false);
        }

        if !dispatch.is_valid() {
            if self.debug {
                self.log(&format!(
                    "Attempted to traverse chain with invalid dispatch: {}",
                    dispatch.describe()
                ));
            }

            return Ok(false);
        }

        if dispatch.is_consumable() && dispatch.is_consumed() {
            if self.debug {
                self.log(&format!(
                    "Attempted to traverse chain with consumed dispatch: {}",
                    dispatch.describe()
                ));
            }

            return Ok(false);
        }

        let sender = match sender {
            Some(data) => Sender::External(data),
            None => Sender::Chain(self),
        };

        let _span =
            crate::chain_span!(event_chain = self.is_event, nodes = self.nodes.len()).entered();

        if self.is_event {
            let node = &self.nodes[0];
            if self.debug {
                self.log(&format!(
                    "Sending dispatch ({}) to event node: {}",
                    dispatch.describe(),
                    node.describe()
                ));
            }

            self.process_node(node, sender, dispatch)?;
            return Ok(true);
        }

        let is_consumable = dispatch.is_consumable();

        for node in &self.nodes {
            if self.debug {
                self.log(&format!(
                    "Sending dispatch ({}) to node: {}",
                    dispatch.describe(),
                    node.describe()
                ));
            }

            self.process_node(node, sender, dispatch)?;

            if is_consumable && dispatch.is_consumed() {
                if self.debug {
                    self.log(&format!(
                        "Dispatch ({}) consumed by node: {}",
                        dispatch.describe(),
                        node.describe()
                    ));
                }

                break;
            }
        }

        Ok(true)
    }

    fn process_node(
        &self,
        node: &Arc<dyn Node>,
        sender: Sender<'_>,
        dispatch: &mut dyn Dispatch,
    ) -> ChainResult<()> {
        let _span = crate::node_span!(key = node.key(), version = node.version()).entered();

        node.process(sender, dispatch).map_err(|error| {
            let description = node.describe();
            warn!(node = %description, error = %error, "Node failed to process dispatch");

            if self.debug {
                self.log(&format!("Node {description} failed: {error}"));
            }

            ChainError::node_failed(description, error)
        })
    }

    /// Send a debug message to the hooked logger
    ///
    /// No-op unless debug is enabled. Messages are also emitted as `tracing`
    /// debug events.
    pub fn log(&self, message: &str) {
        if !self.debug {
            return;
        }

        debug!(event_chain = self.is_event, "{message}");

        if let Some(logger) = &self.logger {
            logger(message);
        }
    }
}

impl Default for ChainHelper {
    fn default() -> Self {
        Self::ordered()
    }
}

impl fmt::Debug for ChainHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainHelper")
            .field("nodes", &self.node_list())
            .field("is_event", &self.is_event)
            .field("debug", &self.debug)
            .field("has_logger", &self.logger.is_some())
            .finish()
    }
}
