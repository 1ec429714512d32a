//! Node contract
//!
//! A node is a unit of processing logic identified by a key and a version.
//! Chains only accept nodes whose key and version are both non-empty; the
//! check is a silent gate, never an error.
//!
//! Concrete nodes embed a [`NodeIdentity`] and implement [`Node::process`]:
//!
//! ```rust
//! use chain_helper::chain::{Dispatch, Node, NodeIdentity, Sender};
//! use chain_helper::error::ChainResult;
//! use serde_json::json;
//!
//! struct Greeter {
//!     identity: NodeIdentity,
//! }
//!
//! impl Node for Greeter {
//!     fn identity(&self) -> &NodeIdentity {
//!         &self.identity
//!     }
//!
//!     fn identity_mut(&mut self) -> &mut NodeIdentity {
//!         &mut self.identity
//!     }
//!
//!     fn process(&self, _sender: Sender<'_>, dispatch: &mut dyn Dispatch) -> ChainResult<()> {
//!         dispatch.set_result(json!("hello"));
//!         Ok(())
//!     }
//! }
//!
//! let mut greeter = Greeter { identity: NodeIdentity::default() };
//! assert!(!greeter.is_valid());
//!
//! greeter.set_key("greeter").set_version("1.0.0");
//! assert!(greeter.is_valid());
//! assert_eq!(greeter.describe(), r#"Greeter{ "key": "greeter", "version": "1.0.0" }"#);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chain::dispatch::Dispatch;
use crate::chain::sender::Sender;
use crate::chain::short_type_name;
use crate::error::ChainResult;

/// Key and version of a node. Both start out empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodeIdentity {
    key: String,
    version: String,
}

impl NodeIdentity {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, version: V) -> Self {
        Self {
            key: key.into(),
            version: version.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_key<K: Into<String>>(&mut self, key: K) -> &mut Self {
        self.key = key.into();
        self
    }

    pub fn set_version<V: Into<String>>(&mut self, version: V) -> &mut Self {
        self.version = version.into();
        self
    }

    /// True iff both key and version are non-empty
    pub fn is_valid(&self) -> bool {
        !self.key.is_empty() && !self.version.is_empty()
    }
}

/// Snapshot of a linked node's identity, as reported by
/// [`ChainHelper::node_list`](crate::chain::ChainHelper::node_list)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub key: String,
    pub version: String,
}

impl From<&NodeIdentity> for NodeInfo {
    fn from(identity: &NodeIdentity) -> Self {
        Self {
            key: identity.key.clone(),
            version: identity.version.clone(),
        }
    }
}

/// Processing unit linked into chains
///
/// Nodes are shared between chains through `Arc`, so `process` takes `&self`.
/// Any mutable state a node keeps is its own business (atomics, mutexes).
pub trait Node: Send + Sync {
    fn identity(&self) -> &NodeIdentity;

    fn identity_mut(&mut self) -> &mut NodeIdentity;

    /// Perform this node's work on a dispatch
    ///
    /// Typically sets results and, for consumable dispatches, calls
    /// [`Dispatch::consume`] to stop the rest of an ordered chain. An error
    /// aborts the traversal and is returned to the caller of
    /// [`ChainHelper::traverse`](crate::chain::ChainHelper::traverse).
    fn process(&self, sender: Sender<'_>, dispatch: &mut dyn Dispatch) -> ChainResult<()>;

    fn key(&self) -> &str {
        self.identity().key()
    }

    fn version(&self) -> &str {
        self.identity().version()
    }

    fn set_key<K: Into<String>>(&mut self, key: K) -> &mut Self
    where
        Self: Sized,
    {
        self.identity_mut().set_key(key);
        self
    }

    fn set_version<V: Into<String>>(&mut self, version: V) -> &mut Self
    where
        Self: Sized,
    {
        self.identity_mut().set_version(version);
        self
    }

    /// Whether chains will accept this node
    fn is_valid(&self) -> bool {
        self.identity().is_valid()
    }

    fn info(&self) -> NodeInfo {
        NodeInfo::from(self.identity())
    }

    /// Debug string: `TypeName{ "key": "...", "version": "..." }`
    fn describe(&self) -> String {
        format!(
            "{}{{ \"key\": \"{}\", \"version\": \"{}\" }}",
            short_type_name::<Self>(),
            self.key(),
            self.version()
        )
    }
}

impl<'a> fmt::Display for dyn Node + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct NoopNode {
        identity: NodeIdentity,
    }

    impl Node for NoopNode {
        fn identity(&self) -> &NodeIdentity {
            &self.identity
        }

        fn identity_mut(&mut self) -> &mut NodeIdentity {
            &mut self.identity
        }

        fn process(&self, _sender: Sender<'_>, _dispatch: &mut dyn Dispatch) -> ChainResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_new_node_is_unset_and_invalid() {
        let node = NoopNode {
            identity: NodeIdentity::default(),
        };

        assert_eq!(node.key(), "");
        assert_eq!(node.version(), "");
        assert!(!node.is_valid());
    }

    #[test]
    fn test_setters_chain() {
        let mut node = NoopNode {
            identity: NodeIdentity::default(),
        };
        node.set_key("audit").set_version("2");

        assert_eq!(node.key(), "audit");
        assert_eq!(node.version(), "2");
        assert!(node.is_valid());
    }

    #[test]
    fn test_key_without_version_is_invalid() {
        let node = NoopNode {
            identity: NodeIdentity::new("audit", ""),
        };
        assert!(!node.is_valid());
    }

    #[test]
    fn test_describe_uses_type_name() {
        let node = NoopNode {
            identity: NodeIdentity::new("audit", "2"),
        };
        assert_eq!(
            node.describe(),
            r#"NoopNode{ "key": "audit", "version": "2" }"#
        );

        let shared: &dyn Node = &node;
        assert_eq!(shared.to_string(), node.describe());
    }

    #[test]
    fn test_info_snapshot() {
        let node = NoopNode {
            identity: NodeIdentity::new("audit", "2"),
        };
        assert_eq!(
            node.info(),
            NodeInfo {
                key: "audit".to_string(),
                version: "2".to_string()
            }
        );
    }

    proptest! {
        #[test]
        fn prop_identity_valid_iff_both_non_empty(key in ".{0,8}", version in ".{0,8}") {
            let identity = NodeIdentity::new(key.clone(), version.clone());
            prop_assert_eq!(identity.is_valid(), !key.is_empty() && !version.is_empty());
        }
    }
}
