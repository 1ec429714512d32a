//! Traversal sender
//!
//! Nodes receive the party that started a traversal. When the caller does not
//! name one, the chain itself is the sender.

use std::any::Any;
use std::fmt;

use crate::chain::helper::ChainHelper;

/// Who triggered a traversal
#[derive(Clone, Copy)]
pub enum Sender<'a> {
    /// The traversing chain (the default when no sender is given)
    Chain(&'a ChainHelper),
    /// Caller-supplied sender data
    External(&'a dyn Any),
}

impl<'a> Sender<'a> {
    /// Check if the chain itself is the sender
    pub fn is_chain(&self) -> bool {
        matches!(self, Sender::Chain(_))
    }

    /// The traversing chain, if it is the sender
    pub fn as_chain(&self) -> Option<&'a ChainHelper> {
        match self {
            Sender::Chain(chain) => Some(chain),
            Sender::External(_) => None,
        }
    }

    /// Downcast caller-supplied sender data to a concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        match self {
            Sender::External(data) => data.downcast_ref::<T>(),
            Sender::Chain(_) => None,
        }
    }
}

impl fmt::Debug for Sender<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::Chain(chain) => f.debug_tuple("Chain").field(chain).finish(),
            Sender::External(_) => f.write_str("External(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_sender() {
        let chain = ChainHelper::ordered();
        let sender = Sender::Chain(&chain);

        assert!(sender.is_chain());
        assert!(sender.as_chain().is_some());
        assert!(sender.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_external_sender_downcast() {
        let origin = String::from("scheduler");
        let sender = Sender::External(&origin);

        assert!(!sender.is_chain());
        assert!(sender.as_chain().is_none());
        assert_eq!(sender.downcast_ref::<String>().map(String::as_str), Some("scheduler"));
        assert!(sender.downcast_ref::<u32>().is_none());
    }
}
