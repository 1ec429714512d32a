//! Chain core
//!
//! Three cooperating pieces make up the chain system:
//!
//! - [`Node`]: a key/version-identified unit of processing logic
//! - [`Dispatch`]: the unit of work routed through a chain, carrying validity,
//!   consumption and result state
//! - [`ChainHelper`]: the router holding linked nodes and traversing them
//!
//! ```text
//! caller → initialize(dispatch) → ChainHelper::traverse → Node::process (each, in link order)
//!                                         ↑                      │
//!                                         └── stop if consumed ──┘
//! ```

pub mod dispatch;
pub mod helper;
pub mod node;
pub mod sender;

pub use dispatch::{
    downcast_dispatch, downcast_dispatch_mut, is_dispatch_of, AsAny, Dispatch, DispatchState,
};
pub use helper::{ChainHelper, Logger};
pub use node::{Node, NodeIdentity, NodeInfo};
pub use sender::Sender;

/// Last path segment of a type name, without generic arguments.
///
/// Used for the `TypeName{ ... }` debug strings of nodes and dispatches.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
