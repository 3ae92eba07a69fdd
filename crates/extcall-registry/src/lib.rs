//! Symbol registry for extension-method resolution.
//!
//! [`SymbolRegistry`] stores classes, members, free functions (plain,
//! extension, and constrained) and constraints. It validates every
//! declaration as it arrives, including the one-time access check on
//! extension bodies, and answers the lookups the resolver needs: member
//! lookup with name hiding, free-function visibility by namespace, base
//! chains, and flattened constraint requirements.

mod body_access;
mod namespace_tree;
mod registry;

pub use namespace_tree::{NamespaceData, NamespaceEdge, NamespaceTree};
pub use registry::SymbolRegistry;
