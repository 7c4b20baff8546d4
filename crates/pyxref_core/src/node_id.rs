//! Node identity.
//!
//! The core never parses Python itself: whatever tree the
//! bundled `pyxref_oracle` adapter hands back only needs to support one
//! operation here — yielding a small, stable, `Copy` key for every node it
//! will ever be asked about again, so the rest of this crate (the symbol
//! memo table, the import-binding set, the oracle's own declaration map) can
//! use plain hash maps instead of re-walking the tree. `pyxref_oracle`
//! builds on `tree-sitter`, whose `Node::id()` already is exactly this: a
//! `usize` stable for the lifetime of the `tree_sitter::Tree` it came from.
//! We just wrap it so the rest of the crate isn't coupled to that choice.
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn new(raw: usize) -> NodeId {
        NodeId(raw)
    }
}

/// A key derived from a [`NodeId`] plus a small discriminant, for callers
/// that want an FxHash-quality hash without pulling `rustc_hash` into every
/// call site (`pyxref_oracle`'s tree tables use this for their internal
/// maps).
pub fn hash_node_id(id: NodeId) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    id.hash(&mut hasher);
    hasher.finish()
}
