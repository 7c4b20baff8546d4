//! The bundled Python front end: a `tree-sitter-python` parser, a lowering
//! pass that flattens each parse into the node-kind/parent-chain shape
//! [`pyxref_core::tree`] expects, and the [`oracle::SyntacticOracle`] /
//! [`provider::TreeSitterFileProvider`] pair that plug that shape into
//! [`pyxref_core::orchestrator::Orchestrator`].

mod builtins;
mod lowering;
mod parser;

pub mod oracle;
pub mod provider;
pub mod tree;

pub use oracle::SyntacticOracle;
pub use provider::TreeSitterFileProvider;
pub use tree::{PyTree, TreeStore};
