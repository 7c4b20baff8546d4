//! The semantic symbol resolver and occurrence emitter at the center of
//! the cross-reference indexer: a syntax-tree walker that consults a
//! name-resolution oracle, computes canonical [`model::Symbol`] strings,
//! and emits `Document`s of occurrence and symbol-information records.
//!
//! Everything else — the Python parser, the oracle's own type inference,
//! package discovery, CLI, configuration, and on-disk serialization — is
//! an external collaborator, consumed here only through the narrow trait
//! boundaries in [`oracle`], [`tree`], [`package`] and [`sink`].

pub mod doc;
pub mod emitter;
pub mod error;
pub mod line_index;
pub mod local;
pub mod model;
pub mod node_id;
pub mod oracle;
pub mod orchestrator;
pub mod package;
pub mod sink;
pub mod symbol_computer;
pub mod tree;
pub mod walker;

pub use error::{IndexError, Result};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
