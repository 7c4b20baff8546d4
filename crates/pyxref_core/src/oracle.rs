//! The name-resolution oracle interface consumed by the walker. This is the "external collaborator" boundary: the core never
//! re-implements Python semantics, it only asks this trait questions and
//! reacts to the answers.
//!
//! `pyxref_oracle::SyntacticOracle` is the bundled default implementation.
//! Nothing in this crate assumes that's the only one — a consumer with a
//! real type evaluator (e.g. a pyright-backed oracle) can implement this
//! trait directly and drive the same walker.

use std::path::Path;

use crate::model::DeclarationRef;
use crate::node_id::NodeId;

/// What the oracle infers for an expression, reduced to the shapes
/// `type_to_symbol` actually distinguishes.
#[derive(Debug, Clone)]
pub enum InferredType {
    Function(NodeId),
    /// `node` is the class's own declaration site — resolving its symbol is
    /// then an ordinary (possibly cross-file) `symbol_for(node)` call, the
    /// same way `Function` resolves.
    Class {
        node: NodeId,
        module_name: String,
        name: String,
    },
    Module { module_name: String },
    /// TypeVar, or anything else the oracle can't usefully name.
    Unrecognized,
}

/// A builtin's own type, as far as the walker cares: just whether it's
/// callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinType {
    Callable,
    NonCallable,
}

pub trait Oracle {
    /// Declarations of the name at `name_node`, most-recently-bound first.
    /// Empty if the oracle has no idea.
    fn declarations_of(&self, name_node: NodeId) -> Vec<DeclarationRef>;

    /// The inferred type of an expression node, if the oracle has one.
    fn type_of(&self, expr_node: NodeId) -> Option<InferredType>;

    /// Whether an unresolved name matches a language builtin, and if so,
    /// whether that builtin is callable.
    fn builtin_type(&self, name_node: NodeId, text: &str) -> Option<BuiltinType>;

    /// Documentation for a builtin's `SymbolInformation`, keyed by the same
    /// `text` passed to `builtin_type`. Empty if the oracle has none.
    fn builtin_doc(&self, text: &str) -> Vec<String>;

    fn is_intrinsic(&self, decl: &DeclarationRef) -> bool;

    fn is_alias(&self, decl: &DeclarationRef) -> bool;

    /// Advances lazy analysis one step. Returns `false` at a fixpoint.
    fn make_progress(&mut self) -> bool;

    fn mark_dirty(&mut self, file_path: &Path);

    fn track_file(&mut self, file_path: &Path, is_tracked: bool, is_opened: bool);
}
