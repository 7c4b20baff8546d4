//! The read-only syntax tree the walker consumes.
//!
//! Two traits split the narrow interface the rest of the crate needs:
//! [`TreeIndex`] answers the parent-chain questions [`crate::symbol_computer::SymbolComputer`]
//! asks of an arbitrary node, and [`SyntaxTree`] additionally exposes enough
//! shape for [`crate::walker::TreeWalker`] to drive its own traversal without
//! being compiled against any particular parser's AST types. `pyxref_oracle`
//! is the bundled adapter implementing both on top of `tree-sitter` /
//! `tree-sitter-python`; nothing in this crate assumes that's the only
//! possible source tree — a consumer could plug in any parser by
//! implementing these two traits over its own node representation.

use crate::node_id::NodeId;
use std::path::PathBuf;

/// The node-kind vocabulary `SymbolComputer` and
/// `TreeWalker` dispatch on.
///
/// Several syntactic forms the original tree distinguishes (`With`, `If`,
/// `For`, statement lists, tuple targets, the three comprehension-clause
/// kinds, call arguments, binary operations) are symbol-transparent: every
/// one of them resolves to `symbol_for(parent)` with no descriptor of its
/// own. We collapse all of them into [`NodeKind::Transparent`] rather than
/// carrying a node-kind variant with no behavioral difference — see
/// `DESIGN.md`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    Class,
    Function,
    /// A comprehension clause's bound name. Dispatches straight to a fresh
    /// local in `SymbolComputer`, the same way `Decorator`/`Lambda` do,
    /// rather than through the enclosing-scope walk `Name` uses — a
    /// comprehension's target is local regardless of what scope the
    /// comprehension itself sits in, while everything else inside it
    /// (the element, the iterable, the conditions) resolves normally.
    ComprehensionTarget,
    Parameter { named: bool },
    /// A bare identifier occurrence: the primary subject of the Name rule
    /// in Includes both `Name` expression nodes and the
    /// `.attr` identifier of an attribute access.
    Name,
    /// A single-name assignment target.
    Assignment,
    /// A class-body annotation-only statement (`x: int`, no value).
    TypeAnnotation,
    /// One dotted part of an `import A.B as C` header.
    ImportAs,
    /// The module name `M` in `from M import ...`.
    ImportFromModule,
    /// One bound name in `from M import X [as Y]`.
    ImportFromBinding,
    Decorator,
    Lambda,
    /// A suite (statement block) owned by a Module/Class/Function/Lambda.
    Suite,
    /// Everything else: symbol-transparent containers (see above).
    Transparent,
}

pub trait TreeIndex {
    fn kind(&self, node: NodeId) -> NodeKind;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// The node's own name, when it has one (class/function/parameter name,
    /// assignment target identifier, bare Name text, import binding name).
    fn name(&self, node: NodeId) -> Option<String>;

    /// The nearest Module ancestor (or `node` itself, if it is one).
    fn owning_module(&self, node: NodeId) -> NodeId;

    fn module_dotted_name(&self, module_node: NodeId) -> String;

    fn file_path(&self, module_node: NodeId) -> PathBuf;

    /// For an `ImportAs` node: the dotted module name actually being bound,
    /// and its best-known file path (a non-project, non-stdlib placeholder
    /// path when the target module could not be located on disk — enough
    /// for `PackageResolver`'s rules, which only ever inspect a module
    /// outside the project root by name).
    fn import_target(&self, node: NodeId) -> (String, PathBuf);
}

/// A flattened function/lambda parameter, in source order (positional-only,
/// positional, `*args`, keyword-only, `**kwargs`).
#[derive(Debug, Clone, Copy)]
pub struct ParamView {
    pub name: NodeId,
    pub annotation: Option<NodeId>,
    pub default: Option<NodeId>,
    /// `false` for the bare `*` separator, which has no name of its own and
    /// therefore no symbol").
    pub named: bool,
}

#[derive(Debug, Clone)]
pub struct ImportAlias {
    /// The node carrying the dotted module path text (`NodeKind::ImportAs`).
    pub dotted_name: NodeId,
    pub asname: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ImportFromAlias {
    pub name: NodeId,
    pub asname: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub enum StmtView {
    ClassDef {
        name: NodeId,
        bases: Vec<NodeId>,
        decorators: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    FunctionDef {
        name: NodeId,
        decorators: Vec<NodeId>,
        params: Vec<ParamView>,
        returns: Option<NodeId>,
        body: Vec<NodeId>,
    },
    Assign {
        targets: Vec<NodeId>,
        value: NodeId,
    },
    AnnAssign {
        target: NodeId,
        annotation: NodeId,
        value: Option<NodeId>,
    },
    AugAssign {
        target: NodeId,
        value: NodeId,
    },
    Import {
        aliases: Vec<ImportAlias>,
    },
    ImportFrom {
        module: Option<NodeId>,
        level: u32,
        aliases: Vec<ImportFromAlias>,
    },
    Expr(NodeId),
    /// Any statement whose only job is to carry nested expressions and
    /// nested statement lists — `if`/`while`/`for`/`with`/`try`, `return`,
    /// `assert`, `raise`, `delete` — none of which contribute a descriptor
    /// of their own. `exprs` holds
    /// every immediate sub-expression in source order; `bodies` holds every
    /// nested suite in source order.
    Nested {
        exprs: Vec<NodeId>,
        bodies: Vec<Vec<NodeId>>,
    },
    /// `pass`/`break`/`continue`/`global`/`nonlocal`/match statements and
    /// anything else the indexer assigns no occurrences to.
    Other,
}

#[derive(Debug, Clone)]
pub struct ComprehensionClause {
    /// A `NodeKind::ComprehensionTarget` node (see that variant's doc).
    pub target: NodeId,
    pub iter: NodeId,
    pub ifs: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub enum ExprView {
    Name(NodeId),
    Attribute {
        value: NodeId,
        attr: NodeId,
    },
    Lambda {
        params: Vec<ParamView>,
        body: NodeId,
    },
    Comprehension {
        /// The produced element(s): one for list/set/generator, two
        /// (key, value) for a dict comprehension.
        element: Vec<NodeId>,
        clauses: Vec<ComprehensionClause>,
    },
    /// Anything else that only matters as a container of sub-expressions to
    /// recurse into (calls, operators, literals' interpolations, etc.) —
    /// every child here is itself an expression.
    Generic(Vec<NodeId>),
    /// A leaf with no identifier occurrences of its own (string/number/
    /// boolean/None/ellipsis literals).
    Leaf,
}

/// Extends [`TreeIndex`] with enough shape for [`crate::walker::TreeWalker`]
/// to drive a full pre-order traversal without depending on any concrete
/// parser's AST enum.
pub trait SyntaxTree: TreeIndex {
    /// The root `Module` node this tree was parsed into. One `SyntaxTree`
    /// instance always covers exactly one file.
    fn module_node(&self) -> NodeId;

    /// Top-level statements of the module, in source order.
    fn module_body(&self) -> Vec<NodeId>;

    fn stmt_view(&self, node: NodeId) -> StmtView;

    fn expr_view(&self, node: NodeId) -> ExprView;

    /// Byte-offset range `[start, end)` of `node`'s own text, for occurrence
    /// emission.
    fn byte_range(&self, node: NodeId) -> (u32, u32);
}
