//! The `DocExtractor` trait pulls docstrings, stub-style signatures, and
//! per-parameter documentation out of the tree. No contract beyond
//! "returns possibly-empty strings" — callers never treat an empty result
//! as an error.
//!
//! Kept parser-agnostic like [`crate::tree`]: the extractor is handed the
//! declaration's [`NodeId`] plus the [`crate::tree::SyntaxTree`] it came
//! from, rather than a concrete AST node type. `pyxref_doc` is the bundled
//! implementation, built on the same `tree-sitter` parse `pyxref_oracle`
//! produces.

use crate::node_id::NodeId;

/// Doc material for a class or function declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationDocs {
    /// A fenced-code stub: for classes, the bare `class Name(Bases):` line;
    /// for functions, the synthesized signature.
    pub stub: Option<String>,
    /// The raw docstring body, if the suite's first statement is a string
    /// literal expression statement.
    pub docstring: Option<String>,
}

pub trait DocExtractor {
    fn class_docs(&self, class_def: NodeId) -> DeclarationDocs;

    fn function_docs(&self, function_def: NodeId) -> DeclarationDocs;

    /// The excerpt of `function_def`'s docstring describing `parameter_name`,
    /// recognizing common `:param foo:` and `foo:`-style forms. Empty if
    /// there's no docstring or no matching section.
    fn parameter_doc(&self, function_def: NodeId, parameter_name: &str) -> Option<String>;

    /// A synthetic one-line stub for a top-level assignment, used as the
    /// documentation for module/class-level variable declarations.
    fn assignment_stub(&self, assign: NodeId, target_name: &str) -> Option<String>;
}

/// Extracts nothing. Useful where documentation genuinely isn't available
/// (e.g. indexing a tree with no attached source text).
pub struct NullDocExtractor;

impl DocExtractor for NullDocExtractor {
    fn class_docs(&self, _class_def: NodeId) -> DeclarationDocs {
        DeclarationDocs::default()
    }

    fn function_docs(&self, _function_def: NodeId) -> DeclarationDocs {
        DeclarationDocs::default()
    }

    fn parameter_doc(&self, _function_def: NodeId, _parameter_name: &str) -> Option<String> {
        None
    }

    fn assignment_stub(&self, _assign: NodeId, _target_name: &str) -> Option<String> {
        None
    }
}
