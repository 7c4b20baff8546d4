//! A thin wrapper around `tree_sitter::Parser` configured for Python.
//!
//! One `PythonParser` is built per file parse; `tree_sitter::Parser` is not
//! `Sync` and reuse buys nothing the allocator doesn't already give back.

use anyhow::{Context, Result};

pub struct PythonParser {
    inner: tree_sitter::Parser,
}

impl PythonParser {
    pub fn new() -> Result<PythonParser> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .context("failed to load the tree-sitter-python grammar")?;
        Ok(PythonParser { inner })
    }

    /// Parses `source` fresh (no incremental reuse of a previous tree — we
    /// never edit a tree in place, only reparse from disk on `mark_dirty`).
    pub fn parse(&mut self, source: &str) -> Option<tree_sitter::Tree> {
        self.inner.parse(source, None)
    }
}
