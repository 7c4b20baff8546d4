//! Drives one indexing run end to end: discovers project files, pumps the
//! oracle to a fixpoint, walks each file, and flushes the resulting
//! `Document`s (plus one final `Metadata` record) to a [`DocumentSink`].
//!
//! The double pump — fixpoint before the loop, then again after pulling in
//! each file's transitive imports, then again after marking the file dirty
//! — exists because the oracle resolves imports lazily. Walking a file
//! before its imports have settled would read stale declarations from
//! `oracle.type_of`.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::doc::DocExtractor;
use crate::error::{IndexError, Result};
use crate::local::LocalCounter;
use crate::model::{Metadata, PackageInfo, ToolInfo};
use crate::oracle::Oracle;
use crate::package::{PackageDiscovery, PackageResolver};
use crate::sink::DocumentSink;
use crate::symbol_computer::SymbolComputer;
use crate::tree::{SyntaxTree, TreeIndex};
use crate::walker::TreeWalker;

/// Supplies the syntax trees the walker consumes and the file-discovery/
/// import-following queries the orchestrator needs to decide what to track.
/// This is the seam that keeps the core parser-agnostic: `pyxref_oracle`
/// is the bundled implementation, built on `tree-sitter-python`.
pub trait FileProvider {
    type Tree: SyntaxTree;

    /// Every `*.py` file below `project_root`, in a stable order.
    fn discover_python_files(&self, project_root: &Path) -> std::io::Result<Vec<PathBuf>>;

    /// The parsed tree for `file_path`, or `None` if it can't be read or
    /// parsed (an unreadable-source-file condition, recovered by skipping
    /// the file).
    fn tree_for(&self, file_path: &Path) -> Option<Self::Tree>;

    /// The raw source text backing `tree_for(file_path)`, for line-index
    /// construction. Empty if unavailable.
    fn source_text(&self, file_path: &Path) -> Option<String>;

    /// Files this file imports, resolved to absolute paths where possible.
    /// Used to pull newly-discovered files into the oracle's tracked set
    /// before the fixpoint that precedes walking.
    fn imported_files(&self, file_path: &Path) -> Vec<PathBuf>;
}

pub struct OrchestratorConfig {
    pub project_root: PathBuf,
    pub project_name: String,
    pub project_version: String,
    pub workspace_root: PathBuf,
}

pub struct Orchestrator<O, F, D, X, S> {
    config: OrchestratorConfig,
    oracle: O,
    files: F,
    resolver: PackageResolver<D>,
    docs: X,
    sink: S,
}

impl<O, F, D, X, S> Orchestrator<O, F, D, X, S>
where
    O: Oracle,
    F: FileProvider,
    D: PackageDiscovery,
    X: DocExtractor,
    S: DocumentSink,
{
    pub fn new(
        config: OrchestratorConfig,
        oracle: O,
        files: F,
        discovery: D,
        docs: X,
        sink: S,
        stdlib_root: Option<PathBuf>,
        stdlib_version: impl Into<String>,
    ) -> Orchestrator<O, F, D, X, S> {
        let project = PackageInfo::project(config.project_name.clone(), config.project_version.clone());
        let stdlib = PackageInfo::stdlib(stdlib_version);
        let resolver = PackageResolver::new(
            config.project_root.clone(),
            stdlib_root,
            project,
            stdlib,
            discovery,
        );
        Orchestrator {
            config,
            oracle,
            files,
            resolver,
            docs,
            sink,
        }
    }

    /// Runs the full indexing pass. `should_cancel` is polled once between
    /// files; a `true` reading stops the walk after the current file, with
    /// every `Document` already written left internally consistent.
    pub fn run(self, should_cancel: impl FnMut() -> bool) -> Result<()> {
        self.run_impl(should_cancel)
    }

    fn run_impl(mut self, mut should_cancel: impl FnMut() -> bool) -> Result<()> {
        let py_files = self
            .files
            .discover_python_files(&self.config.project_root)
            .map_err(|_| IndexError::UnreadableProjectRoot(self.config.project_root.clone()))?;

        if py_files.is_empty() {
            return Err(IndexError::NoPythonFiles(self.config.project_root.clone()));
        }

        for file in &py_files {
            self.oracle.track_file(file, true, false);
        }
        while self.oracle.make_progress() {}

        let mut tracked: HashSet<PathBuf> = py_files.iter().cloned().collect();

        for file in &py_files {
            if should_cancel() {
                log::debug!("cancellation observed before {}", file.display());
                break;
            }

            if !file.starts_with(&self.config.project_root) {
                continue;
            }

            self.pull_imports_to_fixpoint(file, &mut tracked);

            self.oracle.mark_dirty(file);
            while self.oracle.make_progress() {}

            self.walk_one_file(file)?;
        }

        let metadata = Metadata::new(
            format!("file://{}", self.config.project_root.display()),
            ToolInfo {
                name: "pyxref".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                arguments: std::env::args().collect(),
            },
        );
        self.sink.write_metadata(metadata)?;
        Ok(())
    }

    fn pull_imports_to_fixpoint(&mut self, file: &Path, tracked: &mut HashSet<PathBuf>) {
        let mut frontier = vec![file.to_path_buf()];
        let mut discovered_new = false;

        while let Some(current) = frontier.pop() {
            for imported in self.files.imported_files(&current) {
                if tracked.insert(imported.clone()) {
                    self.oracle.track_file(&imported, true, false);
                    frontier.push(imported);
                    discovered_new = true;
                }
            }
        }

        if discovered_new {
            while self.oracle.make_progress() {}
        }
    }

    fn walk_one_file(&mut self, file: &Path) -> Result<()> {
        let Some(tree) = self.files.tree_for(file) else {
            log::warn!("skipping unreadable source file {}", file.display());
            return Ok(());
        };
        let source = self.files.source_text(file).unwrap_or_default();
        let relative = file
            .strip_prefix(&self.config.project_root)
            .unwrap_or(file)
            .to_string_lossy()
            .into_owned();

        let locals = RefCell::new(LocalCounter::new());
        let symbols = SymbolComputer::new(
            &tree,
            &self.resolver,
            &locals,
            self.config.project_version.is_empty(),
        );

        let module_dotted = tree.module_dotted_name(tree.module_node());
        let walker = TreeWalker::new(&self.oracle, &tree, symbols, &self.docs, &source, relative);

        match walker.walk_module(true, &module_dotted) {
            Ok(document) => self.sink.write_document(document),
            Err(_unbalanced) => {
                log::warn!(
                    "unbalanced scope stack walking {}; aborting this file",
                    file.display()
                );
                Ok(())
            }
        }
    }
}
