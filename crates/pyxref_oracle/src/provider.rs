//! The bundled [`FileProvider`]: discovers `*.py` files with `walkdir` and
//! hands back [`PyTree`] handles backed by the same [`TreeStore`] the
//! [`crate::oracle::SyntacticOracle`] uses, so a file parsed once for import
//! discovery is never reparsed for the walk.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use pyxref_core::orchestrator::FileProvider;

use crate::tree::{PyTree, TreeStore};

pub struct TreeSitterFileProvider {
    store: Rc<TreeStore>,
    project_root: PathBuf,
}

impl TreeSitterFileProvider {
    pub fn new(store: Rc<TreeStore>, project_root: PathBuf) -> TreeSitterFileProvider {
        TreeSitterFileProvider { store, project_root }
    }
}

impl FileProvider for TreeSitterFileProvider {
    type Tree = PyTree;

    fn discover_python_files(&self, project_root: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(project_root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "py"))
            .collect();
        files.sort();
        Ok(files)
    }

    fn tree_for(&self, file_path: &Path) -> Option<PyTree> {
        let file_id = self.store.ensure_parsed(file_path, &self.project_root)?;
        Some(PyTree::new(self.store.clone(), file_id))
    }

    fn source_text(&self, file_path: &Path) -> Option<String> {
        let file_id = self.store.ensure_parsed(file_path, &self.project_root)?;
        self.store.source_text(file_id)
    }

    fn imported_files(&self, file_path: &Path) -> Vec<PathBuf> {
        let Some(file_id) = self.store.ensure_parsed(file_path, &self.project_root) else {
            return Vec::new();
        };
        self.store.import_target_paths(file_id)
    }
}
