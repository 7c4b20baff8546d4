//! Wraps `pyxref_oracle`'s bundled [`FileProvider`] to apply the `exclude`
//! glob list from config/CLI during discovery. Everything else (parsing,
//! import following) passes straight through — excludes only decide which
//! files get walked, not what an included file's imports can reach.

use std::path::{Path, PathBuf};

use glob::Pattern;
use pyxref_core::orchestrator::FileProvider;

pub struct ExcludingFileProvider<F> {
    inner: F,
    excludes: Vec<Pattern>,
}

impl<F> ExcludingFileProvider<F> {
    pub fn new(inner: F, exclude_patterns: &[String]) -> ExcludingFileProvider<F> {
        let excludes = exclude_patterns
            .iter()
            .filter_map(|pattern| match Pattern::new(pattern) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    log::warn!("ignoring invalid exclude pattern {pattern:?}: {err}");
                    None
                }
            })
            .collect();
        ExcludingFileProvider { inner, excludes }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.excludes.iter().any(|pattern| pattern.matches_path(path))
    }
}

impl<F: FileProvider> FileProvider for ExcludingFileProvider<F> {
    type Tree = F::Tree;

    fn discover_python_files(&self, project_root: &Path) -> std::io::Result<Vec<PathBuf>> {
        let files = self.inner.discover_python_files(project_root)?;
        Ok(files.into_iter().filter(|path| !self.is_excluded(path)).collect())
    }

    fn tree_for(&self, file_path: &Path) -> Option<Self::Tree> {
        self.inner.tree_for(file_path)
    }

    fn source_text(&self, file_path: &Path) -> Option<String> {
        self.inner.source_text(file_path)
    }

    fn imported_files(&self, file_path: &Path) -> Vec<PathBuf> {
        self.inner.imported_files(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyxref_oracle::{PyTree, TreeStore};
    use std::rc::Rc;

    struct FakeInner;

    impl FileProvider for FakeInner {
        type Tree = PyTree;

        fn discover_python_files(&self, _project_root: &Path) -> std::io::Result<Vec<PathBuf>> {
            Ok(vec![
                PathBuf::from("/proj/pkg/mod.py"),
                PathBuf::from("/proj/pkg/tests/test_mod.py"),
            ])
        }

        fn tree_for(&self, _file_path: &Path) -> Option<PyTree> {
            None
        }

        fn source_text(&self, _file_path: &Path) -> Option<String> {
            None
        }

        fn imported_files(&self, _file_path: &Path) -> Vec<PathBuf> {
            Vec::new()
        }
    }

    #[test]
    fn excludes_matching_files() {
        let _store: Rc<TreeStore> = TreeStore::new();
        let provider = ExcludingFileProvider::new(FakeInner, &["**/tests/**".to_string()]);
        let files = provider.discover_python_files(Path::new("/proj")).unwrap();
        assert_eq!(files, vec![PathBuf::from("/proj/pkg/mod.py")]);
    }
}
