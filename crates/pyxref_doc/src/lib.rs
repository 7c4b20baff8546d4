//! The bundled [`pyxref_core::doc::DocExtractor`]: docstrings, synthesized
//! stub signatures, and per-parameter documentation, read off the same
//! `tree-sitter` parse `pyxref_oracle` produces.
//!
//! Built directly on [`pyxref_oracle::TreeStore`] rather than
//! `pyxref_oracle`'s own `Oracle`/`FileProvider` types — doc extraction
//! needs structural shape and source text, not name resolution.

mod params;
mod text;

use std::rc::Rc;

use pyxref_core::doc::{DeclarationDocs, DocExtractor};
use pyxref_core::node_id::NodeId;
use pyxref_core::tree::{ParamView, StmtView, SyntaxTree, TreeIndex};
use pyxref_oracle::{PyTree, TreeStore};

pub struct TreeSitterDocExtractor {
    store: Rc<TreeStore>,
}

impl TreeSitterDocExtractor {
    pub fn new(store: Rc<TreeStore>) -> TreeSitterDocExtractor {
        TreeSitterDocExtractor { store }
    }

    /// A `PyTree` is a thin handle: every `TreeIndex`/`SyntaxTree` method it
    /// implements resolves `node`'s own embedded file index internally, so
    /// the `file_id` passed here is never actually read for the by-`NodeId`
    /// queries below.
    fn tree(&self) -> PyTree {
        PyTree::new(self.store.clone(), 0)
    }

    fn slice(&self, node: NodeId) -> String {
        let source = self.store.source_text_for(node);
        let (start, end) = self.tree().byte_range(node);
        source.get(start as usize..end as usize).unwrap_or_default().to_string()
    }

    fn docstring_of(&self, body: &[NodeId]) -> Option<String> {
        let first = *body.first()?;
        text::string_literal_body(&self.slice(first))
    }

    fn format_param(&self, tree: &PyTree, param: &ParamView) -> String {
        if !param.named {
            return "*".to_string();
        }
        let mut rendered = tree.name(param.name).unwrap_or_default();
        if let Some(annotation) = param.annotation {
            rendered.push_str(": ");
            rendered.push_str(&self.slice(annotation));
        }
        if let Some(default) = param.default {
            rendered.push_str(" = ");
            rendered.push_str(&self.slice(default));
        }
        rendered
    }
}

impl DocExtractor for TreeSitterDocExtractor {
    fn class_docs(&self, class_def: NodeId) -> DeclarationDocs {
        let tree = self.tree();
        let StmtView::ClassDef { bases, body, .. } = tree.stmt_view(class_def) else {
            return DeclarationDocs::default();
        };
        let name = tree.name(class_def).unwrap_or_default();
        let stub = if bases.is_empty() {
            format!("class {name}:")
        } else {
            let bases_text: Vec<String> = bases.iter().map(|base| self.slice(*base)).collect();
            format!("class {name}({}):", bases_text.join(", "))
        };
        DeclarationDocs {
            stub: Some(stub),
            docstring: self.docstring_of(&body),
        }
    }

    fn function_docs(&self, function_def: NodeId) -> DeclarationDocs {
        let tree = self.tree();
        let StmtView::FunctionDef { params, returns, body, .. } = tree.stmt_view(function_def) else {
            return DeclarationDocs::default();
        };
        let name = tree.name(function_def).unwrap_or_default();
        let params_text: Vec<String> = params.iter().map(|param| self.format_param(&tree, param)).collect();
        let mut stub = format!("def {name}({})", params_text.join(", "));
        if let Some(returns) = returns {
            stub.push_str(" -> ");
            stub.push_str(&self.slice(returns));
        }
        stub.push_str(": ...");
        DeclarationDocs {
            stub: Some(stub),
            docstring: self.docstring_of(&body),
        }
    }

    fn parameter_doc(&self, function_def: NodeId, parameter_name: &str) -> Option<String> {
        let docstring = self.function_docs(function_def).docstring?;
        params::parameter_doc(&docstring, parameter_name)
    }

    fn assignment_stub(&self, assign: NodeId, target_name: &str) -> Option<String> {
        let tree = self.tree();
        let value = match tree.stmt_view(assign) {
            StmtView::Assign { value, .. } => value,
            StmtView::AnnAssign { value: Some(value), .. } => value,
            _ => return None,
        };

        const MAX_LEN: usize = 80;
        let mut value_text = self.slice(value).lines().next().unwrap_or_default().to_string();
        if value_text.chars().count() > MAX_LEN {
            value_text = value_text.chars().take(MAX_LEN).collect::<String>();
            value_text.push_str("...");
        }
        Some(format!("```python\n{target_name} = {value_text}\n```"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes `source` to a throwaway file under a fresh temp project root
    /// and parses it through the real `TreeStore`, exercising the same path
    /// production indexing takes rather than hand-building a fake tree.
    fn extractor_for(source: &str) -> (TreeSitterDocExtractor, PyTree, tempfile::TempDir) {
        let project_root = tempfile::tempdir().unwrap();
        let file_path = project_root.path().join("m.py");
        std::fs::write(&file_path, source).unwrap();

        let store = TreeStore::new();
        let file_id = store.ensure_parsed(&file_path, project_root.path()).unwrap();
        let tree = PyTree::new(store.clone(), file_id);
        (TreeSitterDocExtractor::new(store), tree, project_root)
    }

    #[test]
    fn class_stub_and_docstring() {
        let source = "class Greeter(Base):\n    \"\"\"Greets people.\"\"\"\n    pass\n";
        let (extractor, tree, _root) = extractor_for(source);
        let class_def = tree.module_body()[0];
        let docs = extractor.class_docs(class_def);
        assert_eq!(docs.stub.as_deref(), Some("class Greeter(Base):"));
        assert_eq!(docs.docstring.as_deref(), Some("Greets people."));
    }

    #[test]
    fn function_stub_includes_annotations_and_defaults() {
        let source = "def add(a: int, b: int = 1) -> int:\n    \"\"\"Adds.\n\n    :param a: left side\n    \"\"\"\n    return a + b\n";
        let (extractor, tree, _root) = extractor_for(source);
        let function_def = tree.module_body()[0];
        let docs = extractor.function_docs(function_def);
        assert_eq!(docs.stub.as_deref(), Some("def add(a: int, b: int = 1) -> int: ..."));
        assert_eq!(extractor.parameter_doc(function_def, "a"), Some("left side".to_string()));
        assert_eq!(extractor.parameter_doc(function_def, "b"), None);
    }

    #[test]
    fn assignment_stub_renders_short_value() {
        let source = "TIMEOUT = 30\n";
        let (extractor, tree, _root) = extractor_for(source);
        let assign = tree.module_body()[0];
        assert_eq!(
            extractor.assignment_stub(assign, "TIMEOUT").as_deref(),
            Some("```python\nTIMEOUT = 30\n```")
        );
    }
}
