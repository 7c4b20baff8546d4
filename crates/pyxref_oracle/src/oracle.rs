//! The bundled, syntax-only [`Oracle`] implementation: no type inference,
//! just lexical scope resolution over the flattened tree in [`TreeStore`].
//!
//! Declarations resolve by walking a node's scope-owner chain outward
//! (`TreeStore::parent` already skips the statement wrappers in between —
//! see `crate::tree`), consulting each layer's declaration table in turn,
//! with one deliberate exception: an enclosing class body is only visible
//! from code written directly inside it, never from a nested function or a
//! nested class, matching how Python's own name resolution treats class
//! scopes. `is_first_hop` below is that rule.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use pyxref_core::model::{DeclarationKind, DeclarationRef};
use pyxref_core::node_id::NodeId;
use pyxref_core::oracle::{BuiltinType, InferredType, Oracle};
use pyxref_core::tree::{NodeKind, TreeIndex};

use crate::tree::{PyTree, TreeStore};

pub struct SyntacticOracle {
    store: Rc<TreeStore>,
    project_root: PathBuf,
    pending: VecDeque<PathBuf>,
    queued: HashSet<PathBuf>,
}

impl SyntacticOracle {
    pub fn new(store: Rc<TreeStore>, project_root: PathBuf) -> SyntacticOracle {
        SyntacticOracle {
            store,
            project_root,
            pending: VecDeque::new(),
            queued: HashSet::new(),
        }
    }

    fn queue(&mut self, path: &Path) {
        if self.store.is_parsed(path) || self.queued.contains(path) {
            return;
        }
        self.queued.insert(path.to_path_buf());
        self.pending.push_back(path.to_path_buf());
    }

    fn declaration_ref(&self, node: NodeId) -> DeclarationRef {
        let tree = PyTree::new(self.store.clone(), TreeStore::file_id_of(node));
        let module = tree.owning_module(node);
        let kind = match tree.kind(node) {
            NodeKind::Module => DeclarationKind::Module,
            NodeKind::Class => DeclarationKind::Class,
            NodeKind::Function => DeclarationKind::Function,
            NodeKind::Parameter { .. } => DeclarationKind::Parameter,
            NodeKind::Assignment => DeclarationKind::Assignment,
            NodeKind::ImportAs => DeclarationKind::Import,
            NodeKind::ImportFromBinding => DeclarationKind::ImportFrom,
            _ => DeclarationKind::Name,
        };
        DeclarationRef {
            node,
            kind,
            module_name: tree.module_dotted_name(module),
            file_path: tree.file_path(module),
            is_alias: matches!(kind, DeclarationKind::Import | DeclarationKind::ImportFrom),
            is_intrinsic: false,
        }
    }
}

impl Oracle for SyntacticOracle {
    fn declarations_of(&self, name_node: NodeId) -> Vec<DeclarationRef> {
        let Some(name) = self.store.name(name_node) else {
            return Vec::new();
        };
        let mut scope = self.store.parent(name_node);
        let mut first = true;
        while let Some(current) = scope {
            let consult = self.store.kind(current) != NodeKind::Class || first;
            if consult {
                if let Some(found) = self.store.lookup_declaration(current, &name) {
                    return vec![self.declaration_ref(found)];
                }
            }
            first = false;
            scope = self.store.parent(current);
        }
        Vec::new()
    }

    fn type_of(&self, expr_node: NodeId) -> Option<InferredType> {
        self.store.type_of(expr_node)
    }

    fn builtin_type(&self, _name_node: NodeId, text: &str) -> Option<BuiltinType> {
        crate::builtins::lookup(text)
    }

    fn builtin_doc(&self, text: &str) -> Vec<String> {
        crate::builtins::docstring(text)
    }

    fn is_intrinsic(&self, decl: &DeclarationRef) -> bool {
        decl.is_intrinsic
    }

    fn is_alias(&self, decl: &DeclarationRef) -> bool {
        decl.is_alias
    }

    fn make_progress(&mut self) -> bool {
        let Some(path) = self.pending.pop_front() else {
            return false;
        };
        self.queued.remove(&path);
        if self.store.ensure_parsed(&path, &self.project_root).is_none() {
            log::warn!("oracle could not parse {}", path.display());
            return true;
        }

        let file_id = match self.store.ensure_parsed(&path, &self.project_root) {
            Some(id) => id,
            None => return true,
        };
        for target in self.store.import_target_paths(file_id) {
            self.queue(&target);
        }
        true
    }

    fn mark_dirty(&mut self, file_path: &Path) {
        self.store.forget(file_path);
        self.queue(file_path);
    }

    fn track_file(&mut self, file_path: &Path, is_tracked: bool, _is_opened: bool) {
        if is_tracked {
            self.queue(file_path);
        }
    }
}
