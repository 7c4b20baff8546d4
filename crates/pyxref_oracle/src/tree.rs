//! The bundled `SyntaxTree`/`TreeIndex` implementation: a flattened,
//! arena-indexed lowering of a `tree-sitter-python` parse, shared across
//! every tracked file through [`TreeStore`].
//!
//! `tree_sitter::Node` borrows from its `Tree` and offers no O(1) lookup by
//! an arbitrary stored id, so we never hold on to one past the lowering
//! pass in `crate::lowering`: every node we care about is copied out into
//! our own [`NodeRecord`], addressed by a [`pyxref_core::node_id::NodeId`]
//! whose high bits carry a file index and whose low bits index into that
//! file's `Vec<NodeRecord>`. That encoding is what lets a declaration in
//! one file be referenced by id from any other file's walk — the oracle
//! and the tree both resolve through the same `TreeStore`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use pyxref_core::node_id::NodeId;
use pyxref_core::oracle::InferredType;
use pyxref_core::tree::{ExprView, NodeKind, StmtView, SyntaxTree, TreeIndex};

const FILE_SHIFT: u32 = 40;
const LOCAL_MASK: usize = (1 << FILE_SHIFT) - 1;

#[derive(Debug, Clone)]
pub(crate) struct NodeRecord {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) name: Option<String>,
    pub(crate) byte_range: (u32, u32),
    pub(crate) stmt: Option<StmtView>,
    pub(crate) expr: Option<ExprView>,
    /// Set on `ImportAs`/`ImportFromModule`/`ImportFromBinding` nodes: the
    /// dotted module name and its best-known file path.
    pub(crate) import_target: Option<(String, PathBuf)>,
    /// Set only on `ImportFromBinding` nodes: the name as it exists in the
    /// source module, before any `as` aliasing — the name `type_of` must
    /// look up in that module's own declaration table.
    pub(crate) import_remote_name: Option<String>,
}

impl NodeRecord {
    pub(crate) fn leaf(kind: NodeKind, parent: Option<NodeId>, name: Option<String>, range: (u32, u32)) -> NodeRecord {
        NodeRecord {
            kind,
            parent,
            name,
            byte_range: range,
            stmt: None,
            expr: None,
            import_target: None,
            import_remote_name: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct FileEntry {
    pub(crate) file_path: PathBuf,
    pub(crate) module_dotted_name: String,
    pub(crate) source: String,
    pub(crate) records: Vec<NodeRecord>,
    pub(crate) module_body: Vec<NodeId>,
    /// `scope_owner -> (name -> declaring node)`, built during lowering.
    pub(crate) declarations: HashMap<NodeId, HashMap<String, NodeId>>,
}

/// Shared storage for every file tracked during one indexing run. Both
/// [`crate::oracle::SyntacticOracle`] and [`PyTree`] borrow the same
/// `Rc<TreeStore>`, so a declaration discovered while lowering file A is
/// immediately visible to a query against file B's tree.
#[derive(Default)]
pub struct TreeStore {
    files: RefCell<Vec<FileEntry>>,
    index_by_path: RefCell<HashMap<PathBuf, u32>>,
}

impl TreeStore {
    pub fn new() -> Rc<TreeStore> {
        Rc::new(TreeStore::default())
    }

    pub(crate) fn make_id(file_id: u32, local: usize) -> NodeId {
        NodeId(((file_id as usize) << FILE_SHIFT) | local)
    }

    pub(crate) fn file_id_of(node: NodeId) -> u32 {
        (node.0 >> FILE_SHIFT) as u32
    }

    pub(crate) fn local_index(node: NodeId) -> usize {
        node.0 & LOCAL_MASK
    }

    pub fn is_parsed(&self, path: &Path) -> bool {
        self.index_by_path.borrow().contains_key(path)
    }

    /// Drops `path` from the path index so the next `ensure_parsed` call
    /// reparses it into a fresh slot. The old slot (and any `NodeId`s other
    /// files already captured for it) stays allocated; nothing in one run
    /// reuses a freed slot.
    pub fn forget(&self, path: &Path) {
        self.index_by_path.borrow_mut().remove(path);
    }

    /// Parses and lowers `path` if it hasn't been already, returning its
    /// file id either way. `None` only if the file can't be read or parsed.
    pub fn ensure_parsed(&self, path: &Path, project_root: &Path) -> Option<u32> {
        if let Some(&id) = self.index_by_path.borrow().get(path) {
            return Some(id);
        }

        let source = std::fs::read_to_string(path).ok()?;
        let mut parser = crate::parser::PythonParser::new().ok()?;
        let ts_tree = parser.parse(&source)?;
        let module_dotted = crate::lowering::dotted_name_for(path, project_root);

        let mut files = self.files.borrow_mut();
        let file_id = files.len() as u32;
        drop(files);

        let entry = crate::lowering::lower(
            file_id,
            path.to_path_buf(),
            module_dotted,
            project_root,
            &source,
            &ts_tree,
        );

        let mut files = self.files.borrow_mut();
        files.push(entry);
        drop(files);

        self.index_by_path.borrow_mut().insert(path.to_path_buf(), file_id);
        Some(file_id)
    }

    pub fn source_text(&self, file_id: u32) -> Option<String> {
        self.files.borrow().get(file_id as usize).map(|f| f.source.clone())
    }

    /// Full source text of whatever file `node` belongs to. Lets a consumer
    /// that only has a [`NodeId`] (e.g. `pyxref_doc`'s extractor) slice out
    /// a node's own text via [`TreeIndex::byte_range`]/[`SyntaxTree::byte_range`]
    /// without needing to unpack the file index itself.
    pub fn source_text_for(&self, node: NodeId) -> String {
        self.source_text(Self::file_id_of(node)).unwrap_or_default()
    }

    pub fn import_target_paths(&self, file_id: u32) -> Vec<PathBuf> {
        let files = self.files.borrow();
        let Some(file) = files.get(file_id as usize) else {
            return Vec::new();
        };
        let mut seen = std::collections::HashSet::new();
        file.records
            .iter()
            .filter_map(|rec| rec.import_target.as_ref())
            .map(|(_, path)| path.clone())
            .filter(|path| seen.insert(path.clone()))
            .collect()
    }

    pub(crate) fn kind(&self, node: NodeId) -> NodeKind {
        self.files.borrow()[Self::file_id_of(node) as usize].records[Self::local_index(node)].kind
    }

    pub(crate) fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.files.borrow()[Self::file_id_of(node) as usize].records[Self::local_index(node)].parent
    }

    pub(crate) fn name(&self, node: NodeId) -> Option<String> {
        self.files.borrow()[Self::file_id_of(node) as usize].records[Self::local_index(node)]
            .name
            .clone()
    }

    pub(crate) fn module_dotted_name(&self, module_node: NodeId) -> String {
        self.files.borrow()[Self::file_id_of(module_node) as usize]
            .module_dotted_name
            .clone()
    }

    pub(crate) fn file_path(&self, module_node: NodeId) -> PathBuf {
        self.files.borrow()[Self::file_id_of(module_node) as usize]
            .file_path
            .clone()
    }

    pub(crate) fn import_target(&self, node: NodeId) -> (String, PathBuf) {
        self.files.borrow()[Self::file_id_of(node) as usize].records[Self::local_index(node)]
            .import_target
            .clone()
            .unwrap_or_default()
    }

    pub(crate) fn module_body(&self, file_id: u32) -> Vec<NodeId> {
        self.files.borrow()[file_id as usize].module_body.clone()
    }

    pub(crate) fn stmt_view(&self, node: NodeId) -> StmtView {
        self.files.borrow()[Self::file_id_of(node) as usize].records[Self::local_index(node)]
            .stmt
            .clone()
            .unwrap_or(StmtView::Other)
    }

    pub(crate) fn expr_view(&self, node: NodeId) -> ExprView {
        self.files.borrow()[Self::file_id_of(node) as usize].records[Self::local_index(node)]
            .expr
            .clone()
            .unwrap_or(ExprView::Leaf)
    }

    pub(crate) fn byte_range(&self, node: NodeId) -> (u32, u32) {
        self.files.borrow()[Self::file_id_of(node) as usize].records[Self::local_index(node)].byte_range
    }

    /// Looks up `name` in the declaration table owned directly by `scope`,
    /// without walking further up the chain — the chain walk itself lives
    /// in `SyntacticOracle::declarations_of`, which is the only caller that
    /// needs the class-scope-skip rule.
    pub(crate) fn lookup_declaration(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        self.files.borrow()[Self::file_id_of(scope) as usize]
            .declarations
            .get(&scope)?
            .get(name)
            .copied()
    }

    /// Cross-file resolution for `from M import X`: only resolves when `M`
    /// is itself a file this store has parsed (a project-local import);
    /// stdlib/third-party targets fall through to `None`, matching the
    /// no-type-inference contract for anything outside the tracked set.
    pub(crate) fn type_of(&self, node: NodeId) -> Option<InferredType> {
        let files = self.files.borrow();
        let rec = &files[Self::file_id_of(node) as usize].records[Self::local_index(node)];
        if rec.kind != NodeKind::ImportFromBinding {
            return None;
        }
        let (_, target_path) = rec.import_target.as_ref()?;
        let remote_name = rec.import_remote_name.as_ref()?;

        let target_file_id = *self.index_by_path.borrow().get(target_path)?;
        let target_file = files.get(target_file_id as usize)?;
        let module_owner = Self::make_id(target_file_id, 0);
        let declared = *target_file.declarations.get(&module_owner)?.get(remote_name)?;
        let declared_rec = &target_file.records[Self::local_index(declared)];

        match declared_rec.kind {
            NodeKind::Function => Some(InferredType::Function(declared)),
            NodeKind::Class => Some(InferredType::Class {
                module_name: target_file.module_dotted_name.clone(),
                name: declared_rec.name.clone().unwrap_or_default(),
            }),
            _ => Some(InferredType::Unrecognized),
        }
    }
}

/// A handle into one file's slice of a [`TreeStore`]. Cheap to clone —
/// just an `Rc` bump and a file index — which is what lets
/// `FileProvider::tree_for` hand back a fresh owned value on every call.
#[derive(Clone)]
pub struct PyTree {
    store: Rc<TreeStore>,
    file_id: u32,
}

impl PyTree {
    pub fn new(store: Rc<TreeStore>, file_id: u32) -> PyTree {
        PyTree { store, file_id }
    }
}

impl TreeIndex for PyTree {
    fn kind(&self, node: NodeId) -> NodeKind {
        self.store.kind(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.store.parent(node)
    }

    fn name(&self, node: NodeId) -> Option<String> {
        self.store.name(node)
    }

    fn owning_module(&self, node: NodeId) -> NodeId {
        if self.store.kind(node) == NodeKind::Module {
            return node;
        }
        TreeStore::make_id(TreeStore::file_id_of(node), 0)
    }

    fn module_dotted_name(&self, module_node: NodeId) -> String {
        self.store.module_dotted_name(module_node)
    }

    fn file_path(&self, module_node: NodeId) -> PathBuf {
        self.store.file_path(module_node)
    }

    fn import_target(&self, node: NodeId) -> (String, PathBuf) {
        self.store.import_target(node)
    }
}

impl SyntaxTree for PyTree {
    fn module_node(&self) -> NodeId {
        TreeStore::make_id(self.file_id, 0)
    }

    fn module_body(&self) -> Vec<NodeId> {
        self.store.module_body(self.file_id)
    }

    fn stmt_view(&self, node: NodeId) -> StmtView {
        self.store.stmt_view(node)
    }

    fn expr_view(&self, node: NodeId) -> ExprView {
        self.store.expr_view(node)
    }

    fn byte_range(&self, node: NodeId) -> (u32, u32) {
        self.store.byte_range(node)
    }
}
