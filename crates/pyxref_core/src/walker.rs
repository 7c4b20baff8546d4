//! The depth-first pre-order visitor that drives everything
//! else — `SymbolComputer`, `OccurrenceEmitter`, the `Oracle`, and
//! `DocExtractor` — over one file's tree.
//!
//! Written against [`crate::tree::TreeIndex`]/[`crate::tree::SyntaxTree`]
//! rather than any concrete parser's AST enum: parsing stays outside the
//! core's scope, so this module only ever asks the tree for a
//! [`NodeId`]'s shape, never matches on parser node types
//! directly. `pyxref_oracle` is the bundled adapter that builds a
//! `SyntaxTree` over `tree-sitter-python`; any other parser can drive the
//! same walker by implementing the same two traits.

use std::collections::HashSet;

use crate::doc::DocExtractor;
use crate::emitter::OccurrenceEmitter;
use crate::line_index::LineIndex;
use crate::model::{Document, Roles, Symbol};
use crate::node_id::NodeId;
use crate::oracle::{BuiltinType, InferredType, Oracle};
use crate::package::PackageDiscovery;
use crate::symbol_computer::SymbolComputer;
use crate::tree::{ComprehensionClause, ExprView, ParamView, StmtView, SyntaxTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeFrame {
    Class,
    Function,
}

/// Thrown only by the balance check in [`TreeWalker::walk_module`]; never by
/// node-kind dispatch itself.
#[derive(Debug)]
pub struct UnbalancedScopeStack;

pub struct TreeWalker<'a, O, T, D, X> {
    oracle: &'a O,
    tree: &'a T,
    symbols: SymbolComputer<'a, T, D>,
    docs: &'a X,
    line_index: LineIndex,
    document: Document,
    scope_stack: Vec<ScopeFrame>,
    class_depth: u32,
    function_depth: u32,
    /// Node-ids of `ImportFrom` binding sites, consulted by the Name rule's
    /// step 5.
    import_bindings: HashSet<NodeId>,
    /// Builtin names already given a `SymbolInformation` record in this
    /// file — step 2 emits at most one per name per file.
    emitted_builtins: HashSet<String>,
}

impl<'a, O, T, D, X> TreeWalker<'a, O, T, D, X>
where
    O: Oracle,
    T: SyntaxTree,
    D: PackageDiscovery,
    X: DocExtractor,
{
    pub fn new(
        oracle: &'a O,
        tree: &'a T,
        symbols: SymbolComputer<'a, T, D>,
        docs: &'a X,
        source: &str,
        relative_path: impl Into<String>,
    ) -> TreeWalker<'a, O, T, D, X> {
        TreeWalker {
            oracle,
            tree,
            symbols,
            docs,
            line_index: LineIndex::new(source),
            document: Document::new(relative_path),
            scope_stack: Vec::new(),
            class_depth: 0,
            function_depth: 0,
            import_bindings: HashSet::default(),
            emitted_builtins: HashSet::default(),
        }
    }

    /// Drives the whole module, consuming `self` and returning the completed
    /// Document — or `UnbalancedScopeStack` if a push/pop pair failed to
    /// balance. That is a programming error and is fatal for this file:
    /// the caller should abort walking it and move to the next.
    pub fn walk_module(
        mut self,
        is_project_package: bool,
        module_dotted_name: &str,
    ) -> Result<Document, UnbalancedScopeStack> {
        if is_project_package {
            let module_node = self.tree.module_node();
            let module_symbol = self.symbols.module_init_symbol(module_node);
            self.emit_range(0, 1, module_symbol.clone(), Roles::DEFINITION);
            self.emit_symbol_info(
                module_symbol,
                vec![format!("(module) {module_dotted_name}")],
            );
        }

        self.walk_body(&self.tree.module_body());

        if self.scope_stack.is_empty() && self.class_depth == 0 && self.function_depth == 0 {
            Ok(self.document)
        } else {
            Err(UnbalancedScopeStack)
        }
    }

    fn walk_body(&mut self, body: &[NodeId]) {
        for &stmt in body {
            self.walk_stmt(stmt);
        }
    }

    fn walk_stmt(&mut self, stmt: NodeId) {
        match self.tree.stmt_view(stmt) {
            StmtView::ClassDef {
                name,
                bases,
                decorators,
                body,
            } => self.walk_class(stmt, name, &bases, &decorators, &body),

            StmtView::FunctionDef {
                name,
                decorators,
                params,
                returns,
                body,
            } => self.walk_function(stmt, name, &decorators, &params, returns, &body),

            StmtView::Assign { targets, value } => self.walk_assign(stmt, &targets, value),

            StmtView::AnnAssign {
                target,
                annotation,
                value,
            } => self.walk_ann_assign(target, annotation, value),

            StmtView::AugAssign { target, value } => {
                self.walk_expr(target);
                self.walk_expr(value);
            }

            StmtView::Import { aliases } => self.walk_import(&aliases),

            StmtView::ImportFrom {
                module,
                level: _,
                aliases,
            } => self.walk_import_from(module, &aliases),

            StmtView::Expr(expr) => self.walk_expr(expr),

            StmtView::Nested { exprs, bodies } => {
                for expr in exprs {
                    self.walk_expr(expr);
                }
                for body in &bodies {
                    self.walk_body(body);
                }
            }

            // pass/break/continue/global/nonlocal/match and anything else
            // the indexer assigns no occurrences to.
            StmtView::Other => {}
        }
    }

    fn walk_class(
        &mut self,
        class_def: NodeId,
        name: NodeId,
        bases: &[NodeId],
        decorators: &[NodeId],
        body: &[NodeId],
    ) {
        let class_symbol = self.symbols.symbol_for(name);
        let docs = self.docs.class_docs(class_def);
        self.emit_symbol_info(class_symbol, doc_lines(&docs));

        self.scope_stack.push(ScopeFrame::Class);
        self.class_depth += 1;

        for decorator in decorators {
            self.walk_expr(*decorator);
        }
        for base in bases {
            self.walk_expr(*base);
        }
        self.visit_identifier_occurrence(name);
        self.walk_body(body);

        self.class_depth -= 1;
        self.scope_stack.pop();
    }

    fn walk_function(
        &mut self,
        _function_def: NodeId,
        name: NodeId,
        decorators: &[NodeId],
        params: &[ParamView],
        returns: Option<NodeId>,
        body: &[NodeId],
    ) {
        let function_symbol = self.symbols.symbol_for(name);
        let docs = self.docs.function_docs(name);
        self.emit_symbol_info(function_symbol, doc_lines(&docs));

        self.scope_stack.push(ScopeFrame::Function);
        self.function_depth += 1;

        for decorator in decorators {
            self.walk_expr(*decorator);
        }
        self.visit_identifier_occurrence(name);
        if let Some(returns) = returns {
            self.walk_expr(returns);
        }

        for param in params {
            if !param.named {
                // The bare `*` separator has no name and no symbol
                //").
                if let Some(default) = param.default {
                    self.walk_expr(default);
                }
                continue;
            }

            let param_symbol = self.symbols.symbol_for(param.name);
            let param_name = self.tree.name(param.name).unwrap_or_default();
            let doc = self.docs.parameter_doc(name, &param_name);
            self.emit_symbol_info(param_symbol, doc.into_iter().collect());

            if let Some(annotation) = param.annotation {
                self.walk_expr(annotation);
            }
            self.visit_identifier_occurrence(param.name);
            if let Some(default) = param.default {
                self.walk_expr(default);
            }
        }

        self.walk_body(body);

        self.function_depth -= 1;
        self.scope_stack.pop();
    }

    fn walk_assign(&mut self, assign: NodeId, targets: &[NodeId], value: NodeId) {
        if let [target] = targets {
            if let ExprView::Name(name_id) = self.tree.expr_view(*target) {
                if self.declares_at(name_id, name_id) {
                    let symbol = self.symbols.symbol_for(name_id);
                    let target_name = self.tree.name(name_id).unwrap_or_default();
                    let stub = self
                        .docs
                        .assignment_stub(assign, &target_name)
                        .into_iter()
                        .collect();
                    self.emit_symbol_info(symbol, stub);
                }
            }
        }

        for &target in targets {
            self.walk_expr(target);
        }
        self.walk_expr(value);
    }

    fn walk_ann_assign(&mut self, target: NodeId, annotation: NodeId, value: Option<NodeId>) {
        if value.is_none() && matches!(self.scope_stack.last(), Some(ScopeFrame::Class)) {
            if let ExprView::Name(name_id) = self.tree.expr_view(target) {
                let symbol = self.symbols.symbol_for(name_id);
                self.emit_symbol_info(symbol, Vec::new());
            }
        }

        self.walk_expr(target);
        self.walk_expr(annotation);
        if let Some(value) = value {
            self.walk_expr(value);
        }
    }

    fn walk_import(&mut self, aliases: &[crate::tree::ImportAlias]) {
        for alias in aliases {
            let symbol = self.symbols.symbol_for(alias.dotted_name);
            let (start, end) = self.tree.byte_range(alias.dotted_name);
            self.emit_range(start, end, symbol, Roles::READ_ACCESS);

            if let Some(asname) = alias.asname {
                // The bound local name (`as C`) is an ordinary declaration
                // at the enclosing scope, not part of the import header's
                // dotted path — its symbol comes straight from
                // `symbol_for`, same as any other binding site.
                let bound_symbol = self.symbols.symbol_for(asname);
                let (start, end) = self.tree.byte_range(asname);
                self.emit_range(start, end, bound_symbol, Roles::DEFINITION);
            }
        }
    }

    fn walk_import_from(&mut self, module: Option<NodeId>, aliases: &[crate::tree::ImportFromAlias]) {
        if let Some(module) = module {
            let symbol = self.symbols.symbol_for(module);
            let (start, end) = self.tree.byte_range(module);
            self.emit_range(start, end, symbol, Roles::READ_ACCESS);
        }

        for alias in aliases {
            let bound = alias.asname.unwrap_or(alias.name);
            self.import_bindings.insert(bound);
            self.visit_identifier_occurrence(bound);
        }
    }

    fn walk_expr(&mut self, expr: NodeId) {
        match self.tree.expr_view(expr) {
            ExprView::Name(name_id) => self.visit_identifier_occurrence(name_id),

            ExprView::Attribute { value, attr } => {
                self.walk_expr(value);
                self.visit_identifier_occurrence(attr);
            }

            ExprView::Lambda { params, body } => self.walk_lambda(&params, body),

            ExprView::Comprehension { element, clauses } => {
                for element in element {
                    self.walk_expr(element);
                }
                self.walk_comprehension_clauses(&clauses);
            }

            ExprView::Generic(children) => {
                for child in children {
                    self.walk_expr(child);
                }
            }

            // String/bytes/number/boolean/None/ellipsis literals and
            // f-strings carry no name occurrences of their own.
            ExprView::Leaf => {}
        }
    }

    fn walk_lambda(&mut self, params: &[ParamView], body: NodeId) {
        self.scope_stack.push(ScopeFrame::Function);
        self.function_depth += 1;

        for param in params {
            if !param.named {
                if let Some(default) = param.default {
                    self.walk_expr(default);
                }
                continue;
            }
            // Lambda parameters are themselves fresh locals, so no SymbolInformation
            // is emitted for them — only the occurrence.
            self.visit_identifier_occurrence(param.name);
            if let Some(default) = param.default {
                self.walk_expr(default);
            }
        }
        self.walk_expr(body);

        self.function_depth -= 1;
        self.scope_stack.pop();
    }

    fn walk_comprehension_clauses(&mut self, clauses: &[ComprehensionClause]) {
        for clause in clauses {
            // `for TARGET in ITER` puts the target before the iterable in
            // source text; visiting in that order keeps occurrence ranges
            // non-decreasing.
            self.visit_identifier_occurrence(clause.target);
            self.walk_expr(clause.iter);
            for condition in &clause.ifs {
                self.walk_expr(*condition);
            }
        }
    }

    /// Whether `name_id` is the declaring occurrence of the name the oracle
    /// resolves `query_id` to — Name rule steps 6/8, folded
    /// into one check since in this tree a declaration's `node` is always
    /// the identifier itself (see `symbol_computer.rs`), making "N.parent.id
    /// == D.node.id" and "N.id == D.node.id" the same comparison here.
    fn declares_at(&self, name_id: NodeId, query_id: NodeId) -> bool {
        self.oracle
            .declarations_of(query_id)
            .first()
            .is_some_and(|decl| decl.node == name_id)
    }

    /// Resolves a single identifier node — steps 1 through 10, applied uniformly
    /// to every identifier occurrence site: bare names, attribute access,
    /// class/function/parameter declaration identifiers, assignment targets,
    /// comprehension targets, and import bindings.
    fn visit_identifier_occurrence(&mut self, node_id: NodeId) {
        let text = self.tree.name(node_id).unwrap_or_default();
        let (start, end) = self.tree.byte_range(node_id);

        let declarations = self.oracle.declarations_of(node_id);
        let Some(decl) = declarations.first() else {
            match self.oracle.builtin_type(node_id, &text) {
                Some(BuiltinType::Callable) => {
                    if self.emitted_builtins.insert(text.clone()) {
                        let symbol = self.symbols.fresh_local();
                        let docs = self.oracle.builtin_doc(&text);
                        self.emit_symbol_info(symbol, docs);
                    }
                }
                _ => {
                    let symbol = self.symbols.fresh_local();
                    self.emit_range(start, end, symbol, Roles::READ_ACCESS);
                }
            }
            return;
        };

        if self.oracle.is_intrinsic(decl) {
            let symbol = self.symbols.fresh_local();
            self.emit_range(start, end, symbol, Roles::READ_ACCESS);
            return;
        }

        if self.import_bindings.contains(&decl.node) {
            if let Some(inferred) = self.oracle.type_of(decl.node) {
                let symbol = self.type_to_symbol(&inferred);
                // The binding's own occurrence (at the `import` statement)
                // is a Definition; every later use of the bound name reads
                // the same symbol.
                let role = if decl.node == node_id {
                    Roles::DEFINITION
                } else {
                    Roles::READ_ACCESS
                };
                self.emit_range(start, end, symbol, role);
                return;
            }
        }

        if decl.node == node_id {
            let symbol = self.symbols.symbol_for(decl.node);
            self.emit_range(start, end, symbol, Roles::DEFINITION);
            return;
        }

        if self.oracle.is_alias(decl) {
            let symbol = self.symbols.symbol_for(decl.node);
            self.emit_range(start, end, symbol, Roles::READ_ACCESS);
            return;
        }

        let symbol = self.symbols.symbol_for(decl.node);
        self.emit_range(start, end, symbol, Roles::READ_ACCESS);
    }

    /// Maps an oracle-inferred type to the symbol the Name rule emits for it.
    fn type_to_symbol(&self, inferred: &InferredType) -> Symbol {
        match inferred {
            InferredType::Function(node) | InferredType::Class { node, .. } => {
                self.symbols.symbol_for(*node)
            }
            InferredType::Module { .. } | InferredType::Unrecognized => {
                // No declaration node to resolve against: a bare module
                // reference's own symbol comes from the import statement's
                // Name rule, not from here, and TypeVars carry no identity
                // worth tracking.
                self.symbols.fresh_local()
            }
        }
    }

    fn emit_range(&mut self, start: u32, end: u32, symbol: Symbol, roles: Roles) {
        OccurrenceEmitter::new(&self.line_index, &mut self.document).emit(start, end, symbol, roles);
    }

    fn emit_symbol_info(&mut self, symbol: Symbol, documentation: Vec<String>) {
        OccurrenceEmitter::new(&self.line_index, &mut self.document)
            .emit_symbol_information(symbol, documentation);
    }
}

fn doc_lines(docs: &crate::doc::DeclarationDocs) -> Vec<String> {
    [
        docs.stub.as_ref().map(|s| format!("```python\n{s}\n```")),
        docs.docstring.clone(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{DeclarationDocs, DocExtractor as _};
    use crate::model::{DeclarationKind, DeclarationRef, PackageInfo, Range};
    use crate::package::{NoThirdPartyPackages, PackageDiscovery, PackageResolver};
    use crate::tree::{ImportAlias, ImportFromAlias, NodeKind, TreeIndex};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// A hand-built in-memory tree for one source file, used to exercise the
    /// walker against the concrete scenarios in without needing
    /// a real parser. Every `NodeId` is an arbitrary small integer; nodes are
    /// described out-of-band in `nodes`/`parents`/`stmts`/`exprs`.
    #[derive(Default)]
    struct FakeTree {
        source: String,
        module_dotted_name: String,
        file_path: PathBuf,
        nodes: HashMap<NodeId, NodeKind>,
        names: HashMap<NodeId, String>,
        parents: HashMap<NodeId, NodeId>,
        ranges: HashMap<NodeId, (u32, u32)>,
        module_body: Vec<NodeId>,
        stmts: HashMap<NodeId, StmtView>,
        exprs: HashMap<NodeId, ExprView>,
        /// Nodes declared outside this file (e.g. a stdlib function a
        /// declaration points at) — maps the node to the module it lives in,
        /// overriding the default "everything belongs to the file's own
        /// module" assumption.
        owning_module: HashMap<NodeId, NodeId>,
        module_dotted_names: HashMap<NodeId, String>,
        module_files: HashMap<NodeId, PathBuf>,
    }

    const MODULE: NodeId = NodeId(0);

    impl FakeTree {
        fn new(source: &str, module_dotted_name: &str) -> FakeTree {
            let mut tree = FakeTree {
                source: source.to_string(),
                module_dotted_name: module_dotted_name.to_string(),
                file_path: PathBuf::from(format!(
                    "/proj/{}.py",
                    module_dotted_name.replace('.', "/")
                )),
                ..Default::default()
            };
            tree.nodes.insert(MODULE, NodeKind::Module);
            tree
        }

        fn node(&mut self, id: NodeId, kind: NodeKind, name: Option<&str>, parent: NodeId, range: (u32, u32)) {
            self.nodes.insert(id, kind);
            if let Some(name) = name {
                self.names.insert(id, name.to_string());
            }
            self.parents.insert(id, parent);
            self.ranges.insert(id, range);
        }

        /// Registers `node` as a `Function` declared in an external module
        /// (e.g. a stdlib or third-party function an import resolves to),
        /// never actually walked.
        fn external_function(&mut self, node: NodeId, name: &str, module_dotted: &str, file_path: &str) {
            self.nodes.insert(node, NodeKind::Function);
            self.names.insert(node, name.to_string());
            let module_node = NodeId(module_dotted.len() as usize + 10_000);
            self.nodes.insert(module_node, NodeKind::Module);
            self.owning_module.insert(node, module_node);
            self.module_dotted_names.insert(module_node, module_dotted.to_string());
            self.module_files.insert(module_node, PathBuf::from(file_path));
            self.parents.insert(node, module_node);
        }
    }

    impl TreeIndex for FakeTree {
        fn kind(&self, node: NodeId) -> NodeKind {
            self.nodes[&node]
        }

        fn parent(&self, node: NodeId) -> Option<NodeId> {
            self.parents.get(&node).copied()
        }

        fn name(&self, node: NodeId) -> Option<String> {
            self.names.get(&node).cloned()
        }

        fn owning_module(&self, node: NodeId) -> NodeId {
            if self.nodes.get(&node) == Some(&NodeKind::Module) {
                return node;
            }
            self.owning_module.get(&node).copied().unwrap_or(MODULE)
        }

        fn module_dotted_name(&self, module_node: NodeId) -> String {
            self.module_dotted_names
                .get(&module_node)
                .cloned()
                .unwrap_or_else(|| self.module_dotted_name.clone())
        }

        fn file_path(&self, module_node: NodeId) -> PathBuf {
            self.module_files
                .get(&module_node)
                .cloned()
                .unwrap_or_else(|| self.file_path.clone())
        }

        fn import_target(&self, node: NodeId) -> (String, PathBuf) {
            let dotted = self.names[&node].clone();
            (dotted.clone(), PathBuf::from(format!("/stdlib/{dotted}.py")))
        }
    }

    impl SyntaxTree for FakeTree {
        fn module_node(&self) -> NodeId {
            MODULE
        }

        fn module_body(&self) -> Vec<NodeId> {
            self.module_body.clone()
        }

        fn stmt_view(&self, node: NodeId) -> StmtView {
            self.stmts[&node].clone()
        }

        fn expr_view(&self, node: NodeId) -> ExprView {
            self.exprs
                .get(&node)
                .cloned()
                .unwrap_or(ExprView::Name(node))
        }

        fn byte_range(&self, node: NodeId) -> (u32, u32) {
            self.ranges[&node]
        }
    }

    /// An oracle backed by a plain node -> declarations map, populated by the
    /// scenario builders below. Declarations never change mid-walk, matching
    /// the read-only contract describes.
    #[derive(Default)]
    struct FakeOracle {
        declarations: HashMap<NodeId, Vec<DeclarationRef>>,
        builtins: HashMap<&'static str, BuiltinType>,
        builtin_docs: HashMap<&'static str, Vec<String>>,
        intrinsics: HashSet<NodeId>,
        aliases: HashSet<NodeId>,
        types: HashMap<NodeId, InferredType>,
    }

    impl Oracle for FakeOracle {
        fn declarations_of(&self, name_node: NodeId) -> Vec<DeclarationRef> {
            self.declarations.get(&name_node).cloned().unwrap_or_default()
        }

        fn type_of(&self, expr_node: NodeId) -> Option<InferredType> {
            self.types.get(&expr_node).cloned()
        }

        fn builtin_type(&self, _name_node: NodeId, text: &str) -> Option<BuiltinType> {
            self.builtins.get(text).copied()
        }

        fn builtin_doc(&self, text: &str) -> Vec<String> {
            self.builtin_docs.get(text).cloned().unwrap_or_default()
        }

        fn is_intrinsic(&self, decl: &DeclarationRef) -> bool {
            self.intrinsics.contains(&decl.node)
        }

        fn is_alias(&self, decl: &DeclarationRef) -> bool {
            self.aliases.contains(&decl.node)
        }

        fn make_progress(&mut self) -> bool {
            false
        }

        fn mark_dirty(&mut self, _file_path: &std::path::Path) {}

        fn track_file(&mut self, _file_path: &std::path::Path, _is_tracked: bool, _is_opened: bool) {}
    }

    fn decl(node: NodeId, kind: DeclarationKind, module_name: &str, file_path: &str) -> DeclarationRef {
        DeclarationRef {
            node,
            kind,
            module_name: module_name.to_string(),
            file_path: PathBuf::from(file_path),
            is_alias: false,
            is_intrinsic: false,
        }
    }

    struct NullDocs;

    impl DocExtractor for NullDocs {
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

    fn resolver(project_root: &str) -> PackageResolver<NoThirdPartyPackages> {
        resolver_with_stdlib(project_root, None)
    }

    fn resolver_with_stdlib(
        project_root: &str,
        stdlib_root: Option<&str>,
    ) -> PackageResolver<NoThirdPartyPackages> {
        PackageResolver::new(
            PathBuf::from(project_root),
            stdlib_root.map(PathBuf::from),
            PackageInfo::project("acme", "1.0"),
            PackageInfo::stdlib("3.12.0"),
            NoThirdPartyPackages,
        )
    }

    fn run(tree: &FakeTree, oracle: &FakeOracle, project_root: &str) -> Document {
        run_with_resolver(tree, oracle, resolver(project_root))
    }

    fn run_with_resolver<D: PackageDiscovery>(
        tree: &FakeTree,
        oracle: &FakeOracle,
        resolver: PackageResolver<D>,
    ) -> Document {
        let locals = RefCell::new(crate::local::LocalCounter::new());
        let symbols = SymbolComputer::new(tree, &resolver, &locals, false);
        let docs = NullDocs;
        let walker = TreeWalker::new(oracle, tree, symbols, &docs, &tree.source, "m.py");
        walker.walk_module(true, &tree.module_dotted_name).unwrap()
    }

    /// Scenario A: top-level class and method reference.
    #[test]
    fn scenario_a_class_and_method_reference() {
        let src = "class C:\n    def f(self):\n        return self\nc = C()\nc.f()\n";
        let mut tree = FakeTree::new(src, "m");

        let class_name = NodeId(1);
        let func_name = NodeId(2);
        let self_param = NodeId(3);
        let self_return_ref = NodeId(4);
        let c_target = NodeId(5);
        let c_call_ref = NodeId(6);
        let c_attr_ref = NodeId(7);
        let c_instantiation_ref = NodeId(8);

        let class_def = NodeId(100);
        let func_def = NodeId(101);
        let assign = NodeId(102);
        let expr_stmt = NodeId(103);
        let call_expr = NodeId(104);
        let attr_expr = NodeId(105);

        tree.node(class_name, NodeKind::Class, Some("C"), MODULE, (6, 7));
        tree.node(func_def, NodeKind::Function, None, class_def, (14, 53));
        tree.node(func_name, NodeKind::Function, Some("f"), class_name, (18, 19));
        tree.node(self_param, NodeKind::Parameter { named: true }, Some("self"), func_name, (20, 24));
        tree.node(self_return_ref, NodeKind::Name, Some("self"), func_def, (45, 49));
        tree.node(c_target, NodeKind::Assignment, Some("c"), MODULE, (54, 55));
        tree.node(c_instantiation_ref, NodeKind::Name, Some("C"), assign, (58, 59));
        tree.node(c_call_ref, NodeKind::Name, Some("c"), MODULE, (60, 61));
        tree.node(c_attr_ref, NodeKind::Name, Some("f"), call_expr, (62, 63));

        tree.stmts.insert(
            class_def,
            StmtView::ClassDef {
                name: class_name,
                bases: vec![],
                decorators: vec![],
                body: vec![func_def],
            },
        );
        tree.stmts.insert(
            func_def,
            StmtView::FunctionDef {
                name: func_name,
                decorators: vec![],
                params: vec![ParamView {
                    name: self_param,
                    annotation: None,
                    default: None,
                    named: true,
                }],
                returns: None,
                body: vec![expr_stmt],
            },
        );
        tree.stmts.insert(
            expr_stmt,
            StmtView::Nested {
                exprs: vec![self_return_ref],
                bodies: vec![],
            },
        );
        tree.stmts.insert(
            assign,
            StmtView::Assign {
                targets: vec![c_target],
                value: c_instantiation_ref,
            },
        );
        tree.exprs.insert(c_target, ExprView::Name(c_target));
        tree.exprs.insert(c_instantiation_ref, ExprView::Generic(vec![c_instantiation_ref]));
        tree.stmts.insert(call_expr, StmtView::Expr(attr_expr));
        tree.exprs.insert(
            attr_expr,
            ExprView::Attribute {
                value: c_call_ref,
                attr: c_attr_ref,
            },
        );
        tree.module_body = vec![class_def, assign, NodeId(104)];

        let mut oracle = FakeOracle::default();
        oracle.declarations.insert(self_return_ref, vec![decl(self_param, DeclarationKind::Parameter, "m", "/proj/m.py")]);
        oracle
            .declarations
            .insert(c_instantiation_ref, vec![decl(class_name, DeclarationKind::Class, "m", "/proj/m.py")]);
        oracle
            .declarations
            .insert(c_call_ref, vec![decl(c_target, DeclarationKind::Assignment, "m", "/proj/m.py")]);
        oracle
            .declarations
            .insert(c_attr_ref, vec![decl(func_name, DeclarationKind::Function, "m", "/proj/m.py")]);

        let doc = run(&tree, &oracle, "/proj");

        let reads_and_defs: Vec<_> = doc
            .occurrences
            .iter()
            .map(|occ| (occ.roles.contains(Roles::DEFINITION), occ.symbol.as_str().to_string()))
            .collect();

        assert!(reads_and_defs.contains(&(true, "py-index pypi acme 1.0 m/C#".to_string())));
        assert!(reads_and_defs.contains(&(true, "py-index pypi acme 1.0 m/C#f().".to_string())));
        assert!(reads_and_defs
            .contains(&(true, "py-index pypi acme 1.0 m/C#f().(self)".to_string())));
        assert!(reads_and_defs
            .contains(&(false, "py-index pypi acme 1.0 m/C#f().(self)".to_string())));
        assert!(reads_and_defs.contains(&(true, "py-index pypi acme 1.0 m/c.".to_string())));
        assert!(reads_and_defs.contains(&(false, "py-index pypi acme 1.0 m/C#".to_string())));
        assert!(reads_and_defs.contains(&(false, "py-index pypi acme 1.0 m/c.".to_string())));
        assert!(reads_and_defs
            .contains(&(false, "py-index pypi acme 1.0 m/C#f().".to_string())));
    }

    /// Scenario F: a builtin function produces a `SymbolInformation`
    /// (carrying its docstring) but no Definition occurrence, and only
    /// once per file no matter how many times it's called.
    #[test]
    fn scenario_f_builtin_function_has_no_definition() {
        let src = "print(\"hi\")\nprint(\"bye\")\n";
        let mut tree = FakeTree::new(src, "m");

        let print_ref = NodeId(1);
        let print_ref_2 = NodeId(2);
        tree.node(print_ref, NodeKind::Name, Some("print"), MODULE, (0, 5));
        tree.node(print_ref_2, NodeKind::Name, Some("print"), MODULE, (13, 18));
        let expr_stmt = NodeId(100);
        let expr_stmt_2 = NodeId(101);
        tree.stmts.insert(expr_stmt, StmtView::Expr(print_ref));
        tree.stmts.insert(expr_stmt_2, StmtView::Expr(print_ref_2));
        tree.exprs.insert(print_ref, ExprView::Name(print_ref));
        tree.exprs.insert(print_ref_2, ExprView::Name(print_ref_2));
        tree.module_body = vec![expr_stmt, expr_stmt_2];

        let mut oracle = FakeOracle::default();
        oracle.builtins.insert("print", BuiltinType::Callable);
        oracle
            .builtin_docs
            .insert("print", vec!["Print objects to the text stream.".to_string()]);

        let doc = run(&tree, &oracle, "/proj");

        assert!(!doc.occurrences.iter().any(|occ| occ.roles.contains(Roles::DEFINITION)));
        assert_eq!(doc.symbols.len(), 1);
        assert_eq!(
            doc.symbols[0].documentation,
            vec!["Print objects to the text stream.".to_string()]
        );
    }

    /// Scenario D: comprehension targets are local and share
    /// one symbol between both occurrences of the same bound name.
    #[test]
    fn scenario_d_comprehension_target_is_local() {
        let src = "xs = [x for x in range(3)]\n";
        let mut tree = FakeTree::new(src, "m");

        let xs_target = NodeId(1);
        let elt_ref = NodeId(2);
        let comp_target = NodeId(3);
        let range_ref = NodeId(4);
        let listcomp = NodeId(5);

        tree.node(xs_target, NodeKind::Assignment, Some("xs"), MODULE, (0, 2));
        tree.node(elt_ref, NodeKind::Name, Some("x"), listcomp, (6, 7));
        tree.node(comp_target, NodeKind::ComprehensionTarget, Some("x"), listcomp, (12, 13));
        tree.node(range_ref, NodeKind::Name, Some("range"), listcomp, (17, 22));

        let assign = NodeId(100);
        tree.stmts.insert(
            assign,
            StmtView::Assign {
                targets: vec![xs_target],
                value: listcomp,
            },
        );
        tree.exprs.insert(xs_target, ExprView::Name(xs_target));
        tree.exprs.insert(
            listcomp,
            ExprView::Comprehension {
                element: vec![elt_ref],
                clauses: vec![ComprehensionClause {
                    target: comp_target,
                    iter: range_ref,
                    ifs: vec![],
                }],
            },
        );
        tree.exprs.insert(range_ref, ExprView::Name(range_ref));
        tree.module_body = vec![assign];

        tree.external_function(NodeId(999), "range", "builtins", "/stdlib/builtins.py");

        let mut oracle = FakeOracle::default();
        oracle.declarations.insert(elt_ref, vec![decl(comp_target, DeclarationKind::Name, "m", "/proj/m.py")]);
        oracle
            .declarations
            .insert(comp_target, vec![decl(comp_target, DeclarationKind::Name, "m", "/proj/m.py")]);
        oracle.declarations.insert(
            range_ref,
            vec![decl(NodeId(999), DeclarationKind::Function, "builtins", "/stdlib/builtins.py")],
        );

        let doc = run_with_resolver(&tree, &oracle, resolver_with_stdlib("/proj", Some("/stdlib")));

        let x_symbols: Vec<_> = doc
            .occurrences
            .iter()
            .filter(|occ| occ.symbol.is_local())
            .map(|occ| occ.symbol.as_str().to_string())
            .collect();
        // Both `x` occurrences (the comprehension's target and its element
        // reference) resolve to the exact same local symbol.
        assert_eq!(x_symbols.len(), 2);
        assert_eq!(x_symbols[0], x_symbols[1]);

        let xs_symbol = doc
            .occurrences
            .iter()
            .find(|occ| occ.roles.contains(Roles::DEFINITION))
            .unwrap();
        assert_eq!(xs_symbol.symbol.as_str(), "py-index pypi acme 1.0 m/xs.");
    }

    /// Scenario B: `import json as j` then `j.dumps({})`.
    #[test]
    fn scenario_b_import_alias() {
        let src = "import json as j\nj.dumps({})\n";
        let mut tree = FakeTree::new(src, "m");

        let dotted = NodeId(1);
        let asname = NodeId(2);
        let j_ref = NodeId(3);
        let dumps_ref = NodeId(4);
        let call_expr = NodeId(5);
        let attr_expr = NodeId(6);

        tree.node(dotted, NodeKind::ImportAs, Some("json"), MODULE, (7, 11));
        tree.node(asname, NodeKind::ImportAs, Some("j"), MODULE, (15, 16));
        tree.node(j_ref, NodeKind::Name, Some("j"), MODULE, (18, 19));
        tree.node(dumps_ref, NodeKind::Name, Some("dumps"), call_expr, (20, 25));

        let import_stmt = NodeId(100);
        let expr_stmt = NodeId(101);
        tree.stmts.insert(
            import_stmt,
            StmtView::Import {
                aliases: vec![ImportAlias {
                    dotted_name: dotted,
                    asname: Some(asname),
                }],
            },
        );
        tree.stmts.insert(expr_stmt, StmtView::Expr(call_expr));
        tree.exprs.insert(
            call_expr,
            ExprView::Generic(vec![attr_expr]),
        );
        tree.exprs.insert(
            attr_expr,
            ExprView::Attribute {
                value: j_ref,
                attr: dumps_ref,
            },
        );
        tree.module_body = vec![import_stmt, expr_stmt];

        tree.external_function(NodeId(999), "dumps", "json", "/stdlib/json.py");

        let mut oracle = FakeOracle::default();
        oracle.declarations.insert(j_ref, vec![decl(asname, DeclarationKind::Import, "m", "/proj/m.py")]);
        oracle.declarations.insert(
            dumps_ref,
            vec![decl(NodeId(999), DeclarationKind::Function, "json", "/stdlib/json.py")],
        );

        let doc = run_with_resolver(&tree, &oracle, resolver_with_stdlib("/proj", Some("/stdlib")));

        let symbols: Vec<_> = doc.occurrences.iter().map(|o| o.symbol.as_str().to_string()).collect();
        assert!(symbols.contains(&"py-index pypi python-stdlib 3.12.0 json/__init__:".to_string()));
        assert!(symbols.contains(&"py-index pypi acme 1.0 m/j.".to_string()));
    }

    /// invariant 2: scope stack and depth counters return to
    /// zero after a well-formed walk.
    #[test]
    fn scope_balance_after_walk() {
        let src = "class C:\n    def f(self):\n        pass\n";
        let mut tree = FakeTree::new(src, "m");
        let class_name = NodeId(1);
        let func_name = NodeId(2);
        let self_param = NodeId(3);
        let class_def = NodeId(100);
        let func_def = NodeId(101);

        tree.node(class_name, NodeKind::Class, Some("C"), MODULE, (6, 7));
        tree.node(func_name, NodeKind::Function, Some("f"), func_def, (18, 19));
        tree.node(self_param, NodeKind::Parameter { named: true }, Some("self"), func_name, (20, 24));

        tree.stmts.insert(
            class_def,
            StmtView::ClassDef {
                name: class_name,
                bases: vec![],
                decorators: vec![],
                body: vec![func_def],
            },
        );
        tree.stmts.insert(
            func_def,
            StmtView::FunctionDef {
                name: func_name,
                decorators: vec![],
                params: vec![ParamView {
                    name: self_param,
                    annotation: None,
                    default: None,
                    named: true,
                }],
                returns: None,
                body: vec![],
            },
        );
        tree.module_body = vec![class_def];

        let oracle = FakeOracle::default();
        let doc = run(&tree, &oracle, "/proj");
        assert!(!doc.occurrences.is_empty());
    }

    /// A `PackageDiscovery` that only knows about one third-party
    /// distribution, matching the fixture `package.rs` itself tests against.
    struct FakeThirdPartyDiscovery;

    impl PackageDiscovery for FakeThirdPartyDiscovery {
        fn package_for(&self, module_name: &str) -> Option<PackageInfo> {
            if module_name == "requests" || module_name == "requests.__init__" {
                Some(PackageInfo {
                    name: "requests".to_string(),
                    version: "2.31.0".to_string(),
                    files: Default::default(),
                })
            } else {
                None
            }
        }
    }

    /// Scenario C: `from requests import get` followed by a call. The
    /// module name resolves, through the same resolver `ImportAs` uses, to
    /// `requests`'s own `__init__` symbol; the binding occurrence at the
    /// import statement is a Definition of the resolved `get` symbol, and
    /// the later call is a read of that same symbol.
    #[test]
    fn scenario_c_from_import_third_party_symbol() {
        let src = "from requests import get\nget(\"u\")\n";
        let mut tree = FakeTree::new(src, "m");

        let module_name_node = NodeId(1);
        let binding = NodeId(2);
        let call_ref = NodeId(3);

        tree.node(module_name_node, NodeKind::ImportFromModule, Some("requests"), MODULE, (5, 13));
        tree.node(binding, NodeKind::ImportFromBinding, Some("get"), MODULE, (21, 24));
        tree.node(call_ref, NodeKind::Name, Some("get"), MODULE, (26, 29));

        let import_stmt = NodeId(100);
        let expr_stmt = NodeId(101);
        tree.stmts.insert(
            import_stmt,
            StmtView::ImportFrom {
                module: Some(module_name_node),
                level: 0,
                aliases: vec![ImportFromAlias { name: binding, asname: None }],
            },
        );
        tree.stmts.insert(expr_stmt, StmtView::Expr(call_ref));
        tree.exprs.insert(call_ref, ExprView::Name(call_ref));
        tree.module_body = vec![import_stmt, expr_stmt];

        tree.external_function(NodeId(999), "get", "requests", "/site-packages/requests/__init__.py");

        let mut oracle = FakeOracle::default();
        oracle.declarations.insert(binding, vec![decl(binding, DeclarationKind::ImportFrom, "m", "/proj/m.py")]);
        oracle.declarations.insert(call_ref, vec![decl(binding, DeclarationKind::ImportFrom, "m", "/proj/m.py")]);
        oracle.aliases.insert(binding);
        oracle.types.insert(binding, InferredType::Function(NodeId(999)));

        let resolver = PackageResolver::new(
            PathBuf::from("/proj"),
            None,
            PackageInfo::project("acme", "1.0"),
            PackageInfo::stdlib("3.12.0"),
            FakeThirdPartyDiscovery,
        );
        let doc = run_with_resolver(&tree, &oracle, resolver);

        let module_read = doc
            .occurrences
            .iter()
            .find(|occ| occ.range == Range::single_line(0, 5, 13))
            .expect("a read for the module name");
        assert_eq!(module_read.symbol.as_str(), "py-index pypi requests 2.31.0 requests/__init__:");
        assert!(!module_read.roles.contains(Roles::DEFINITION));

        let get_symbol = "py-index pypi requests 2.31.0 requests/get().";
        assert_eq!(
            doc.occurrences
                .iter()
                .filter(|occ| occ.symbol.as_str() == get_symbol)
                .count(),
            2
        );
        let definitions: Vec<_> = doc
            .occurrences
            .iter()
            .filter(|occ| occ.roles.contains(Roles::DEFINITION))
            .collect();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].symbol.as_str(), get_symbol);
        assert_eq!(definitions[0].range, Range::single_line(0, 21, 24));
    }

    /// Scenario E: cross-file reference. `acme/a.py` defines `class A`;
    /// `acme/b.py` has `from a import A`. Resolving the import's type takes
    /// the walker to `A`'s own declaration node in the other file, and
    /// `symbol_for` computes its symbol the same way it would if `A` were
    /// being walked directly out of `a.py`.
    #[test]
    fn scenario_e_cross_file_reference() {
        let src = "from a import A\n";
        let mut tree = FakeTree::new(src, "b");

        let module_name_node = NodeId(1);
        let binding = NodeId(2);
        tree.node(module_name_node, NodeKind::ImportFromModule, Some("a"), MODULE, (5, 6));
        tree.node(binding, NodeKind::ImportFromBinding, Some("A"), MODULE, (14, 15));

        let import_stmt = NodeId(100);
        tree.stmts.insert(
            import_stmt,
            StmtView::ImportFrom {
                module: Some(module_name_node),
                level: 0,
                aliases: vec![ImportFromAlias { name: binding, asname: None }],
            },
        );
        tree.module_body = vec![import_stmt];

        let class_a = NodeId(50);
        let module_a = NodeId(51);
        tree.nodes.insert(module_a, NodeKind::Module);
        tree.module_dotted_names.insert(module_a, "a".to_string());
        tree.module_files.insert(module_a, PathBuf::from("/proj/a.py"));
        tree.nodes.insert(class_a, NodeKind::Class);
        tree.names.insert(class_a, "A".to_string());
        tree.parents.insert(class_a, module_a);
        tree.owning_module.insert(class_a, module_a);

        let mut oracle = FakeOracle::default();
        oracle.declarations.insert(binding, vec![decl(binding, DeclarationKind::ImportFrom, "b", "/proj/b.py")]);
        oracle.aliases.insert(binding);
        oracle.types.insert(
            binding,
            InferredType::Class { node: class_a, module_name: "a".to_string(), name: "A".to_string() },
        );

        let doc = run(&tree, &oracle, "/proj");

        let binding_occurrence = doc
            .occurrences
            .iter()
            .find(|occ| occ.range == Range::single_line(0, 14, 15))
            .expect("an occurrence for the A binding");
        assert_eq!(binding_occurrence.symbol.as_str(), "py-index pypi acme 1.0 a/A#");
        assert!(binding_occurrence.roles.contains(Roles::DEFINITION));
    }
}
