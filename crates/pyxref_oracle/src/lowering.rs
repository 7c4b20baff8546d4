//! Flattens one `tree-sitter-python` parse into the [`crate::tree::FileEntry`]
//! shape `pyxref_core` consumes.
//!
//! The one rule every function here follows: a node's `parent` is never its
//! immediate syntactic parent, it is the nearest enclosing scope owner
//! (the Module record, or a Class/Function/Lambda's own declaration node).
//! `if`/`for`/`while`/`with`/`try` and their clauses never open a new scope
//! in Python, so they are lowered transparently — their statements are
//! lowered with the same `scope` their container had, and the container
//! itself becomes a symbol-transparent [`NodeKind::Transparent`] record.
//! That is what lets `SyntacticOracle::declarations_of` resolve a name by
//! walking the `parent` chain directly from any reference to its binding
//! scope, with no wrapper nodes in the way.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pyxref_core::node_id::NodeId;
use pyxref_core::tree::{
    ComprehensionClause, ExprView, ImportAlias, ImportFromAlias, NodeKind, ParamView, StmtView,
};
use tree_sitter::Node as TsNode;

use crate::tree::{FileEntry, NodeRecord, TreeStore};

pub(crate) fn lower(
    file_id: u32,
    file_path: PathBuf,
    module_dotted_name: String,
    project_root: &Path,
    source: &str,
    ts_tree: &tree_sitter::Tree,
) -> FileEntry {
    let mut lowerer = Lowerer {
        file_id,
        project_root,
        source: source.as_bytes(),
        records: Vec::new(),
        declarations: HashMap::new(),
    };

    let module_id = lowerer.push(NodeRecord::leaf(
        NodeKind::Module,
        None,
        None,
        (0, source.len() as u32),
    ));
    debug_assert_eq!(module_id, TreeStore::make_id(file_id, 0));

    let root = ts_tree.root_node();
    let module_body = lowerer.lower_block(named_children(root), module_id);

    FileEntry {
        file_path,
        module_dotted_name,
        source: source.to_string(),
        records: lowerer.records,
        module_body,
        declarations: lowerer.declarations,
    }
}

/// Strips `project_root`, drops the `.py` extension, and collapses a
/// trailing `__init__` segment into its package — `pkg/sub/__init__.py`
/// becomes `pkg.sub`, `pkg/sub/mod.py` becomes `pkg.sub.mod`.
pub(crate) fn dotted_name_for(path: &Path, project_root: &Path) -> String {
    let relative = path.strip_prefix(project_root).unwrap_or(path);
    let mut relative = relative.with_extension("");
    if relative.file_name().is_some_and(|name| name == "__init__") {
        relative.pop();
    }
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(".")
}

fn byte_range(node: TsNode) -> (u32, u32) {
    (node.start_byte() as u32, node.end_byte() as u32)
}

fn named_children(node: TsNode) -> Vec<TsNode> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

struct Lowerer<'a> {
    file_id: u32,
    project_root: &'a Path,
    source: &'a [u8],
    records: Vec<NodeRecord>,
    declarations: HashMap<NodeId, HashMap<String, NodeId>>,
}

impl Lowerer<'_> {
    fn push(&mut self, record: NodeRecord) -> NodeId {
        let id = TreeStore::make_id(self.file_id, self.records.len());
        self.records.push(record);
        id
    }

    /// Reserves a slot before a node's children are known, for the
    /// declaration kinds (Class/Function/Lambda) that need to reference
    /// their own id while lowering their own body.
    fn reserve(&mut self) -> NodeId {
        self.push(NodeRecord::leaf(NodeKind::Transparent, None, None, (0, 0)))
    }

    fn fill(&mut self, id: NodeId, record: NodeRecord) {
        self.records[TreeStore::local_index(id)] = record;
    }

    fn text(&self, node: TsNode) -> String {
        node.utf8_text(self.source).unwrap_or_default().to_string()
    }

    fn declare(&mut self, scope: NodeId, name: String, node: NodeId) {
        self.declarations.entry(scope).or_default().insert(name, node);
    }

    fn resolve_module_path(&self, dotted: &str) -> PathBuf {
        if dotted.is_empty() {
            return self.project_root.to_path_buf();
        }
        let relative: PathBuf = dotted.split('.').collect();
        let as_module = self.project_root.join(&relative).with_extension("py");
        if as_module.is_file() {
            return as_module;
        }
        let as_package = self.project_root.join(&relative).join("__init__.py");
        if as_package.is_file() {
            return as_package;
        }
        PathBuf::from(dotted.replace('.', "/"))
    }

    // ---- statements ---------------------------------------------------

    fn lower_block(&mut self, stmts: Vec<TsNode>, scope: NodeId) -> Vec<NodeId> {
        stmts.into_iter().map(|stmt| self.lower_stmt(stmt, scope)).collect()
    }

    fn lower_stmt(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        match node.kind() {
            "class_definition" => self.lower_class(node, scope, Vec::new()),
            "function_definition" => self.lower_function(node, scope, Vec::new()),
            "decorated_definition" => self.lower_decorated(node, scope),
            "expression_statement" => self.lower_expression_statement(node, scope),
            "import_statement" => self.lower_import(node, scope),
            "import_from_statement" => self.lower_import_from(node, scope),
            "if_statement" | "elif_clause" => self.lower_if(node, scope),
            "else_clause" => self.lower_else(node, scope),
            "for_statement" => self.lower_for(node, scope),
            "while_statement" => self.lower_while(node, scope),
            "with_statement" => self.lower_with(node, scope),
            "try_statement" => self.lower_try(node, scope),
            "except_clause" | "except_group_clause" => self.lower_except(node, scope),
            "finally_clause" => self.lower_finally(node, scope),
            "return_statement" | "assert_statement" | "raise_statement" | "delete_statement" => {
                self.lower_simple_nested(node, scope)
            }
            _ => self.push(NodeRecord::leaf(NodeKind::Transparent, Some(scope), None, byte_range(node))),
        }
    }

    fn lower_decorated(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let decorators: Vec<NodeId> = named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "decorator")
            .map(|d| {
                let inner = d.named_child(0).unwrap_or(d);
                self.lower_expr(inner, scope)
            })
            .collect();
        let Some(def) = node.child_by_field_name("definition") else {
            return self.push(NodeRecord::leaf(NodeKind::Transparent, Some(scope), None, byte_range(node)));
        };
        match def.kind() {
            "class_definition" => self.lower_class(def, scope, decorators),
            "function_definition" => self.lower_function(def, scope, decorators),
            _ => self.lower_stmt(def, scope),
        }
    }

    fn lower_class(&mut self, node: TsNode, scope: NodeId, decorators: Vec<NodeId>) -> NodeId {
        let name_node = node.child_by_field_name("name").unwrap_or(node);
        let name = self.text(name_node);
        let class_id = self.reserve();

        let bases = node
            .child_by_field_name("superclasses")
            .map(|args| {
                named_children(args)
                    .into_iter()
                    .filter(|c| c.kind() != "keyword_argument")
                    .map(|c| self.lower_expr(c, class_id))
                    .collect()
            })
            .unwrap_or_default();
        let body = node
            .child_by_field_name("body")
            .map(|b| self.lower_block(named_children(b), class_id))
            .unwrap_or_default();

        self.fill(
            class_id,
            NodeRecord {
                kind: NodeKind::Class,
                parent: Some(scope),
                name: Some(name.clone()),
                byte_range: byte_range(name_node),
                stmt: Some(StmtView::ClassDef {
                    name: class_id,
                    bases,
                    decorators,
                    body,
                }),
                expr: None,
                import_target: None,
                import_remote_name: None,
            },
        );
        self.declare(scope, name, class_id);
        class_id
    }

    fn lower_function(&mut self, node: TsNode, scope: NodeId, decorators: Vec<NodeId>) -> NodeId {
        let name_node = node.child_by_field_name("name").unwrap_or(node);
        let name = self.text(name_node);
        let func_id = self.reserve();

        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.lower_params(p, func_id, scope))
            .unwrap_or_default();
        let returns = node
            .child_by_field_name("return_type")
            .map(|t| self.lower_expr(t, scope));
        let body = node
            .child_by_field_name("body")
            .map(|b| self.lower_block(named_children(b), func_id))
            .unwrap_or_default();

        self.fill(
            func_id,
            NodeRecord {
                kind: NodeKind::Function,
                parent: Some(scope),
                name: Some(name.clone()),
                byte_range: byte_range(name_node),
                stmt: Some(StmtView::FunctionDef {
                    name: func_id,
                    decorators,
                    params,
                    returns,
                    body,
                }),
                expr: None,
                import_target: None,
                import_remote_name: None,
            },
        );
        self.declare(scope, name, func_id);
        func_id
    }

    /// `outer_scope` is where Python actually evaluates annotations and
    /// default values — at `def` time, in the scope the `def` itself sits
    /// in — while the parameter names themselves belong to `func_scope`.
    fn lower_params(&mut self, params_node: TsNode, func_scope: NodeId, outer_scope: NodeId) -> Vec<ParamView> {
        let mut cursor = params_node.walk();
        params_node
            .children(&mut cursor)
            .filter(|c| !matches!(c.kind(), "(" | ")" | ","))
            .map(|c| self.lower_param(c, func_scope, outer_scope))
            .collect()
    }

    fn lower_param(&mut self, node: TsNode, func_scope: NodeId, outer_scope: NodeId) -> ParamView {
        match node.kind() {
            "identifier" => ParamView {
                name: self.push_param(node, func_scope),
                annotation: None,
                default: None,
                named: true,
            },
            "typed_parameter" => {
                let inner = node.named_child(0).unwrap_or(node);
                let name_node = innermost_identifier(inner);
                let annotation = node.child_by_field_name("type").map(|t| self.lower_expr(t, outer_scope));
                ParamView {
                    name: self.push_param(name_node, func_scope),
                    annotation,
                    default: None,
                    named: true,
                }
            }
            "default_parameter" => {
                let name_node = node.child_by_field_name("name").unwrap_or(node);
                let default = node.child_by_field_name("value").map(|v| self.lower_expr(v, outer_scope));
                ParamView {
                    name: self.push_param(name_node, func_scope),
                    annotation: None,
                    default,
                    named: true,
                }
            }
            "typed_default_parameter" => {
                let name_node = node.child_by_field_name("name").unwrap_or(node);
                let annotation = node.child_by_field_name("type").map(|t| self.lower_expr(t, outer_scope));
                let default = node.child_by_field_name("value").map(|v| self.lower_expr(v, outer_scope));
                ParamView {
                    name: self.push_param(name_node, func_scope),
                    annotation,
                    default,
                    named: true,
                }
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                let inner = node.named_child(0).unwrap_or(node);
                let name_node = innermost_identifier(inner);
                ParamView {
                    name: self.push_param(name_node, func_scope),
                    annotation: None,
                    default: None,
                    named: true,
                }
            }
            _ => ParamView {
                name: self.push(NodeRecord::leaf(
                    NodeKind::Parameter { named: false },
                    Some(func_scope),
                    None,
                    byte_range(node),
                )),
                annotation: None,
                default: None,
                named: false,
            },
        }
    }

    fn push_param(&mut self, name_node: TsNode, func_scope: NodeId) -> NodeId {
        let name = self.text(name_node);
        let id = self.push(NodeRecord::leaf(
            NodeKind::Parameter { named: true },
            Some(func_scope),
            Some(name.clone()),
            byte_range(name_node),
        ));
        self.declare(func_scope, name, id);
        id
    }

    fn lower_expression_statement(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let Some(inner) = node.named_child(0) else {
            return self.push(NodeRecord::leaf(NodeKind::Transparent, Some(scope), None, byte_range(node)));
        };
        match inner.kind() {
            "assignment" => self.lower_assignment(inner, scope),
            "augmented_assignment" => self.lower_aug_assign(inner, scope),
            _ => {
                let expr = self.lower_expr(inner, scope);
                self.push(NodeRecord {
                    kind: NodeKind::Transparent,
                    parent: Some(scope),
                    name: None,
                    byte_range: byte_range(node),
                    stmt: Some(StmtView::Expr(expr)),
                    expr: None,
                    import_target: None,
                    import_remote_name: None,
                })
            }
        }
    }

    fn lower_assignment(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        if let Some(annotation_node) = node.child_by_field_name("type") {
            let target_node = node.child_by_field_name("left").unwrap_or(node);
            let value = node.child_by_field_name("right").map(|v| self.lower_expr(v, scope));
            // An annotation with no assigned value (`x: int` in a class
            // body) never goes local-vs-global by project version the way
            // a real assignment does — it gets `TypeAnnotation`, which
            // `SymbolComputer` dispatches exactly like a plain `Name`.
            let target = if value.is_some() {
                self.lower_assign_target_single(target_node, scope)
            } else {
                self.lower_type_annotation_target(target_node, scope)
            };
            let annotation = self.lower_expr(annotation_node, scope);
            return self.push(NodeRecord {
                kind: NodeKind::Transparent,
                parent: Some(scope),
                name: None,
                byte_range: byte_range(node),
                stmt: Some(StmtView::AnnAssign {
                    target,
                    annotation,
                    value,
                }),
                expr: None,
                import_target: None,
                import_remote_name: None,
            });
        }

        let mut targets = Vec::new();
        let mut current = node;
        loop {
            let left = current.child_by_field_name("left").unwrap_or(current);
            targets.extend(self.lower_assign_target(left, scope));
            let right = current.child_by_field_name("right").unwrap_or(current);
            if right.kind() == "assignment" && right.child_by_field_name("type").is_none() {
                current = right;
                continue;
            }
            let value = self.lower_expr(right, scope);
            return self.push(NodeRecord {
                kind: NodeKind::Transparent,
                parent: Some(scope),
                name: None,
                byte_range: byte_range(node),
                stmt: Some(StmtView::Assign { targets, value }),
                expr: None,
                import_target: None,
                import_remote_name: None,
            });
        }
    }

    /// The single leftmost target of a plain (non-unpacking) assignment:
    /// the only shape that gets `NodeKind::Assignment` rather than a plain
    /// `Name`, since it alone carries the module-top-level locality nuance
    /// `SymbolComputer` applies.
    fn lower_assign_target(&mut self, node: TsNode, scope: NodeId) -> Vec<NodeId> {
        match node.kind() {
            "identifier" => vec![self.lower_assign_target_single(node, scope)],
            _ => self.lower_assign_target_plain(node, scope),
        }
    }

    fn lower_assign_target_single(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let name = self.text(node);
        let id = self.reserve();
        self.fill(
            id,
            NodeRecord {
                kind: NodeKind::Assignment,
                parent: Some(scope),
                name: Some(name.clone()),
                byte_range: byte_range(node),
                stmt: None,
                expr: Some(ExprView::Name(id)),
                import_target: None,
                import_remote_name: None,
            },
        );
        self.declare(scope, name, id);
        id
    }

    fn lower_type_annotation_target(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let name = self.text(node);
        let id = self.reserve();
        self.fill(
            id,
            NodeRecord {
                kind: NodeKind::TypeAnnotation,
                parent: Some(scope),
                name: Some(name.clone()),
                byte_range: byte_range(node),
                stmt: None,
                expr: Some(ExprView::Name(id)),
                import_target: None,
                import_remote_name: None,
            },
        );
        self.declare(scope, name, id);
        id
    }

    fn lower_assign_target_plain(&mut self, node: TsNode, scope: NodeId) -> Vec<NodeId> {
        match node.kind() {
            "identifier" => vec![self.lower_name_decl(node, scope)],
            "tuple_pattern" | "list_pattern" | "pattern_list" => named_children(node)
                .into_iter()
                .flat_map(|c| self.lower_assign_target_plain(c, scope))
                .collect(),
            "list_splat_pattern" => {
                let inner = node.named_child(0).unwrap_or(node);
                self.lower_assign_target_plain(inner, scope)
            }
            _ => vec![self.lower_expr(node, scope)],
        }
    }

    fn lower_for_target(&mut self, node: TsNode, scope: NodeId) {
        match node.kind() {
            "identifier" => {
                self.lower_name_decl(node, scope);
            }
            "tuple_pattern" | "list_pattern" | "pattern_list" => {
                for child in named_children(node) {
                    self.lower_for_target(child, scope);
                }
            }
            "list_splat_pattern" => {
                let inner = node.named_child(0).unwrap_or(node);
                self.lower_for_target(inner, scope);
            }
            _ => {
                self.lower_expr(node, scope);
            }
        }
    }

    fn lower_aug_assign(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let left = node.child_by_field_name("left").unwrap_or(node);
        let target = self.lower_expr(left, scope);
        let right = node.child_by_field_name("right").unwrap_or(node);
        let value = self.lower_expr(right, scope);
        self.push(NodeRecord {
            kind: NodeKind::Transparent,
            parent: Some(scope),
            name: None,
            byte_range: byte_range(node),
            stmt: Some(StmtView::AugAssign { target, value }),
            expr: None,
            import_target: None,
            import_remote_name: None,
        })
    }

    fn push_nested(&mut self, node: TsNode, scope: NodeId, exprs: Vec<NodeId>, bodies: Vec<Vec<NodeId>>) -> NodeId {
        self.push(NodeRecord {
            kind: NodeKind::Transparent,
            parent: Some(scope),
            name: None,
            byte_range: byte_range(node),
            stmt: Some(StmtView::Nested { exprs, bodies }),
            expr: None,
            import_target: None,
            import_remote_name: None,
        })
    }

    fn lower_simple_nested(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let exprs = named_children(node).into_iter().map(|c| self.lower_expr(c, scope)).collect();
        self.push_nested(node, scope, exprs, Vec::new())
    }

    fn find_alternative(&self, node: TsNode) -> Option<TsNode> {
        node.child_by_field_name("alternative")
            .or_else(|| named_children(node).into_iter().find(|c| matches!(c.kind(), "elif_clause" | "else_clause")))
    }

    fn lower_if(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let cond_id = node
            .child_by_field_name("condition")
            .map(|c| self.lower_expr(c, scope));
        let body = node
            .child_by_field_name("consequence")
            .map(|b| self.lower_block(named_children(b), scope))
            .unwrap_or_default();
        let mut bodies = vec![body];
        if let Some(alt) = self.find_alternative(node) {
            bodies.push(vec![self.lower_stmt(alt, scope)]);
        }
        self.push_nested(node, scope, cond_id.into_iter().collect(), bodies)
    }

    fn lower_else(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let body = node
            .child_by_field_name("body")
            .map(|b| self.lower_block(named_children(b), scope))
            .unwrap_or_default();
        self.push_nested(node, scope, Vec::new(), vec![body])
    }

    fn lower_for(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        if let Some(left) = node.child_by_field_name("left") {
            self.lower_for_target(left, scope);
        }
        let iter = node.child_by_field_name("right").map(|r| self.lower_expr(r, scope));
        let body = node
            .child_by_field_name("body")
            .map(|b| self.lower_block(named_children(b), scope))
            .unwrap_or_default();
        let mut bodies = vec![body];
        if let Some(alt) = node.child_by_field_name("alternative") {
            bodies.push(vec![self.lower_stmt(alt, scope)]);
        }
        self.push_nested(node, scope, iter.into_iter().collect(), bodies)
    }

    fn lower_while(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let cond_id = node
            .child_by_field_name("condition")
            .map(|c| self.lower_expr(c, scope));
        let body = node
            .child_by_field_name("body")
            .map(|b| self.lower_block(named_children(b), scope))
            .unwrap_or_default();
        let mut bodies = vec![body];
        if let Some(alt) = node.child_by_field_name("alternative") {
            bodies.push(vec![self.lower_stmt(alt, scope)]);
        }
        self.push_nested(node, scope, cond_id.into_iter().collect(), bodies)
    }

    fn lower_with(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let mut exprs = Vec::new();
        for clause in named_children(node) {
            if clause.kind() != "with_clause" {
                continue;
            }
            for item in named_children(clause) {
                if item.kind() != "with_item" {
                    continue;
                }
                let Some(inner) = item.named_child(0) else { continue };
                if inner.kind() == "as_pattern" {
                    if let Some(value) = inner.named_child(0) {
                        exprs.push(self.lower_expr(value, scope));
                    }
                    if let Some(target_wrap) = inner.named_child(1) {
                        let target = target_wrap.named_child(0).unwrap_or(target_wrap);
                        self.lower_for_target(target, scope);
                    }
                } else {
                    exprs.push(self.lower_expr(inner, scope));
                }
            }
        }
        let body = node
            .child_by_field_name("body")
            .map(|b| self.lower_block(named_children(b), scope))
            .unwrap_or_default();
        self.push_nested(node, scope, exprs, vec![body])
    }

    fn lower_try(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let mut bodies = vec![node
            .child_by_field_name("body")
            .map(|b| self.lower_block(named_children(b), scope))
            .unwrap_or_default()];
        for child in named_children(node) {
            if matches!(
                child.kind(),
                "except_clause" | "except_group_clause" | "else_clause" | "finally_clause"
            ) {
                bodies.push(vec![self.lower_stmt(child, scope)]);
            }
        }
        self.push_nested(node, scope, Vec::new(), bodies)
    }

    fn lower_except(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let mut exprs = Vec::new();
        if let Some(value) = node.child_by_field_name("value") {
            exprs.push(self.lower_expr(value, scope));
        }
        if let Some(name) = node.child_by_field_name("name") {
            self.lower_name_decl(name, scope);
        }
        let body = node
            .child_by_field_name("body")
            .map(|b| self.lower_block(named_children(b), scope))
            .unwrap_or_default();
        self.push_nested(node, scope, exprs, vec![body])
    }

    fn lower_finally(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let body = node
            .child_by_field_name("body")
            .map(|b| self.lower_block(named_children(b), scope))
            .unwrap_or_default();
        self.push_nested(node, scope, Vec::new(), vec![body])
    }

    fn lower_import(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let mut aliases = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "dotted_name" => {
                    let dotted = self.text(child);
                    let id = self.lower_import_as(child, &dotted, scope);
                    let first = dotted.split('.').next().unwrap_or(&dotted).to_string();
                    self.declare(scope, first, id);
                    aliases.push(ImportAlias {
                        dotted_name: id,
                        asname: None,
                    });
                }
                "aliased_import" => {
                    let Some(name_node) = child.child_by_field_name("name") else { continue };
                    let Some(alias_node) = child.child_by_field_name("alias") else { continue };
                    let dotted = self.text(name_node);
                    let dotted_id = self.lower_import_as(name_node, &dotted, scope);
                    let alias_text = self.text(alias_node);
                    let target_path = self.resolve_module_path(&dotted);
                    let asname_id = self.push(NodeRecord {
                        kind: NodeKind::ImportAs,
                        parent: Some(scope),
                        name: Some(alias_text.clone()),
                        byte_range: byte_range(alias_node),
                        stmt: None,
                        expr: None,
                        import_target: Some((dotted, target_path)),
                        import_remote_name: None,
                    });
                    self.declare(scope, alias_text, asname_id);
                    aliases.push(ImportAlias {
                        dotted_name: dotted_id,
                        asname: Some(asname_id),
                    });
                }
                _ => {}
            }
        }
        self.push(NodeRecord {
            kind: NodeKind::Transparent,
            parent: Some(scope),
            name: None,
            byte_range: byte_range(node),
            stmt: Some(StmtView::Import { aliases }),
            expr: None,
            import_target: None,
            import_remote_name: None,
        })
    }

    fn lower_import_as(&mut self, text_node: TsNode, dotted: &str, scope: NodeId) -> NodeId {
        let target_path = self.resolve_module_path(dotted);
        self.push(NodeRecord {
            kind: NodeKind::ImportAs,
            parent: Some(scope),
            name: Some(dotted.to_string()),
            byte_range: byte_range(text_node),
            stmt: None,
            expr: None,
            import_target: Some((dotted.to_string(), target_path)),
            import_remote_name: None,
        })
    }

    fn lower_import_from(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let module_field = node.child_by_field_name("module_name");
        let module_dotted = module_field.map(|n| self.text(n)).unwrap_or_default();
        let level = module_field
            .filter(|n| n.kind() == "relative_import")
            .map(|n| self.text(n).chars().take_while(|c| *c == '.').count() as u32)
            .unwrap_or(0);
        let target_path = self.resolve_module_path(&module_dotted);
        let module_node_id = module_field.map(|n| {
            self.push(NodeRecord {
                kind: NodeKind::ImportFromModule,
                parent: Some(scope),
                name: Some(module_dotted.clone()),
                byte_range: byte_range(n),
                stmt: None,
                expr: None,
                import_target: Some((module_dotted.clone(), target_path.clone())),
                import_remote_name: None,
            })
        });

        let mut aliases = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "aliased_import" => {
                    let Some(name_node) = child.child_by_field_name("name") else { continue };
                    let Some(alias_node) = child.child_by_field_name("alias") else { continue };
                    let remote_name = self.text(name_node);
                    let local_name = self.text(alias_node);
                    let id = self.push(NodeRecord {
                        kind: NodeKind::ImportFromBinding,
                        parent: Some(scope),
                        name: Some(local_name.clone()),
                        byte_range: byte_range(alias_node),
                        stmt: None,
                        expr: None,
                        import_target: Some((module_dotted.clone(), target_path.clone())),
                        import_remote_name: Some(remote_name),
                    });
                    self.declare(scope, local_name, id);
                    aliases.push(ImportFromAlias {
                        name: id,
                        asname: Some(id),
                    });
                }
                "identifier" => {
                    let remote_name = self.text(child);
                    let id = self.push(NodeRecord {
                        kind: NodeKind::ImportFromBinding,
                        parent: Some(scope),
                        name: Some(remote_name.clone()),
                        byte_range: byte_range(child),
                        stmt: None,
                        expr: None,
                        import_target: Some((module_dotted.clone(), target_path.clone())),
                        import_remote_name: Some(remote_name.clone()),
                    });
                    self.declare(scope, remote_name, id);
                    aliases.push(ImportFromAlias { name: id, asname: None });
                }
                _ => {}
            }
        }

        self.push(NodeRecord {
            kind: NodeKind::Transparent,
            parent: Some(scope),
            name: None,
            byte_range: byte_range(node),
            stmt: Some(StmtView::ImportFrom {
                module: module_node_id,
                level,
                aliases,
            }),
            expr: None,
            import_target: None,
            import_remote_name: None,
        })
    }

    // ---- expressions ----------------------------------------------------

    fn lower_name_expr(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let name = self.text(node);
        let id = self.reserve();
        self.fill(
            id,
            NodeRecord {
                kind: NodeKind::Name,
                parent: Some(scope),
                name: Some(name),
                byte_range: byte_range(node),
                stmt: None,
                expr: Some(ExprView::Name(id)),
                import_target: None,
                import_remote_name: None,
            },
        );
        id
    }

    fn lower_name_decl(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let id = self.lower_name_expr(node, scope);
        let name = self.text(node);
        self.declare(scope, name, id);
        id
    }

    fn lower_expr(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        match node.kind() {
            "identifier" => self.lower_name_expr(node, scope),
            "attribute" => self.lower_attribute(node, scope),
            "call" => self.lower_call(node, scope),
            "lambda" => self.lower_lambda(node, scope),
            "named_expression" => self.lower_named_expr(node, scope),
            "list_comprehension" | "set_comprehension" | "generator_expression" => {
                self.lower_comprehension(node, scope, false)
            }
            "dictionary_comprehension" => self.lower_comprehension(node, scope, true),
            _ => self.lower_generic_expr(node, scope),
        }
    }

    fn lower_attribute(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let value_node = node.child_by_field_name("object").unwrap_or(node);
        let attr_node = node.child_by_field_name("attribute").unwrap_or(node);
        let value = self.lower_expr(value_node, scope);
        let attr = self.push(NodeRecord::leaf(
            NodeKind::Name,
            Some(scope),
            Some(self.text(attr_node)),
            byte_range(attr_node),
        ));
        self.push(NodeRecord {
            kind: NodeKind::Transparent,
            parent: Some(scope),
            name: None,
            byte_range: byte_range(node),
            stmt: None,
            expr: Some(ExprView::Attribute { value, attr }),
            import_target: None,
            import_remote_name: None,
        })
    }

    fn lower_call(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let func_node = node.child_by_field_name("function").unwrap_or(node);
        let mut children = vec![self.lower_expr(func_node, scope)];
        if let Some(args) = node.child_by_field_name("arguments") {
            for child in named_children(args) {
                if child.kind() == "keyword_argument" {
                    if let Some(value) = child.child_by_field_name("value") {
                        children.push(self.lower_expr(value, scope));
                    }
                } else {
                    children.push(self.lower_expr(child, scope));
                }
            }
        }
        self.push(NodeRecord {
            kind: NodeKind::Transparent,
            parent: Some(scope),
            name: None,
            byte_range: byte_range(node),
            stmt: None,
            expr: Some(ExprView::Generic(children)),
            import_target: None,
            import_remote_name: None,
        })
    }

    fn lower_lambda(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let lambda_id = self.reserve();
        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.lower_params(p, lambda_id, scope))
            .unwrap_or_default();
        let body = node
            .child_by_field_name("body")
            .map(|b| self.lower_expr(b, lambda_id));
        let body = body.unwrap_or(lambda_id);
        self.fill(
            lambda_id,
            NodeRecord {
                kind: NodeKind::Lambda,
                parent: Some(scope),
                name: None,
                byte_range: byte_range(node),
                stmt: None,
                expr: Some(ExprView::Lambda { params, body }),
                import_target: None,
                import_remote_name: None,
            },
        );
        lambda_id
    }

    fn lower_named_expr(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let name_id = node
            .child_by_field_name("name")
            .map(|n| self.lower_name_decl(n, scope));
        let value_id = node.child_by_field_name("value").map(|v| self.lower_expr(v, scope));
        let children = name_id.into_iter().chain(value_id).collect();
        self.push(NodeRecord {
            kind: NodeKind::Transparent,
            parent: Some(scope),
            name: None,
            byte_range: byte_range(node),
            stmt: None,
            expr: Some(ExprView::Generic(children)),
            import_target: None,
            import_remote_name: None,
        })
    }

    fn lower_comprehension_target(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        match node.kind() {
            "identifier" => {
                let name = self.text(node);
                let id = self.push(NodeRecord::leaf(
                    NodeKind::ComprehensionTarget,
                    Some(scope),
                    Some(name.clone()),
                    byte_range(node),
                ));
                self.declare(scope, name, id);
                id
            }
            "tuple_pattern" | "list_pattern" | "pattern_list" => {
                let mut first = None;
                for child in named_children(node) {
                    let id = self.lower_comprehension_target(child, scope);
                    first.get_or_insert(id);
                }
                first.unwrap_or_else(|| {
                    self.push(NodeRecord::leaf(
                        NodeKind::ComprehensionTarget,
                        Some(scope),
                        None,
                        byte_range(node),
                    ))
                })
            }
            _ => self.push(NodeRecord::leaf(
                NodeKind::ComprehensionTarget,
                Some(scope),
                None,
                byte_range(node),
            )),
        }
    }

    /// Comprehensions get their own Python scope, but the only consequence
    /// of that this indexer models is the target always resolving to a
    /// fresh local — everything else (element, iterable, conditions) is
    /// lowered against the enclosing `scope` rather than a synthesized
    /// comprehension scope of its own.
    fn lower_comprehension(&mut self, node: TsNode, scope: NodeId, is_dict: bool) -> NodeId {
        let mut clauses = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "for_in_clause" => {
                    let Some(left) = child.child_by_field_name("left") else { continue };
                    let Some(right) = child.child_by_field_name("right") else { continue };
                    let target = self.lower_comprehension_target(left, scope);
                    let iter = self.lower_expr(right, scope);
                    clauses.push(ComprehensionClause {
                        target,
                        iter,
                        ifs: Vec::new(),
                    });
                }
                "if_clause" => {
                    let Some(cond) = child.named_child(0) else { continue };
                    let cond_id = self.lower_expr(cond, scope);
                    if let Some(last) = clauses.last_mut() {
                        last.ifs.push(cond_id);
                    }
                }
                _ => {}
            }
        }

        let element = if is_dict {
            let key = node.child_by_field_name("key").map(|k| self.lower_expr(k, scope));
            let value = node.child_by_field_name("value").map(|v| self.lower_expr(v, scope));
            key.into_iter().chain(value).collect()
        } else {
            node.child_by_field_name("body")
                .map(|b| vec![self.lower_expr(b, scope)])
                .unwrap_or_default()
        };

        self.push(NodeRecord {
            kind: NodeKind::Transparent,
            parent: Some(scope),
            name: None,
            byte_range: byte_range(node),
            stmt: None,
            expr: Some(ExprView::Comprehension { element, clauses }),
            import_target: None,
            import_remote_name: None,
        })
    }

    fn lower_generic_expr(&mut self, node: TsNode, scope: NodeId) -> NodeId {
        let children: Vec<NodeId> = named_children(node).into_iter().map(|c| self.lower_expr(c, scope)).collect();
        self.push(NodeRecord {
            kind: NodeKind::Transparent,
            parent: Some(scope),
            name: None,
            byte_range: byte_range(node),
            stmt: None,
            expr: Some(ExprView::Generic(children)),
            import_target: None,
            import_remote_name: None,
        })
    }
}

fn innermost_identifier(node: TsNode) -> TsNode {
    if node.kind() == "identifier" {
        node
    } else {
        node.named_child(0).unwrap_or(node)
    }
}
