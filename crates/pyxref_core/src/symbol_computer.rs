//! `symbol_for(node) -> Symbol`: memoized by node id, pure
//! given the tree and the package resolver.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::local::LocalCounter;
use crate::model::{Descriptor, Symbol};
use crate::node_id::NodeId;
use crate::package::{PackageDiscovery, PackageResolver};
use crate::tree::{NodeKind, TreeIndex};

/// Computes canonical symbols for declaration nodes.
///
/// One instance is built per file walk; its memo table is dropped with it.
/// That's purely a performance choice — the function it memoizes is pure,
/// so recomputing a symbol for a node that was first seen in an earlier
/// file always reproduces the same string.
pub struct SymbolComputer<'a, T, D> {
    tree: &'a T,
    resolver: &'a PackageResolver<D>,
    locals: &'a RefCell<LocalCounter>,
    memo: RefCell<HashMap<NodeId, Symbol>>,
    /// Open Question: a non-empty project version makes a
    /// module-top-level assignment global; an empty version makes it local.
    project_version_is_empty: bool,
}

impl<'a, T: TreeIndex, D: PackageDiscovery> SymbolComputer<'a, T, D> {
    pub fn new(
        tree: &'a T,
        resolver: &'a PackageResolver<D>,
        locals: &'a RefCell<LocalCounter>,
        project_version_is_empty: bool,
    ) -> SymbolComputer<'a, T, D> {
        SymbolComputer {
            tree,
            resolver,
            locals,
            memo: RefCell::new(HashMap::default()),
            project_version_is_empty,
        }
    }

    pub fn symbol_for(&self, node: NodeId) -> Symbol {
        if let Some(symbol) = self.memo.borrow().get(&node) {
            return symbol.clone();
        }

        let module_node = self.tree.owning_module(node);
        let module_name = self.tree.module_dotted_name(module_node);
        let file_path = self.tree.file_path(module_node);

        let symbol = match self.resolver.package_for(&file_path, &module_name) {
            None => self.fresh_local(),
            Some(package) => match self.tree.kind(node) {
                NodeKind::Module => {
                    Symbol::global(&package, &[Descriptor::Namespace(module_name)])
                }

                NodeKind::Class => {
                    let name = self.tree.name(node).unwrap_or_default();
                    let parent = self.tree.parent(node).expect("Class node has a parent");
                    Symbol::extend(&self.symbol_for(parent), &Descriptor::Type(name))
                }

                NodeKind::Function => {
                    let name = self.tree.name(node).unwrap_or_default();
                    let parent = self.tree.parent(node).expect("Function node has a parent");
                    Symbol::extend(
                        &self.symbol_for(parent),
                        &Descriptor::Method(name, None),
                    )
                }

                NodeKind::Parameter { named: true } => {
                    let name = self.tree.name(node).unwrap_or_default();
                    let parent = self.tree.parent(node).expect("Parameter node has a parent");
                    Symbol::extend(&self.symbol_for(parent), &Descriptor::Parameter(name))
                }
                NodeKind::Parameter { named: false } => self.fresh_local(),

                NodeKind::ComprehensionTarget => self.fresh_local(),

                NodeKind::Name | NodeKind::TypeAnnotation => {
                    match self.innermost_scope_kind(node) {
                        Some(NodeKind::Function | NodeKind::Lambda) => self.fresh_local(),
                        _ => {
                            let name = self.tree.name(node).unwrap_or_default();
                            let parent = self.tree.parent(node).expect("Name node has a parent");
                            Symbol::extend(&self.symbol_for(parent), &Descriptor::Term(name))
                        }
                    }
                }

                NodeKind::Assignment => match self.innermost_scope_kind(node) {
                    Some(NodeKind::Function | NodeKind::Lambda) => self.fresh_local(),
                    Some(NodeKind::Module) if self.project_version_is_empty => self.fresh_local(),
                    _ => {
                        let name = self.tree.name(node).unwrap_or_default();
                        let parent = self
                            .tree
                            .parent(node)
                            .expect("Assignment node has a parent");
                        Symbol::extend(&self.symbol_for(parent), &Descriptor::Term(name))
                    }
                },

                NodeKind::ImportAs => {
                    let (dotted, target_path) = self.tree.import_target(node);
                    match self.resolver.package_for(&target_path, &dotted) {
                        None => self.fresh_local(),
                        Some(target_package) => Symbol::global(
                            &target_package,
                            &[
                                Descriptor::Namespace(dotted),
                                Descriptor::Meta("__init__".to_string()),
                            ],
                        ),
                    }
                }

                NodeKind::ImportFromModule => {
                    let (dotted, target_path) = self.tree.import_target(node);
                    match self.resolver.package_for(&target_path, &dotted) {
                        None => self.fresh_local(),
                        Some(target_package) => Symbol::global(
                            &target_package,
                            &[
                                Descriptor::Namespace(dotted),
                                Descriptor::Meta("__init__".to_string()),
                            ],
                        ),
                    }
                }

                // The binding's own symbol comes from the oracle's
                // `type_of` in the walker, not from here — a
                // from-import binds a name to whatever it's imported
                // from, which this computer has no way to look up on
                // its own.
                NodeKind::ImportFromBinding => Symbol::empty(),

                NodeKind::Decorator | NodeKind::Lambda => self.fresh_local(),

                NodeKind::Suite | NodeKind::Transparent => match self.tree.parent(node) {
                    Some(parent) => self.symbol_for(parent),
                    None => self.fresh_local(),
                },
            },
        };

        self.memo.borrow_mut().insert(node, symbol.clone());
        symbol
    }

    /// The module-level `__init__` symbol for a project-package source
    /// file, used by the walker's Module rule.
    pub fn module_init_symbol(&self, module_node: NodeId) -> Symbol {
        Symbol::extend(
            &self.symbol_for(module_node),
            &Descriptor::Meta("__init__".to_string()),
        )
    }

    pub fn fresh_local(&self) -> Symbol {
        self.locals.borrow_mut().fresh()
    }

    /// Walks up from `node`'s parent until it finds the nearest ancestor
    /// that is a Module, Class, Function or Lambda — the node-kind
    /// distinction the caller needs to decide locality, without
    /// re-deriving a symbol (unlike `symbol_for`, this never recurses
    /// through package resolution).
    fn innermost_scope_kind(&self, node: NodeId) -> Option<NodeKind> {
        let mut current = self.tree.parent(node)?;
        loop {
            match self.tree.kind(current) {
                kind @ (NodeKind::Module | NodeKind::Class | NodeKind::Function | NodeKind::Lambda) => {
                    return Some(kind);
                }
                _ => current = self.tree.parent(current)?,
            }
        }
    }
}
