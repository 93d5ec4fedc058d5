//! The scope arena for one compilation unit.

use std::collections::HashMap;
use std::iter;

use smallvec::SmallVec;

use crate::ast::{ClassDecl, FnDecl, Ident, NodeId};
use crate::error::{BindError, BindResult};
use crate::options::RedeclarationPolicy;
use crate::scope::symtab::{DeclRef, SymbolTable};

/// Opaque identifier for a [`Scope`] in the [`ScopeTree`].
pub type ScopeId = usize;

// ─────────────────────────────────────────────────────────────────────────────
// Scope kind
// ─────────────────────────────────────────────────────────────────────────────

/// What introduced a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The root of a compilation unit.
    Global,
    /// A class body.
    Class,
    /// An interface body.
    Interface,
    /// Formal parameters of a function together with its body.
    Function,
    /// A `{ … }` statement block.
    Block,
    /// The `init; test; step` header of a `for` loop.
    ForHeader,
}

impl ScopeKind {
    /// Returns `true` for kinds that are owned by a declaration (class,
    /// interface, function).
    pub fn introduced_by_decl(self) -> bool {
        matches!(
            self,
            ScopeKind::Class | ScopeKind::Interface | ScopeKind::Function
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scope
// ─────────────────────────────────────────────────────────────────────────────

/// A single lexical environment.
#[derive(Debug, Clone)]
pub struct Scope<'ast> {
    /// Unique identifier within the [`ScopeTree`].
    pub id: ScopeId,
    /// The kind of this scope.
    pub kind: ScopeKind,
    /// The enclosing scope, or `None` for the global scope.
    pub parent: Option<ScopeId>,
    /// The tree node that opened this scope, or `None` for the global scope.
    pub opener: Option<NodeId>,
    /// Direct child scopes, in creation order.
    pub children: SmallVec<[ScopeId; 4]>,
    /// The class, interface or function that introduced this scope.
    pub owner: Option<DeclRef<'ast>>,
    /// Names declared directly in this scope.
    pub symbols: SymbolTable<'ast>,
}

impl<'ast> Scope<'ast> {
    fn new(
        id: ScopeId,
        kind: ScopeKind,
        parent: Option<ScopeId>,
        opener: Option<NodeId>,
        owner: Option<DeclRef<'ast>>,
    ) -> Self {
        Self {
            id,
            kind,
            parent,
            opener,
            children: SmallVec::new(),
            owner,
            symbols: SymbolTable::new(),
        }
    }

    /// Returns `true` for the root scope, the only one without a parent.
    pub fn is_global(&self) -> bool {
        self.parent.is_none()
    }

    /// Look `name` up in this scope's own table, ignoring ancestors.
    pub fn find_local(&self, name: &str) -> Option<DeclRef<'ast>> {
        self.symbols.find(name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ScopeTree
// ─────────────────────────────────────────────────────────────────────────────

/// Every scope of one compilation unit, plus the scope each tree node was
/// bound under.
///
/// The global scope is created by [`ScopeTree::new`] and is always
/// [`ScopeTree::root`]; every other scope has a parent.
#[derive(Debug, Clone)]
pub struct ScopeTree<'ast> {
    scopes: Vec<Scope<'ast>>,
    /// Node → the scope it was processed under.
    node_scopes: HashMap<NodeId, ScopeId>,
    /// Node → the scope it opened (blocks, functions, classes, interfaces,
    /// `for` headers).
    opened_scopes: HashMap<NodeId, ScopeId>,
    errors: Vec<BindError>,
}

impl Default for ScopeTree<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'ast> ScopeTree<'ast> {
    /// Create a tree holding only the global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(0, ScopeKind::Global, None, None, None)],
            node_scopes: HashMap::new(),
            opened_scopes: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// The global scope.
    pub fn root(&self) -> ScopeId {
        0
    }

    /// Returns a reference to the scope with the given `id`.
    ///
    /// # Panics
    /// Panics if `id` was not handed out by this tree.
    pub fn scope(&self, id: ScopeId) -> &Scope<'ast> {
        &self.scopes[id]
    }

    /// Number of scopes, including the global scope.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Always `false`: the global scope exists from construction.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// All scopes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Scope<'ast>> {
        self.scopes.iter()
    }

    /// Open a new scope nested in `parent` on behalf of the node `opener`.
    pub fn new_scope(
        &mut self,
        parent: ScopeId,
        opener: NodeId,
        kind: ScopeKind,
        owner: Option<DeclRef<'ast>>,
    ) -> ScopeId {
        let id = self.scopes.len();
        self.scopes
            .push(Scope::new(id, kind, Some(parent), Some(opener), owner));
        self.scopes[parent].children.push(id);
        let previous = self.opened_scopes.insert(opener, id);
        debug_assert!(previous.is_none(), "node {opener} opened two scopes");
        id
    }

    // ── Symbols ──────────────────────────────────────────────────────────────

    /// `scope` itself followed by each enclosing scope up to the root.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        iter::successors(Some(scope), move |&id| self.scopes[id].parent)
    }

    /// Resolve `name` from `scope` outward; the nearest declaration wins.
    pub fn find_symbol(&self, scope: ScopeId, name: &str) -> Option<DeclRef<'ast>> {
        self.find_symbol_with_scope(scope, name)
            .map(|(_, decl)| decl)
    }

    /// Like [`ScopeTree::find_symbol`] but also reports which scope held the
    /// declaration.
    pub fn find_symbol_with_scope(
        &self,
        scope: ScopeId,
        name: &str,
    ) -> Option<(ScopeId, DeclRef<'ast>)> {
        self.ancestors(scope)
            .find_map(|id| self.scopes[id].find_local(name).map(|decl| (id, decl)))
    }

    /// Look `name` up in `scope` only.
    pub fn find_local(&self, scope: ScopeId, name: &str) -> Option<DeclRef<'ast>> {
        self.scopes[scope].find_local(name)
    }

    /// Declare `name` in `scope`'s own table.
    ///
    /// If the name is already bound there, `policy` decides which declaration
    /// stays in the table and a [`BindError::DuplicateDeclaration`] carrying
    /// both locations is returned.
    pub fn add_symbol(
        &mut self,
        scope: ScopeId,
        name: &str,
        decl: DeclRef<'ast>,
        policy: RedeclarationPolicy,
    ) -> BindResult<()> {
        let symbols = &mut self.scopes[scope].symbols;
        let Some(previous) = symbols.find(name) else {
            symbols.add(name, decl);
            return Ok(());
        };
        if policy == RedeclarationPolicy::Replace {
            symbols.add(name, decl);
        }
        Err(BindError::DuplicateDeclaration {
            name: name.to_owned(),
            loc: decl.loc(),
            previous: previous.loc(),
        })
    }

    /// Resolve a reference for a downstream checker, turning a miss into
    /// [`BindError::UnresolvedIdentifier`].
    pub fn resolve(&self, scope: ScopeId, ident: &Ident) -> BindResult<DeclRef<'ast>> {
        self.find_symbol(scope, &ident.name)
            .ok_or_else(|| BindError::UnresolvedIdentifier {
                name: ident.name.clone(),
                loc: ident.loc,
            })
    }

    // ── Owning declarations ──────────────────────────────────────────────────

    /// The declaration that introduced the nearest declaration-owned scope
    /// enclosing (or equal to) `scope`.
    pub fn enclosing_decl(&self, scope: ScopeId) -> Option<DeclRef<'ast>> {
        self.ancestors(scope).find_map(|id| self.scopes[id].owner)
    }

    /// The class whose body encloses `scope`, if any.
    pub fn enclosing_class(&self, scope: ScopeId) -> Option<&'ast ClassDecl> {
        self.ancestors(scope)
            .find_map(|id| self.scopes[id].owner.and_then(DeclRef::as_class))
    }

    /// The innermost function whose parameters or body enclose `scope`.
    pub fn enclosing_function(&self, scope: ScopeId) -> Option<&'ast FnDecl> {
        self.ancestors(scope)
            .find_map(|id| self.scopes[id].owner.and_then(DeclRef::as_fn))
    }

    // ── Node bindings ────────────────────────────────────────────────────────

    /// Record that `node` was processed under `scope`.
    ///
    /// Each node is bound once per tree; a repeated id means the parser
    /// handed out duplicate node ids.
    pub fn bind_node(&mut self, node: NodeId, scope: ScopeId) {
        let previous = self.node_scopes.insert(node, scope);
        debug_assert!(previous.is_none(), "node {node} bound twice");
    }

    /// The scope `node` was bound under, or `None` if the node was never
    /// processed.
    pub fn scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.node_scopes.get(&node).copied()
    }

    /// The scope `node` opened, or `None` if the node opens no scope.
    ///
    /// This is how a checker reaches the inside of a block, function, class,
    /// interface or `for` header, whereas [`ScopeTree::scope_of`] gives the
    /// scope the node itself sits in.
    pub fn scope_opened_by(&self, node: NodeId) -> Option<ScopeId> {
        self.opened_scopes.get(&node).copied()
    }

    /// Number of nodes bound so far.
    pub fn bound_nodes(&self) -> usize {
        self.node_scopes.len()
    }

    // ── Diagnostics ──────────────────────────────────────────────────────────

    pub(crate) fn record_error(&mut self, error: BindError) {
        self.errors.push(error);
    }

    /// Conditions collected while building the tree, in discovery order.
    pub fn errors(&self) -> &[BindError] {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, Type};

    fn node(raw: u32) -> NodeId {
        NodeId::from_raw(raw)
    }

    #[test]
    fn test_new_tree_has_only_global_scope() {
        let tree = ScopeTree::new();
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        let root = tree.scope(tree.root());
        assert_eq!(root.kind, ScopeKind::Global);
        assert!(root.is_global());
        assert!(root.owner.is_none());
    }

    #[test]
    fn test_new_scope_links_parent_and_child() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let block = tree.new_scope(root, node(1), ScopeKind::Block, None);
        assert_eq!(tree.scope(block).parent, Some(root));
        assert_eq!(tree.scope(block).opener, Some(node(1)));
        assert!(!tree.scope(block).is_global());
        assert_eq!(tree.scope(root).children.as_slice(), &[block]);
    }

    #[test]
    fn test_find_symbol_walks_outward() {
        let mut b = AstBuilder::new();
        let x = b.var("x", Type::Int);
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let inner = tree.new_scope(root, node(1), ScopeKind::Block, None);
        let innermost = tree.new_scope(inner, node(2), ScopeKind::Block, None);
        let policy = RedeclarationPolicy::Replace;
        tree.add_symbol(root, "x", DeclRef::Var(&x), policy)
            .unwrap();

        assert_eq!(tree.find_symbol(innermost, "x"), Some(DeclRef::Var(&x)));
        assert_eq!(
            tree.find_symbol_with_scope(innermost, "x").map(|(s, _)| s),
            Some(root)
        );
        assert!(tree.find_local(innermost, "x").is_none());
    }

    #[test]
    fn test_inner_declaration_shadows_outer() {
        let mut b = AstBuilder::new();
        let outer = b.var("x", Type::Int);
        let inner_x = b.var("x", Type::Bool);
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let inner = tree.new_scope(root, node(1), ScopeKind::Block, None);
        let policy = RedeclarationPolicy::Replace;
        tree.add_symbol(root, "x", DeclRef::Var(&outer), policy)
            .unwrap();
        tree.add_symbol(inner, "x", DeclRef::Var(&inner_x), policy)
            .unwrap();

        assert_eq!(tree.find_symbol(inner, "x"), Some(DeclRef::Var(&inner_x)));
        assert_eq!(tree.find_symbol(root, "x"), Some(DeclRef::Var(&outer)));
    }

    #[test]
    fn test_add_symbol_never_writes_to_ancestors() {
        let mut b = AstBuilder::new();
        let y = b.var("y", Type::Int);
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let inner = tree.new_scope(root, node(1), ScopeKind::Block, None);
        let policy = RedeclarationPolicy::Replace;
        tree.add_symbol(inner, "y", DeclRef::Var(&y), policy)
            .unwrap();
        assert!(tree.find_symbol(root, "y").is_none());
    }

    #[test]
    fn test_duplicate_replace_policy_keeps_second() {
        let mut b = AstBuilder::new();
        let first = b.var("x", Type::Int);
        let second = b.var("x", Type::Int);
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let policy = RedeclarationPolicy::Replace;
        tree.add_symbol(root, "x", DeclRef::Var(&first), policy)
            .unwrap();
        let err = tree
            .add_symbol(root, "x", DeclRef::Var(&second), policy)
            .unwrap_err();

        assert_eq!(
            err,
            BindError::DuplicateDeclaration {
                name: "x".to_owned(),
                loc: second.loc,
                previous: first.loc,
            }
        );
        assert_eq!(tree.find_symbol(root, "x"), Some(DeclRef::Var(&second)));
    }

    #[test]
    fn test_duplicate_keep_first_policy_keeps_first() {
        let mut b = AstBuilder::new();
        let first = b.var("x", Type::Int);
        let second = b.var("x", Type::Int);
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let policy = RedeclarationPolicy::KeepFirst;
        tree.add_symbol(root, "x", DeclRef::Var(&first), policy)
            .unwrap();
        assert!(
            tree.add_symbol(root, "x", DeclRef::Var(&second), policy)
                .is_err()
        );
        assert_eq!(tree.find_symbol(root, "x"), Some(DeclRef::Var(&first)));
    }

    #[test]
    fn test_resolve_reports_unresolved_identifier() {
        let mut b = AstBuilder::new();
        let missing = b.ident("ghost");
        let tree = ScopeTree::new();
        let err = tree.resolve(tree.root(), &missing).unwrap_err();
        assert_eq!(
            err,
            BindError::UnresolvedIdentifier {
                name: "ghost".to_owned(),
                loc: missing.loc,
            }
        );
    }

    #[test]
    fn test_enclosing_class_and_function() {
        let mut b = AstBuilder::new();
        let body = b.block(vec![], vec![]);
        let method = b.function("area", Type::Double, vec![], body);
        let class = b.class("Shape", vec![]);
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let class_scope = tree.new_scope(
            root,
            class.id,
            ScopeKind::Class,
            Some(DeclRef::Class(&class)),
        );
        let fn_scope = tree.new_scope(
            class_scope,
            method.id,
            ScopeKind::Function,
            Some(DeclRef::Fn(&method)),
        );
        let block = tree.new_scope(fn_scope, node(99), ScopeKind::Block, None);

        assert_eq!(tree.enclosing_decl(block), Some(DeclRef::Fn(&method)));
        let function = tree.enclosing_function(block).unwrap();
        assert!(std::ptr::eq(function, &method));
        let owner = tree.enclosing_class(block).unwrap();
        assert!(std::ptr::eq(owner, &class));
        assert!(tree.enclosing_class(root).is_none());
        assert!(tree.enclosing_function(class_scope).is_none());
    }

    #[test]
    fn test_ancestors_ends_at_root() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let a = tree.new_scope(root, node(1), ScopeKind::Block, None);
        let b = tree.new_scope(a, node(2), ScopeKind::ForHeader, None);
        let chain: Vec<ScopeId> = tree.ancestors(b).collect();
        assert_eq!(chain, vec![b, a, root]);
    }

    #[test]
    fn test_node_bindings() {
        let mut tree = ScopeTree::new();
        let node = NodeId::from_raw(7);
        assert!(tree.scope_of(node).is_none());
        tree.bind_node(node, tree.root());
        assert_eq!(tree.scope_of(node), Some(tree.root()));
        assert_eq!(tree.bound_nodes(), 1);
    }

    #[test]
    fn test_scope_opened_by_tells_siblings_apart() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let first = tree.new_scope(root, node(1), ScopeKind::Block, None);
        let second = tree.new_scope(root, node(2), ScopeKind::Block, None);
        tree.bind_node(node(1), root);
        tree.bind_node(node(2), root);

        assert_eq!(tree.scope_opened_by(node(1)), Some(first));
        assert_eq!(tree.scope_opened_by(node(2)), Some(second));
        assert_ne!(first, second);
        // Both openers sit in the same enclosing scope.
        assert_eq!(tree.scope_of(node(1)), tree.scope_of(node(2)));
        assert!(tree.scope_opened_by(node(3)).is_none());
        assert!(tree.scope(root).opener.is_none());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "bound twice")]
    fn test_binding_a_node_twice_panics_in_debug() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let inner = tree.new_scope(root, node(1), ScopeKind::Block, None);
        tree.bind_node(node(5), root);
        tree.bind_node(node(5), inner);
    }

    #[test]
    fn test_scope_kind_introduced_by_decl() {
        assert!(ScopeKind::Class.introduced_by_decl());
        assert!(ScopeKind::Interface.introduced_by_decl());
        assert!(ScopeKind::Function.introduced_by_decl());
        assert!(!ScopeKind::Global.introduced_by_decl());
        assert!(!ScopeKind::Block.introduced_by_decl());
        assert!(!ScopeKind::ForHeader.introduced_by_decl());
    }
}
