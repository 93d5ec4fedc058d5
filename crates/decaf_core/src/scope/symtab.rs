//! Per-scope symbol tables and the declaration references they store.

use std::collections::HashMap;
use std::ptr;

use crate::ast::{
    ClassDecl, Decl, FnDecl, InterfaceDecl, MemberDecl, NodeId, SourceLocation, VarDecl,
};

// ─────────────────────────────────────────────────────────────────────────────
// Declaration kind
// ─────────────────────────────────────────────────────────────────────────────

/// The syntactic origin of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Variable,
    Class,
    Interface,
    Function,
}

impl DeclKind {
    /// Lower-case name used in log and diagnostic text.
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Variable => "variable",
            DeclKind::Class => "class",
            DeclKind::Interface => "interface",
            DeclKind::Function => "function",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DeclRef
// ─────────────────────────────────────────────────────────────────────────────

/// A borrowed reference to a declaration node inside the tree.
///
/// Equality is node identity: two `DeclRef`s are equal only when they point
/// at the very same declaration, even if another declaration has the same
/// name and shape.
#[derive(Debug, Clone, Copy)]
pub enum DeclRef<'ast> {
    Var(&'ast VarDecl),
    Class(&'ast ClassDecl),
    Interface(&'ast InterfaceDecl),
    Fn(&'ast FnDecl),
}

impl<'ast> DeclRef<'ast> {
    /// The declared name.
    pub fn name(self) -> &'ast str {
        match self {
            DeclRef::Var(d) => &d.name.name,
            DeclRef::Class(d) => &d.name.name,
            DeclRef::Interface(d) => &d.name.name,
            DeclRef::Fn(d) => &d.name.name,
        }
    }

    /// Where the declaration appears in the source.
    pub fn loc(self) -> SourceLocation {
        match self {
            DeclRef::Var(d) => d.loc,
            DeclRef::Class(d) => d.loc,
            DeclRef::Interface(d) => d.loc,
            DeclRef::Fn(d) => d.loc,
        }
    }

    /// Id of the declaration node.
    pub fn node_id(self) -> NodeId {
        match self {
            DeclRef::Var(d) => d.id,
            DeclRef::Class(d) => d.id,
            DeclRef::Interface(d) => d.id,
            DeclRef::Fn(d) => d.id,
        }
    }

    /// Which kind of declaration this points at.
    pub fn kind(self) -> DeclKind {
        match self {
            DeclRef::Var(_) => DeclKind::Variable,
            DeclRef::Class(_) => DeclKind::Class,
            DeclRef::Interface(_) => DeclKind::Interface,
            DeclRef::Fn(_) => DeclKind::Function,
        }
    }

    /// `true` if both references point at the same node.
    pub fn same_as(self, other: DeclRef<'_>) -> bool {
        match (self, other) {
            (DeclRef::Var(a), DeclRef::Var(b)) => ptr::eq(a, b),
            (DeclRef::Class(a), DeclRef::Class(b)) => ptr::eq(a, b),
            (DeclRef::Interface(a), DeclRef::Interface(b)) => ptr::eq(a, b),
            (DeclRef::Fn(a), DeclRef::Fn(b)) => ptr::eq(a, b),
            _ => false,
        }
    }

    /// The variable declaration, if this is one.
    pub fn as_var(self) -> Option<&'ast VarDecl> {
        match self {
            DeclRef::Var(d) => Some(d),
            _ => None,
        }
    }

    /// The class declaration, if this is one.
    pub fn as_class(self) -> Option<&'ast ClassDecl> {
        match self {
            DeclRef::Class(d) => Some(d),
            _ => None,
        }
    }

    /// The interface declaration, if this is one.
    pub fn as_interface(self) -> Option<&'ast InterfaceDecl> {
        match self {
            DeclRef::Interface(d) => Some(d),
            _ => None,
        }
    }

    /// The function or prototype declaration, if this is one.
    pub fn as_fn(self) -> Option<&'ast FnDecl> {
        match self {
            DeclRef::Fn(d) => Some(d),
            _ => None,
        }
    }
}

impl PartialEq for DeclRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(*other)
    }
}

impl Eq for DeclRef<'_> {}

impl<'ast> From<&'ast Decl> for DeclRef<'ast> {
    fn from(decl: &'ast Decl) -> Self {
        match decl {
            Decl::Var(d) => DeclRef::Var(d),
            Decl::Class(d) => DeclRef::Class(d),
            Decl::Interface(d) => DeclRef::Interface(d),
            Decl::Fn(d) => DeclRef::Fn(d),
        }
    }
}

impl<'ast> From<&'ast MemberDecl> for DeclRef<'ast> {
    fn from(member: &'ast MemberDecl) -> Self {
        match member {
            MemberDecl::Var(d) => DeclRef::Var(d),
            MemberDecl::Fn(d) => DeclRef::Fn(d),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SymbolTable
// ─────────────────────────────────────────────────────────────────────────────

/// Mapping from name to the declaration currently bound to it, local to one
/// scope.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable<'ast> {
    entries: HashMap<String, DeclRef<'ast>>,
}

impl<'ast> SymbolTable<'ast> {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Look `name` up in this table only.
    pub fn find(&self, name: &str) -> Option<DeclRef<'ast>> {
        self.entries.get(name).copied()
    }

    /// Bind `name` to `decl`, returning the declaration it displaced, if any.
    pub fn add(&mut self, name: &str, decl: DeclRef<'ast>) -> Option<DeclRef<'ast>> {
        self.entries.insert(name.to_owned(), decl)
    }

    /// `true` if `name` is bound in this table.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no name is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, DeclRef<'ast>)> + '_ {
        self.entries.iter().map(|(name, decl)| (name.as_str(), *decl))
    }
}
