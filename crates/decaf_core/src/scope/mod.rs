//! Lexical scopes and symbol tables.
//!
//! # Overview
//!
//! A [`ScopeTree`] is an arena of [`Scope`]s indexed by [`ScopeId`].  Each
//! scope owns a [`SymbolTable`] mapping names to [`DeclRef`]s (borrowed
//! references into the syntax tree), knows its parent, and optionally the
//! declaration that introduced it.  Lookup walks outward from a scope to the
//! global root, so the nearest declaration shadows outer ones; insertion only
//! ever touches the scope's own table.
//!
//! Two side maps relate tree nodes to scopes: [`ScopeTree::scope_of`] gives
//! the scope a node sits in, [`ScopeTree::scope_opened_by`] the scope a
//! block, function, class, interface or `for` node opened.
//!
//! The tree is populated by [`crate::binder`] and is read-only afterwards.

mod symtab;
mod tree;

pub use symtab::{DeclKind, DeclRef, SymbolTable};
pub use tree::{Scope, ScopeId, ScopeKind, ScopeTree};
