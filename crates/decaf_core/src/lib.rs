//! `decaf_core` — declaration binding and scope resolution for the Decaf
//! compiler.
//!
//! # Crate layout
//!
//! - [`ast`] — Syntax tree handed over by the parser.
//! - [`scope`] — Scopes, symbol tables and the per-unit [`scope::ScopeTree`].
//! - [`binder`] — The declaration-building pass that populates a scope tree.
//! - [`options`] — Pass configuration.
//! - [`error`] — Binding diagnostics.

/// Decaf syntax tree node types.
pub mod ast;
/// The declaration-building pass.
pub mod binder;
/// Error types for binding and resolution.
pub mod error;
/// Options for the declaration-building pass.
pub mod options;
/// Lexical scopes and symbol tables.
pub mod scope;

pub use binder::{build_scopes, build_scopes_with};
