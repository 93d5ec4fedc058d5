//! Decaf Abstract Syntax Tree node definitions.
//!
//! The tree is produced by an external parser and handed to the
//! declaration-building pass ([`crate::binder`]) fully formed.  Every node
//! struct carries a [`SourceLocation`] field (`loc`), and every node that the
//! pass binds to a scope carries a [`NodeId`] (`id`) that is unique within its
//! [`Program`].
//!
//! # Structure
//!
//! - [`Program`] — root node.
//! - [`Decl`] — top-level declarations; [`MemberDecl`] — class members.
//! - [`Stmt`] — statement nodes.
//! - [`Expr`] — expression nodes.
//! - [`Type`] — declared types (not bound to scopes).
//!
//! [`AstBuilder`] constructs well-formed trees with fresh ids.

use std::fmt;

mod builder;

pub use builder::AstBuilder;

// ─────────────────────────────────────────────────────────────────────────────
// Source location
// ─────────────────────────────────────────────────────────────────────────────

/// A byte offset + line/column location in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Byte offset from the beginning of the source string.
    pub offset: usize,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open `[start, end)` source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Inclusive start of the span.
    pub start: Position,
    /// Exclusive end of the span.
    pub end: Position,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

/// Source location attached to every AST node.
pub type SourceLocation = Span;

// ─────────────────────────────────────────────────────────────────────────────
// Node identity
// ─────────────────────────────────────────────────────────────────────────────

/// Identity of a tree node, unique within one [`Program`].
///
/// The scope tree maps node ids to the scope each node was bound under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap a raw id handed out by the parser.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw numeric id.
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic [`NodeId`] allocator for whoever constructs a tree.
#[derive(Debug, Default)]
pub struct NodeIdGen {
    next: u32,
}

impl NodeIdGen {
    /// Create a generator whose first id is `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next unused id.
    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u32 {
        self.next
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Program
// ─────────────────────────────────────────────────────────────────────────────

/// The root node of a parsed Decaf compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub id: NodeId,
    pub loc: SourceLocation,
    /// Top-level declarations in source order.
    pub decls: Vec<Decl>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers and types
// ─────────────────────────────────────────────────────────────────────────────

/// A Decaf identifier as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub loc: SourceLocation,
    pub name: String,
}

/// A declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Double,
    Bool,
    String,
    Void,
    /// The type of the `null` literal.
    Null,
    /// A class or interface name.
    Named(Ident),
    /// `T[]`.
    Array(Box<Type>),
}

// ─────────────────────────────────────────────────────────────────────────────
// Declarations
// ─────────────────────────────────────────────────────────────────────────────

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Fn(FnDecl),
}

impl Decl {
    /// Id of the declaration node.
    pub fn id(&self) -> NodeId {
        match self {
            Decl::Var(d) => d.id,
            Decl::Class(d) => d.id,
            Decl::Interface(d) => d.id,
            Decl::Fn(d) => d.id,
        }
    }

    /// The declared name.
    pub fn name(&self) -> &Ident {
        match self {
            Decl::Var(d) => &d.name,
            Decl::Class(d) => &d.name,
            Decl::Interface(d) => &d.name,
            Decl::Fn(d) => &d.name,
        }
    }

    /// Source location of the whole declaration.
    pub fn loc(&self) -> SourceLocation {
        match self {
            Decl::Var(d) => d.loc,
            Decl::Class(d) => d.loc,
            Decl::Interface(d) => d.loc,
            Decl::Fn(d) => d.loc,
        }
    }
}

/// A member of a class body: a field or a method.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberDecl {
    Var(VarDecl),
    Fn(FnDecl),
}

impl MemberDecl {
    /// Id of the field or method node.
    pub fn id(&self) -> NodeId {
        match self {
            MemberDecl::Var(d) => d.id,
            MemberDecl::Fn(d) => d.id,
        }
    }

    /// The declared name.
    pub fn name(&self) -> &Ident {
        match self {
            MemberDecl::Var(d) => &d.name,
            MemberDecl::Fn(d) => &d.name,
        }
    }
}

/// `T name;` — a global, field, local, or formal parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub name: Ident,
    pub ty: Type,
}

/// `class Name extends Base implements I, J { members }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub name: Ident,
    pub extends: Option<Ident>,
    pub implements: Vec<Ident>,
    pub members: Vec<MemberDecl>,
}

/// `interface Name { prototypes }`.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub name: Ident,
    /// Method prototypes; their `body` is always `None`.
    pub members: Vec<FnDecl>,
}

/// A function or method.  Prototypes inside an interface have no body.
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub name: Ident,
    pub return_type: Type,
    pub formals: Vec<VarDecl>,
    pub body: Option<Block>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────────────

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Switch(SwitchStmt),
    Return(ReturnStmt),
    Print(PrintStmt),
    Break(BreakStmt),
    Expr(ExprStmt),
}

impl Stmt {
    /// Id of the statement node.
    pub fn id(&self) -> NodeId {
        match self {
            Stmt::Block(s) => s.id,
            Stmt::If(s) => s.id,
            Stmt::While(s) => s.id,
            Stmt::For(s) => s.id,
            Stmt::Switch(s) => s.id,
            Stmt::Return(s) => s.id,
            Stmt::Print(s) => s.id,
            Stmt::Break(s) => s.id,
            Stmt::Expr(s) => s.id,
        }
    }

    /// Source location of the statement.
    pub fn loc(&self) -> SourceLocation {
        match self {
            Stmt::Block(s) => s.loc,
            Stmt::If(s) => s.loc,
            Stmt::While(s) => s.loc,
            Stmt::For(s) => s.loc,
            Stmt::Switch(s) => s.loc,
            Stmt::Return(s) => s.loc,
            Stmt::Print(s) => s.loc,
            Stmt::Break(s) => s.loc,
            Stmt::Expr(s) => s.loc,
        }
    }
}

/// `{ decls stmts }` — local declarations always precede statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub decls: Vec<VarDecl>,
    pub stmts: Vec<Stmt>,
}

/// `if (test) then_branch else else_branch`.  Neither branch opens a scope
/// of its own unless it is a block.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub test: Expr,
    pub then_branch: Box<Stmt>,
    /// `None` when there is no `else`.
    pub else_branch: Option<Box<Stmt>>,
}

/// `while (test) body`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub test: Expr,
    pub body: Box<Stmt>,
}

/// `for (init; test; step) body`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub init: ForInit,
    pub test: Expr,
    pub step: Expr,
    pub body: Box<Stmt>,
}

/// The init clause of a `for` header.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// `for (int i; …)` — visible only inside the loop.
    Var(VarDecl),
    /// An expression, possibly [`ExprKind::Empty`].
    Expr(Expr),
}

/// `switch (test) { case …: … default: … }`.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub test: Expr,
    pub cases: Vec<SwitchCase>,
    pub default: Option<SwitchCase>,
}

/// One arm of a [`SwitchStmt`].  `label` is `None` for the default arm.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub label: Option<Expr>,
    pub stmts: Vec<Stmt>,
}

impl SwitchCase {
    /// `true` for the `default:` arm.
    pub fn is_default(&self) -> bool {
        self.label.is_none()
    }
}

/// `return expr;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub id: NodeId,
    pub loc: SourceLocation,
    /// `None` for a bare `return;`.
    pub expr: Option<Expr>,
}

/// `Print(args…);`
#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub args: Vec<Expr>,
}

/// `break;`
#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    pub id: NodeId,
    pub loc: SourceLocation,
}

/// An expression evaluated for its side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub expr: Expr,
}

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub loc: SourceLocation,
    pub kind: ExprKind,
}

/// What an [`Expr`] computes.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Placeholder for an omitted optional expression (`for (;;)`).
    Empty,
    IntLit(i32),
    DoubleLit(f64),
    BoolLit(bool),
    StringLit(String),
    Null,
    This,
    /// A bare name reference.
    Ident(Ident),
    /// `base.field`
    Field {
        base: Box<Expr>,
        field: Ident,
    },
    /// `field(actuals)` or `base.field(actuals)`.
    Call {
        base: Option<Box<Expr>>,
        field: Ident,
        actuals: Vec<Expr>,
    },
    /// `target = value`
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Expr>,
    },
    /// `base[subscript]`
    Index {
        base: Box<Expr>,
        subscript: Box<Expr>,
    },
    /// `New(ClassName)`
    New {
        class: Ident,
    },
    /// `NewArray(size, elem)`
    NewArray {
        size: Box<Expr>,
        elem: Type,
    },
    /// `ReadInteger()`
    ReadInteger,
    /// `ReadLine()`
    ReadLine,
}

/// Arithmetic, relational, equality and logical binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

/// Prefix `-` and `!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Postfix `++` and `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Inc,
    Dec,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_gen_is_monotonic() {
        let mut ids = NodeIdGen::new();
        let a = ids.fresh();
        let b = ids.fresh();
        assert_eq!(a, NodeId::from_raw(0));
        assert_eq!(b.as_raw(), 1);
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_span_displays_start_line_and_column() {
        let span = Span {
            start: Position {
                offset: 10,
                line: 3,
                column: 7,
            },
            end: Position {
                offset: 12,
                line: 3,
                column: 9,
            },
        };
        assert_eq!(span.to_string(), "3:7");
    }

    #[test]
    fn test_decl_accessors_dispatch_per_variant() {
        let mut b = AstBuilder::new();
        let decl = Decl::Class(b.class("Shape", vec![]));
        assert_eq!(decl.name().name, "Shape");
        assert!(matches!(decl, Decl::Class(ref c) if c.id == decl.id()));
    }

    #[test]
    fn test_default_case_has_no_label() {
        let mut b = AstBuilder::new();
        let label = b.int(1);
        assert!(b.default_case(vec![]).is_default());
        assert!(!b.case(label, vec![]).is_default());
    }
}
