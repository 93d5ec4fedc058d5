//! Programmatic construction of well-formed trees.
//!
//! [`AstBuilder`] hands every node a fresh [`NodeId`] and a distinct
//! [`SourceLocation`] (each node lands on its own line), so diagnostics
//! produced from a built tree can be told apart by location.  Children must
//! be built before their parent, which keeps the borrow of the builder short:
//!
//! ```
//! use decaf_core::ast::{AstBuilder, Decl, Type};
//!
//! let mut b = AstBuilder::new();
//! let x = b.var("x", Type::Int);
//! let program = b.program(vec![Decl::Var(x)]);
//! assert_eq!(program.decls.len(), 1);
//! ```

use super::{
    BinaryOp, Block, BreakStmt, ClassDecl, Decl, Expr, ExprKind, ExprStmt, FnDecl, ForInit,
    ForStmt, Ident, IfStmt, InterfaceDecl, MemberDecl, NodeId, NodeIdGen, Position, PostfixOp,
    PrintStmt, Program, ReturnStmt, SourceLocation, Span, Stmt, SwitchCase, SwitchStmt, Type,
    UnaryOp, VarDecl, WhileStmt,
};

/// Builds tree nodes with fresh ids and synthetic locations.
#[derive(Debug, Default)]
pub struct AstBuilder {
    ids: NodeIdGen,
    line: u32,
}

impl AstBuilder {
    /// A builder whose first node gets id `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of node ids handed out so far.
    pub fn ids_issued(&self) -> u32 {
        self.ids.issued()
    }

    fn span(&mut self) -> SourceLocation {
        self.line += 1;
        let start = Position {
            offset: 0,
            line: self.line,
            column: 1,
        };
        Span {
            start,
            end: Position {
                column: 2,
                ..start
            },
        }
    }

    fn node(&mut self) -> (NodeId, SourceLocation) {
        (self.ids.fresh(), self.span())
    }

    /// An identifier; it gets a location but no node id.
    pub fn ident(&mut self, name: &str) -> Ident {
        Ident {
            loc: self.span(),
            name: name.to_owned(),
        }
    }

    // ── Declarations ─────────────────────────────────────────────────────────

    /// The root node wrapping `decls`.
    pub fn program(&mut self, decls: Vec<Decl>) -> Program {
        let (id, loc) = self.node();
        Program { id, loc, decls }
    }

    /// `ty name;`
    pub fn var(&mut self, name: &str, ty: Type) -> VarDecl {
        let (id, loc) = self.node();
        VarDecl {
            id,
            loc,
            name: self.ident(name),
            ty,
        }
    }

    /// A class with no `extends` or `implements` clause.
    pub fn class(&mut self, name: &str, members: Vec<MemberDecl>) -> ClassDecl {
        self.class_with_bases(name, None, &[], members)
    }

    /// A class with an optional base class and implemented interfaces.
    pub fn class_with_bases(
        &mut self,
        name: &str,
        extends: Option<&str>,
        implements: &[&str],
        members: Vec<MemberDecl>,
    ) -> ClassDecl {
        let (id, loc) = self.node();
        ClassDecl {
            id,
            loc,
            name: self.ident(name),
            extends: extends.map(|base| self.ident(base)),
            implements: implements.iter().map(|i| self.ident(i)).collect(),
            members,
        }
    }

    /// An interface whose members are [`AstBuilder::prototype`]s.
    pub fn interface(&mut self, name: &str, members: Vec<FnDecl>) -> InterfaceDecl {
        let (id, loc) = self.node();
        InterfaceDecl {
            id,
            loc,
            name: self.ident(name),
            members,
        }
    }

    /// A function or method with a body.
    pub fn function(
        &mut self,
        name: &str,
        return_type: Type,
        formals: Vec<VarDecl>,
        body: Block,
    ) -> FnDecl {
        let (id, loc) = self.node();
        FnDecl {
            id,
            loc,
            name: self.ident(name),
            return_type,
            formals,
            body: Some(body),
        }
    }

    /// A body-less method signature, as found in interfaces.
    pub fn prototype(&mut self, name: &str, return_type: Type, formals: Vec<VarDecl>) -> FnDecl {
        let (id, loc) = self.node();
        FnDecl {
            id,
            loc,
            name: self.ident(name),
            return_type,
            formals,
            body: None,
        }
    }

    // ── Statements ───────────────────────────────────────────────────────────

    /// A block as used for function bodies.
    pub fn block(&mut self, decls: Vec<VarDecl>, stmts: Vec<Stmt>) -> Block {
        let (id, loc) = self.node();
        Block {
            id,
            loc,
            decls,
            stmts,
        }
    }

    /// A block in statement position.
    pub fn block_stmt(&mut self, decls: Vec<VarDecl>, stmts: Vec<Stmt>) -> Stmt {
        Stmt::Block(self.block(decls, stmts))
    }

    /// `if (test) then_branch else else_branch`.
    pub fn if_stmt(&mut self, test: Expr, then_branch: Stmt, else_branch: Option<Stmt>) -> Stmt {
        let (id, loc) = self.node();
        Stmt::If(IfStmt {
            id,
            loc,
            test,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        })
    }

    /// `while (test) body`.
    pub fn while_stmt(&mut self, test: Expr, body: Stmt) -> Stmt {
        let (id, loc) = self.node();
        Stmt::While(WhileStmt {
            id,
            loc,
            test,
            body: Box::new(body),
        })
    }

    /// `for (init; test; step) body`.
    pub fn for_stmt(&mut self, init: ForInit, test: Expr, step: Expr, body: Stmt) -> Stmt {
        let (id, loc) = self.node();
        Stmt::For(ForStmt {
            id,
            loc,
            init,
            test,
            step,
            body: Box::new(body),
        })
    }

    /// `switch (test) { cases default }`.
    pub fn switch_stmt(
        &mut self,
        test: Expr,
        cases: Vec<SwitchCase>,
        default: Option<SwitchCase>,
    ) -> Stmt {
        let (id, loc) = self.node();
        Stmt::Switch(SwitchStmt {
            id,
            loc,
            test,
            cases,
            default,
        })
    }

    /// A labelled `case label:` arm.
    pub fn case(&mut self, label: Expr, stmts: Vec<Stmt>) -> SwitchCase {
        let (id, loc) = self.node();
        SwitchCase {
            id,
            loc,
            label: Some(label),
            stmts,
        }
    }

    /// The `default:` arm.
    pub fn default_case(&mut self, stmts: Vec<Stmt>) -> SwitchCase {
        let (id, loc) = self.node();
        SwitchCase {
            id,
            loc,
            label: None,
            stmts,
        }
    }

    /// `return expr;`, or a bare `return;` for `None`.
    pub fn return_stmt(&mut self, expr: Option<Expr>) -> Stmt {
        let (id, loc) = self.node();
        Stmt::Return(ReturnStmt { id, loc, expr })
    }

    /// `Print(args);`
    pub fn print(&mut self, args: Vec<Expr>) -> Stmt {
        let (id, loc) = self.node();
        Stmt::Print(PrintStmt { id, loc, args })
    }

    /// `break;`
    pub fn break_stmt(&mut self) -> Stmt {
        let (id, loc) = self.node();
        Stmt::Break(BreakStmt { id, loc })
    }

    /// `expr;`
    pub fn expr_stmt(&mut self, expr: Expr) -> Stmt {
        let (id, loc) = self.node();
        Stmt::Expr(ExprStmt { id, loc, expr })
    }

    // ── Expressions ──────────────────────────────────────────────────────────

    /// An expression of any kind; the helpers below cover the common ones.
    pub fn expr(&mut self, kind: ExprKind) -> Expr {
        let (id, loc) = self.node();
        Expr { id, loc, kind }
    }

    /// The placeholder for an omitted `for` clause.
    pub fn empty(&mut self) -> Expr {
        self.expr(ExprKind::Empty)
    }

    /// An integer literal.
    pub fn int(&mut self, value: i32) -> Expr {
        self.expr(ExprKind::IntLit(value))
    }

    /// A double literal.
    pub fn double(&mut self, value: f64) -> Expr {
        self.expr(ExprKind::DoubleLit(value))
    }

    /// `true` or `false`.
    pub fn boolean(&mut self, value: bool) -> Expr {
        self.expr(ExprKind::BoolLit(value))
    }

    /// A string literal.
    pub fn string(&mut self, value: &str) -> Expr {
        self.expr(ExprKind::StringLit(value.to_owned()))
    }

    /// `null`
    pub fn null(&mut self) -> Expr {
        self.expr(ExprKind::Null)
    }

    /// `this`
    pub fn this(&mut self) -> Expr {
        self.expr(ExprKind::This)
    }

    /// A bare reference to `name`.
    pub fn name(&mut self, name: &str) -> Expr {
        let ident = self.ident(name);
        self.expr(ExprKind::Ident(ident))
    }

    /// `base.field`
    pub fn field(&mut self, base: Expr, field: &str) -> Expr {
        let field = self.ident(field);
        self.expr(ExprKind::Field {
            base: Box::new(base),
            field,
        })
    }

    /// `field(actuals)`, or `base.field(actuals)` when `base` is given.
    pub fn call(&mut self, base: Option<Expr>, field: &str, actuals: Vec<Expr>) -> Expr {
        let field = self.ident(field);
        self.expr(ExprKind::Call {
            base: base.map(Box::new),
            field,
            actuals,
        })
    }

    /// `target = value`
    pub fn assign(&mut self, target: Expr, value: Expr) -> Expr {
        self.expr(ExprKind::Assign {
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    /// `left op right`
    pub fn binary(&mut self, op: BinaryOp, left: Expr, right: Expr) -> Expr {
        self.expr(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// `op operand`
    pub fn unary(&mut self, op: UnaryOp, operand: Expr) -> Expr {
        self.expr(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// `operand op`
    pub fn postfix(&mut self, op: PostfixOp, operand: Expr) -> Expr {
        self.expr(ExprKind::Postfix {
            op,
            operand: Box::new(operand),
        })
    }

    /// `base[subscript]`
    pub fn index(&mut self, base: Expr, subscript: Expr) -> Expr {
        self.expr(ExprKind::Index {
            base: Box::new(base),
            subscript: Box::new(subscript),
        })
    }

    /// `New(class)`
    pub fn new_object(&mut self, class: &str) -> Expr {
        let class = self.ident(class);
        self.expr(ExprKind::New { class })
    }

    /// `NewArray(size, elem)`
    pub fn new_array(&mut self, size: Expr, elem: Type) -> Expr {
        self.expr(ExprKind::NewArray {
            size: Box::new(size),
            elem,
        })
    }

    /// `ReadInteger()`
    pub fn read_integer(&mut self) -> Expr {
        self.expr(ExprKind::ReadInteger)
    }

    /// `ReadLine()`
    pub fn read_line(&mut self) -> Expr {
        self.expr(ExprKind::ReadLine)
    }
}
