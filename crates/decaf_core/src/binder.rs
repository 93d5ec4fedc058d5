//! The declaration-building pass.
//!
//! # Overview
//!
//! Call [`build_scopes`] to turn a parsed [`Program`] into a [`ScopeTree`].
//! The pass is a single depth-first traversal that
//!
//! - binds every node (declaration, statement, switch case, expression) to
//!   the scope it appears in — see [`ScopeTree::scope_of`];
//! - opens a new scope for each class body, interface body, function
//!   (formals + body), block statement and `for` header, reachable from the
//!   opening node through [`ScopeTree::scope_opened_by`];
//! - registers every variable, class, interface and function declaration in
//!   the table of the scope it is bound to.
//!
//! # Visibility rules
//!
//! - Class and interface members are all registered in the body scope before
//!   any method body is visited, so members see each other regardless of
//!   source order.
//! - A function body is a block whose scope is nested in the function scope
//!   that holds the formals.
//! - A `for` header scope holds names declared in the init clause; the loop
//!   body is bound under it, so those names are visible in test, step and
//!   body but not after the loop.
//! - `if`, `while` and `switch` (including every case) introduce no scope.
//!
//! Redeclarations are recorded in [`ScopeTree::errors`] and never stop the
//! traversal.  Unresolved references are left to the downstream checker
//! ([`ScopeTree::resolve`]).

use log::{debug, trace};

use crate::ast::{
    Block, ClassDecl, Decl, Expr, ExprKind, FnDecl, ForInit, InterfaceDecl, MemberDecl, NodeId,
    Program, Stmt, SwitchCase, VarDecl,
};
use crate::options::BindOptions;
use crate::scope::{DeclRef, ScopeId, ScopeKind, ScopeTree};

// ─────────────────────────────────────────────────────────────────────────────
// Public entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Build the scope tree for `program` with the default [`BindOptions`].
///
/// The tree is always returned; callers should inspect
/// [`ScopeTree::errors`] after the call.
pub fn build_scopes(program: &Program) -> ScopeTree<'_> {
    build_scopes_with(program, &BindOptions::default())
}

/// Build the scope tree for `program` with explicit options.
pub fn build_scopes_with<'ast>(program: &'ast Program, options: &BindOptions) -> ScopeTree<'ast> {
    let mut binder = Binder::new(*options);
    binder.bind_program(program);
    binder.finish()
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal binder
// ─────────────────────────────────────────────────────────────────────────────

struct Binder<'ast> {
    tree: ScopeTree<'ast>,
    options: BindOptions,
}

impl<'ast> Binder<'ast> {
    fn new(options: BindOptions) -> Self {
        Self {
            tree: ScopeTree::new(),
            options,
        }
    }

    fn finish(self) -> ScopeTree<'ast> {
        debug!(
            "scope tree built: {} scopes, {} bound nodes, {} errors",
            self.tree.len(),
            self.tree.bound_nodes(),
            self.tree.errors().len()
        );
        self.tree
    }

    // ── Scope management ─────────────────────────────────────────────────────

    /// Open a `kind` scope under `parent`, recorded as opened by `opener`.
    fn open_scope(
        &mut self,
        parent: ScopeId,
        opener: NodeId,
        kind: ScopeKind,
        owner: Option<DeclRef<'ast>>,
    ) -> ScopeId {
        let id = self.tree.new_scope(parent, opener, kind, owner);
        debug!(
            "opened {kind:?} scope {id} in {parent} at node {opener}{}",
            owner.map(|o| format!(" for `{}`", o.name())).unwrap_or_default()
        );
        id
    }

    fn bind(&mut self, node: NodeId, scope: ScopeId) {
        self.tree.bind_node(node, scope);
    }

    /// Register `decl` in `scope`, recording a redeclaration instead of
    /// failing.
    fn declare(&mut self, scope: ScopeId, decl: DeclRef<'ast>) {
        let name = decl.name();
        match self
            .tree
            .add_symbol(scope, name, decl, self.options.redeclaration)
        {
            Ok(()) => trace!("declared {} `{name}` in scope {scope}", decl.kind().as_str()),
            Err(err) => {
                debug!("{err}");
                self.tree.record_error(err);
            }
        }
    }

    // ── Declarations ─────────────────────────────────────────────────────────

    fn bind_program(&mut self, program: &'ast Program) {
        let global = self.tree.root();
        self.bind(program.id, global);
        for decl in &program.decls {
            self.bind_decl(decl, global);
        }
    }

    fn bind_decl(&mut self, decl: &'ast Decl, scope: ScopeId) {
        match decl {
            Decl::Var(v) => self.bind_var(v, scope),
            Decl::Class(c) => self.bind_class(c, scope),
            Decl::Interface(i) => self.bind_interface(i, scope),
            Decl::Fn(f) => self.bind_fn(f, scope),
        }
    }

    fn bind_var(&mut self, var: &'ast VarDecl, scope: ScopeId) {
        self.bind(var.id, scope);
        self.declare(scope, DeclRef::Var(var));
    }

    fn bind_class(&mut self, class: &'ast ClassDecl, scope: ScopeId) {
        self.bind(class.id, scope);
        self.declare(scope, DeclRef::Class(class));
        let body = self.open_scope(
            scope,
            class.id,
            ScopeKind::Class,
            Some(DeclRef::Class(class)),
        );

        // Register every member before visiting any method, so members are
        // mutually visible independent of source order.
        for member in &class.members {
            self.bind(member.id(), body);
            self.declare(body, DeclRef::from(member));
        }
        for member in &class.members {
            if let MemberDecl::Fn(f) = member {
                self.bind_fn_scope(f, body);
            }
        }
    }

    fn bind_interface(&mut self, interface: &'ast InterfaceDecl, scope: ScopeId) {
        self.bind(interface.id, scope);
        self.declare(scope, DeclRef::Interface(interface));
        let body = self.open_scope(
            scope,
            interface.id,
            ScopeKind::Interface,
            Some(DeclRef::Interface(interface)),
        );
        for proto in &interface.members {
            self.bind(proto.id, body);
            self.declare(body, DeclRef::Fn(proto));
        }
        for proto in &interface.members {
            self.bind_fn_scope(proto, body);
        }
    }

    fn bind_fn(&mut self, func: &'ast FnDecl, scope: ScopeId) {
        self.bind(func.id, scope);
        self.declare(scope, DeclRef::Fn(func));
        self.bind_fn_scope(func, scope);
    }

    /// Open the function scope of an already registered `func` and bind its
    /// formals and body under it.
    fn bind_fn_scope(&mut self, func: &'ast FnDecl, enclosing: ScopeId) {
        let fn_scope = self.open_scope(
            enclosing,
            func.id,
            ScopeKind::Function,
            Some(DeclRef::Fn(func)),
        );
        for formal in &func.formals {
            if self.options.register_formals {
                self.bind_var(formal, fn_scope);
            } else {
                self.bind(formal.id, fn_scope);
            }
        }
        if let Some(body) = &func.body {
            self.bind_block(body, fn_scope);
        }
    }

    // ── Statements ───────────────────────────────────────────────────────────

    fn bind_block(&mut self, block: &'ast Block, scope: ScopeId) {
        self.bind(block.id, scope);
        let inner = self.open_scope(scope, block.id, ScopeKind::Block, None);
        for var in &block.decls {
            self.bind_var(var, inner);
        }
        for stmt in &block.stmts {
            self.bind_stmt(stmt, inner);
        }
    }

    fn bind_stmt(&mut self, stmt: &'ast Stmt, scope: ScopeId) {
        match stmt {
            Stmt::Block(b) => self.bind_block(b, scope),
            Stmt::If(s) => {
                self.bind(s.id, scope);
                self.bind_expr(&s.test, scope);
                self.bind_stmt(&s.then_branch, scope);
                if let Some(else_branch) = &s.else_branch {
                    self.bind_stmt(else_branch, scope);
                }
            }
            Stmt::While(s) => {
                self.bind(s.id, scope);
                self.bind_expr(&s.test, scope);
                self.bind_stmt(&s.body, scope);
            }
            Stmt::For(s) => {
                self.bind(s.id, scope);
                let header = self.open_scope(scope, s.id, ScopeKind::ForHeader, None);
                match &s.init {
                    ForInit::Var(v) => self.bind_var(v, header),
                    ForInit::Expr(e) => self.bind_expr(e, header),
                }
                self.bind_expr(&s.test, header);
                self.bind_expr(&s.step, header);
                self.bind_stmt(&s.body, header);
            }
            Stmt::Switch(s) => {
                self.bind(s.id, scope);
                self.bind_expr(&s.test, scope);
                for case in s.cases.iter().chain(&s.default) {
                    self.bind_case(case, scope);
                }
            }
            Stmt::Return(s) => {
                self.bind(s.id, scope);
                if let Some(expr) = &s.expr {
                    self.bind_expr(expr, scope);
                }
            }
            Stmt::Print(s) => {
                self.bind(s.id, scope);
                for arg in &s.args {
                    self.bind_expr(arg, scope);
                }
            }
            Stmt::Break(s) => self.bind(s.id, scope),
            Stmt::Expr(s) => {
                self.bind(s.id, scope);
                self.bind_expr(&s.expr, scope);
            }
        }
    }

    fn bind_case(&mut self, case: &'ast SwitchCase, scope: ScopeId) {
        self.bind(case.id, scope);
        if let Some(label) = &case.label {
            self.bind_expr(label, scope);
        }
        for stmt in &case.stmts {
            self.bind_stmt(stmt, scope);
        }
    }

    // ── Expressions ──────────────────────────────────────────────────────────

    fn bind_expr(&mut self, expr: &'ast Expr, scope: ScopeId) {
        self.bind(expr.id, scope);
        match &expr.kind {
            ExprKind::Empty
            | ExprKind::IntLit(_)
            | ExprKind::DoubleLit(_)
            | ExprKind::BoolLit(_)
            | ExprKind::StringLit(_)
            | ExprKind::Null
            | ExprKind::This
            | ExprKind::Ident(_)
            | ExprKind::New { .. }
            | ExprKind::ReadInteger
            | ExprKind::ReadLine => {}
            ExprKind::Field { base, .. } => self.bind_expr(base, scope),
            ExprKind::Call { base, actuals, .. } => {
                if let Some(base) = base {
                    self.bind_expr(base, scope);
                }
                for actual in actuals {
                    self.bind_expr(actual, scope);
                }
            }
            ExprKind::Assign { target, value } => {
                self.bind_expr(target, scope);
                self.bind_expr(value, scope);
            }
            ExprKind::Binary { left, right, .. } => {
                self.bind_expr(left, scope);
                self.bind_expr(right, scope);
            }
            ExprKind::Unary { operand, .. } | ExprKind::Postfix { operand, .. } => {
                self.bind_expr(operand, scope)
            }
            ExprKind::Index { base, subscript } => {
                self.bind_expr(base, scope);
                self.bind_expr(subscript, scope);
            }
            ExprKind::NewArray { size, .. } => self.bind_expr(size, scope),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
