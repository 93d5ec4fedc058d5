#![no_main]

use decaf_core::ast::{AstBuilder, Block, Decl, ForInit, MemberDecl, Stmt, Type};
use decaf_core::build_scopes;
use decaf_core::scope::ScopeKind;
use libfuzzer_sys::fuzz_target;

const NAMES: [&str; 4] = ["a", "b", "c", "d"];
const MAX_DEPTH: usize = 16;

/// Build a block body from `data`, consuming bytes as it goes.  Each byte
/// selects an operation:
///
///  byte & 0x07 == 0 → declare a local named `NAMES[byte >> 6]`
///  byte & 0x07 == 1 → open a nested block
///  byte & 0x07 == 2 → open a `for` loop declaring a name in its header
///  byte & 0x07 == 3 → open an `if` (bit 3 clear) or `while` (bit 3 set)
///                     whose body is a nested block
///  byte & 0x07 == 4 → close the current block
///  other            → reference a name in a `Print`
fn build_block(b: &mut AstBuilder, data: &mut &[u8], depth: usize) -> Block {
    let mut decls = Vec::new();
    let mut stmts = Vec::new();
    while let Some((&byte, rest)) = data.split_first() {
        *data = rest;
        let name = NAMES[usize::from(byte >> 6)];
        match byte & 0x07 {
            0 => decls.push(b.var(name, Type::Int)),
            1 if depth < MAX_DEPTH => {
                let inner = build_block(b, data, depth + 1);
                stmts.push(Stmt::Block(inner));
            }
            2 if depth < MAX_DEPTH => {
                let init = b.var(name, Type::Int);
                let test = b.name(name);
                let step = b.empty();
                let body = Stmt::Block(build_block(b, data, depth + 1));
                stmts.push(b.for_stmt(ForInit::Var(init), test, step, body));
            }
            3 if depth < MAX_DEPTH => {
                let test = b.name(name);
                let body = Stmt::Block(build_block(b, data, depth + 1));
                stmts.push(if byte & 0x08 == 0 {
                    b.if_stmt(test, body, None)
                } else {
                    b.while_stmt(test, body)
                });
            }
            4 => break,
            _ => {
                let arg = b.name(name);
                stmts.push(b.print(vec![arg]));
            }
        }
    }
    b.block(decls, stmts)
}

fuzz_target!(|data: &[u8]| {
    let mut input = data;
    let mut b = AstBuilder::new();
    let field = b.var("a", Type::Int);
    let body = build_block(&mut b, &mut input, 0);
    let method = b.function("run", Type::Void, vec![], body);
    let class = b.class("Fuzz", vec![MemberDecl::Var(field), MemberDecl::Fn(method)]);
    let program = b.program(vec![Decl::Class(class)]);

    let tree = build_scopes(&program);

    // Every node the builder produced was bound exactly once.
    assert_eq!(tree.bound_nodes() as u32, b.ids_issued());

    for scope in tree.iter() {
        // Only the root is global, and parents precede children in the arena.
        assert_eq!(scope.is_global(), scope.id == tree.root());
        if let Some(parent) = scope.parent {
            assert!(parent < scope.id, "parent must be created first");
            assert!(tree.scope(parent).children.contains(&scope.id));
        }
        // Every non-root scope maps back from the node that opened it.
        if let Some(opener) = scope.opener {
            assert_eq!(tree.scope_opened_by(opener), Some(scope.id));
        } else {
            assert!(scope.is_global());
        }
        assert_eq!(scope.kind == ScopeKind::Global, scope.is_global());

        // Local declarations are always found, and the class field is
        // visible from everywhere inside the class.
        for (name, decl) in scope.symbols.iter() {
            assert_eq!(tree.find_symbol(scope.id, name), Some(decl));
        }
        if scope.id > 1 {
            assert!(tree.find_symbol(scope.id, "a").is_some());
        }
    }
});
