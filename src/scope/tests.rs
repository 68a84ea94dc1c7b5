//! Unit tests for the scope tree.

use std::rc::Rc;

use crate::ast::types::{IntWidth, Type};
use crate::errors::errors::Category;
use crate::{Position, Span};

use super::scope::{ScopeKind, ScopeTree, Symbol, SymbolKind};

fn test_span() -> Span {
    let position = Position::start(Rc::new(String::from("test.opal")));
    Span {
        start: position.clone(),
        end: position,
    }
}

fn variable(name: &str) -> Symbol {
    Symbol {
        name: name.to_string(),
        kind: SymbolKind::Variable {
            ty: Type::Int(IntWidth::I64),
        },
        span: test_span(),
    }
}

#[test]
fn test_declare_and_lookup() {
    let mut scopes = ScopeTree::new();
    let root = scopes.push_scope(ScopeKind::Package, None);

    scopes.declare(root, variable("x")).unwrap();

    assert!(scopes.lookup(root, "x").is_some());
    assert!(scopes.lookup(root, "y").is_none());
}

#[test]
fn test_duplicate_declaration_is_rejected() {
    let mut scopes = ScopeTree::new();
    let root = scopes.push_scope(ScopeKind::Package, None);

    scopes.declare(root, variable("x")).unwrap();
    let error = scopes.declare(root, variable("x")).unwrap_err();

    assert_eq!(error.category(), Category::ScopeError);
}

#[test]
fn test_lookup_walks_to_the_root() {
    let mut scopes = ScopeTree::new();
    let root = scopes.push_scope(ScopeKind::Package, None);
    let function = scopes.push_scope(ScopeKind::Function, Some(root));
    let block = scopes.push_scope(ScopeKind::Block, Some(function));

    scopes.declare(root, variable("global")).unwrap();

    assert!(scopes.lookup(block, "global").is_some());
    assert!(scopes.lookup_local(block, "global").is_none());
}

#[test]
fn test_shadowing_across_nesting() {
    let mut scopes = ScopeTree::new();
    let root = scopes.push_scope(ScopeKind::Package, None);
    let inner = scopes.push_scope(ScopeKind::Block, Some(root));

    scopes.declare(root, variable("x")).unwrap();
    scopes
        .declare(
            inner,
            Symbol {
                name: String::from("x"),
                kind: SymbolKind::Variable {
                    ty: Type::Builtin(crate::ast::types::Builtin::Bool),
                },
                span: test_span(),
            },
        )
        .unwrap();

    let found = scopes.lookup(inner, "x").unwrap();
    assert!(matches!(
        &found.kind,
        SymbolKind::Variable { ty } if ty.is_bool()
    ));
}

#[test]
fn test_enclosing_function() {
    let mut scopes = ScopeTree::new();
    let root = scopes.push_scope(ScopeKind::Package, None);
    let function = scopes.push_scope(ScopeKind::Function, Some(root));
    let conditional = scopes.push_scope(ScopeKind::Conditional, Some(function));
    let block = scopes.push_scope(ScopeKind::Block, Some(conditional));

    assert_eq!(scopes.enclosing_function(block), Some(function));
    assert_eq!(scopes.enclosing_function(function), Some(function));
    assert_eq!(scopes.enclosing_function(root), None);
}

#[test]
fn test_scope_kind_flags() {
    let mut scopes = ScopeTree::new();
    let root = scopes.push_scope(ScopeKind::Package, None);
    let until = scopes.push_scope(ScopeKind::Loop, Some(root));

    assert!(scopes.kind(root).is_package());
    assert!(scopes.kind(until).is_loop());
    assert!(!scopes.kind(until).is_function());
    assert_eq!(scopes.parent(until), Some(root));
    assert_eq!(scopes.parent(root), None);
}
