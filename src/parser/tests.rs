//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs
//! including declarations, control flow, expressions with precedence,
//! and the scope discipline: every push is matched by a pop before a
//! parse call returns, on error paths too.

use std::rc::Rc;

use crate::ast::ast::{Decl, Package};
use crate::ast::expressions::{BinaryOp, Expr};
use crate::ast::statements::Stmt;
use crate::ast::types::{IntWidth, Type};
use crate::errors::errors::{Category, Diagnostic, DiagnosticKind};
use crate::lexer::lexer::Lexer;
use crate::scope::scope::{ScopeKind, ScopeTree, SymbolKind};

use super::parser::{parse_package, Parser};
use super::stmt::parse_stmt;

fn parse_source(source: &str) -> Result<(Package, ScopeTree), Diagnostic> {
    let mut scopes = ScopeTree::new();
    let package = parse_package(
        source,
        String::from("test"),
        String::from("test.opal"),
        &mut scopes,
    )?;
    Ok((package, scopes))
}

/// Parses a one-function package and returns the statements of its body.
fn parse_body(body: &str) -> Vec<Stmt> {
    let source = format!("fn test() {{ {} }}", body);
    let (package, _) = parse_source(&source).expect("body should parse");

    match package.declarations.into_iter().next() {
        Some(Decl::Function(function)) => function.body.expect("body").statements,
        other => panic!("expected a function, got {:?}", other),
    }
}

fn first_expr(body: &str) -> Expr {
    match parse_body(body).into_iter().next() {
        Some(Stmt::Expression(expr)) => expr,
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_empty_package() {
    let (package, _) = parse_source("").unwrap();

    assert!(package.imports.is_empty());
    assert!(package.declarations.is_empty());
}

#[test]
fn test_parse_imports() {
    let (package, _) = parse_source("pkg math;\npkg io;\nfn test() { }").unwrap();

    let names: Vec<&str> = package
        .imports
        .iter()
        .map(|import| import.name.as_str())
        .collect();
    assert_eq!(names, vec!["math", "io"]);
}

#[test]
fn test_parse_function_declaration() {
    let (package, _) = parse_source("fn add(a: int, b: int) -> int { return a + b; }").unwrap();

    match &package.declarations[0] {
        Decl::Function(function) => {
            assert_eq!(function.name, "add");
            assert_eq!(function.parameters.len(), 2);
            assert_eq!(function.return_type, Type::Int(IntWidth::I64));
            assert!(function.body.is_some());
        }
        other => panic!("expected a function, got {:?}", other),
    }
}

#[test]
fn test_parse_private_declaration() {
    let (package, _) = parse_source("priv fn helper() { }").unwrap();

    match &package.declarations[0] {
        Decl::Function(function) => assert!(function.is_private),
        other => panic!("expected a function, got {:?}", other),
    }
}

#[test]
fn test_parse_struct_declaration() {
    let (package, scopes) = parse_source("struct Point { x: int, y: int }").unwrap();

    match &package.declarations[0] {
        Decl::Struct(decl) => {
            assert_eq!(decl.name, "Point");
            assert_eq!(decl.fields.len(), 2);
            assert!(scopes.lookup_local(decl.scope, "x").is_some());
        }
        other => panic!("expected a struct, got {:?}", other),
    }
}

#[test]
fn test_struct_field_type_is_a_placeholder() {
    let (package, _) = parse_source("struct Node { next: #Node }").unwrap();

    match &package.declarations[0] {
        Decl::Struct(decl) => {
            assert_eq!(
                decl.fields[0].ty,
                Type::Rune(Box::new(Type::Named(String::from("Node"))))
            );
        }
        other => panic!("expected a struct, got {:?}", other),
    }
}

#[test]
fn test_parse_trait_declaration() {
    let (package, _) = parse_source("trait Shape { fn area(width: int) -> int; }").unwrap();

    match &package.declarations[0] {
        Decl::Trait(decl) => {
            assert_eq!(decl.name, "Shape");
            assert_eq!(decl.methods.len(), 1);
            assert!(decl.methods[0].body.is_none());
        }
        other => panic!("expected a trait, got {:?}", other),
    }
}

#[test]
fn test_trait_method_body_is_rejected() {
    let error = parse_source("trait Shape { fn area() -> int { return 1; } }").unwrap_err();

    assert_eq!(error.category(), Category::ParseError);
    assert!(matches!(
        error.kind(),
        DiagnosticKind::TraitMethodBody { name } if name == "area"
    ));
}

#[test]
fn test_parse_enum_declaration() {
    let (package, _) = parse_source("enum Color { Red, Green, Blue }").unwrap();

    match &package.declarations[0] {
        Decl::Enum(decl) => {
            assert_eq!(decl.variants.len(), 3);
            assert_eq!(decl.variants[2].name, "Blue");
        }
        other => panic!("expected an enum, got {:?}", other),
    }
}

#[test]
fn test_impl_methods_register_in_struct_scope() {
    let source = "struct Point { x: int }\nimpl Point { fn get(p: Point) -> int { return x; } }";
    let (package, scopes) = parse_source(source).unwrap();

    let struct_scope = match &package.declarations[0] {
        Decl::Struct(decl) => decl.scope,
        other => panic!("expected a struct, got {:?}", other),
    };

    let method = scopes.lookup_local(struct_scope, "get").expect("method");
    assert!(matches!(method.kind, SymbolKind::Function(_)));
}

#[test]
fn test_impl_of_unknown_struct_fails() {
    let error = parse_source("impl Missing { fn f() { } }").unwrap_err();

    assert!(matches!(
        error.kind(),
        DiagnosticKind::UnknownType { name } if name == "Missing"
    ));
}

#[test]
fn test_parse_variable_declaration() {
    let statements = parse_body("let x: int = 42;");

    assert!(matches!(&statements[0], Stmt::Declaration(decl) if decl.name == "x"));
}

#[test]
fn test_duplicate_declaration_fails() {
    let error = parse_source("fn test() { let x: int = 1; let x: int = 2; }").unwrap_err();

    assert_eq!(error.category(), Category::ScopeError);
}

#[test]
fn test_duplicate_functions_fail() {
    let error = parse_source("fn f() { }\nfn f() { }").unwrap_err();

    assert!(matches!(
        error.kind(),
        DiagnosticKind::DuplicateDeclaration { name } if name == "f"
    ));
}

#[test]
fn test_multiplication_binds_tighter_on_the_right() {
    let expr = first_expr("1 + 2 * 3;");

    match expr {
        Expr::Binary(add) => {
            assert_eq!(add.op, BinaryOp::Add);
            assert!(matches!(*add.left, Expr::Integer(1, _)));
            match *add.right {
                Expr::Binary(mul) => {
                    assert_eq!(mul.op, BinaryOp::Mul);
                    assert!(matches!(*mul.left, Expr::Integer(2, _)));
                    assert!(matches!(*mul.right, Expr::Integer(3, _)));
                }
                other => panic!("expected a product, got {:?}", other),
            }
        }
        other => panic!("expected a sum, got {:?}", other),
    }
}

#[test]
fn test_multiplication_binds_tighter_on_the_left() {
    let expr = first_expr("1 * 2 + 3;");

    match expr {
        Expr::Binary(add) => {
            assert_eq!(add.op, BinaryOp::Add);
            assert!(matches!(*add.left, Expr::Binary(ref mul) if mul.op == BinaryOp::Mul));
            assert!(matches!(*add.right, Expr::Integer(3, _)));
        }
        other => panic!("expected a sum, got {:?}", other),
    }
}

#[test]
fn test_ties_associate_left() {
    let expr = first_expr("1 - 2 - 3;");

    match expr {
        Expr::Binary(outer) => {
            assert_eq!(outer.op, BinaryOp::Sub);
            assert!(matches!(*outer.left, Expr::Binary(ref inner) if inner.op == BinaryOp::Sub));
            assert!(matches!(*outer.right, Expr::Integer(3, _)));
        }
        other => panic!("expected a difference, got {:?}", other),
    }
}

#[test]
fn test_member_binds_tighter_than_prefix() {
    let expr = first_expr("!a.b;");

    match expr {
        Expr::Unary(not) => assert!(matches!(*not.operand, Expr::Member(_))),
        other => panic!("expected a unary expression, got {:?}", other),
    }
}

#[test]
fn test_parse_rune_operators() {
    let expr = first_expr("#p;");
    assert!(matches!(expr, Expr::Unary(_)));

    let expr = first_expr("@x;");
    assert!(matches!(expr, Expr::Unary(_)));
}

#[test]
fn test_parse_postfix_increment() {
    let expr = first_expr("i++;");
    assert!(matches!(expr, Expr::Postfix(_)));
}

#[test]
fn test_parse_call_and_member_call() {
    let expr = first_expr("f(1, 2);");
    assert!(matches!(expr, Expr::Call(ref call) if call.arguments.len() == 2));

    let expr = first_expr("p.dist(q);");
    assert!(matches!(expr, Expr::MethodCall(ref call) if call.arguments.len() == 1));
}

#[test]
fn test_parse_struct_initializer() {
    let expr = first_expr("new Point { x: 1, y: 2 };");

    match expr {
        Expr::StructInit(init) => {
            assert_eq!(init.name, "Point");
            assert_eq!(init.fields.len(), 2);
        }
        other => panic!("expected a struct initializer, got {:?}", other),
    }
}

#[test]
fn test_parse_if_else_chain() {
    let statements = parse_body("if a { } else if b { } else { }");

    assert!(matches!(&statements[0], Stmt::If(stmt) if stmt.else_body.is_some()));
}

#[test]
fn test_parse_until_loop() {
    let statements = parse_body("until i >= 10 { i += 1; }");

    assert!(matches!(&statements[0], Stmt::Until(_)));
}

#[test]
fn test_parse_match_with_default() {
    let statements = parse_body("match x { 1 => { } _ => { } }");

    match &statements[0] {
        Stmt::Match(stmt) => {
            assert_eq!(stmt.cases.len(), 2);
            assert!(stmt.cases[0].pattern.is_some());
            assert!(stmt.cases[1].pattern.is_none());
        }
        other => panic!("expected a match, got {:?}", other),
    }
}

#[test]
fn test_terminator_elided_before_closing_brace() {
    let statements = parse_body("return 1");

    assert!(matches!(&statements[0], Stmt::Return(stmt) if stmt.value.is_some()));
}

#[test]
fn test_missing_terminator_fails() {
    let error = parse_source("fn test() { let x: int = 1 let y: int = 2; }").unwrap_err();

    assert_eq!(error.category(), Category::ParseError);
}

#[test]
fn test_keyword_cannot_name_a_variable() {
    let error = parse_source("fn test() { let match: int = 1; }").unwrap_err();

    assert_eq!(error.category(), Category::ParseError);
}

#[test]
fn test_compound_statements_nest_scopes() {
    let source = "fn test() { let a: int = 1; { let a: int = 2; } }";
    let (package, scopes) = parse_source(source).unwrap();

    match &package.declarations[0] {
        Decl::Function(function) => {
            let body = function.body.as_ref().unwrap();
            match &body.statements[1] {
                Stmt::Compound(inner) => {
                    assert_ne!(inner.scope, function.scope);
                    assert_eq!(scopes.parent(inner.scope), Some(function.scope));
                    assert!(scopes.kind(inner.scope).is_block());
                }
                other => panic!("expected a compound, got {:?}", other),
            }
        }
        other => panic!("expected a function, got {:?}", other),
    }
}

#[test]
fn test_parser_tracks_the_consumed_token_pair() {
    let mut scopes = ScopeTree::new();
    let package_scope = scopes.push_scope(ScopeKind::Package, None);
    let lexer = Lexer::new(
        String::from("a b c"),
        Rc::new(String::from("test.opal")),
    );
    let mut parser = Parser::new(lexer, &mut scopes, package_scope).unwrap();

    assert!(parser.previous_token().is_none());
    parser.advance().unwrap();
    parser.advance().unwrap();

    assert_eq!(parser.previous_token().unwrap().text, "b");
    assert_eq!(parser.before_previous_token().unwrap().text, "a");
    assert_eq!(parser.current_token().text, "c");
}

#[test]
fn test_scope_restored_after_successful_parse() {
    let mut scopes = ScopeTree::new();
    let package_scope = scopes.push_scope(ScopeKind::Package, None);
    let lexer = Lexer::new(
        String::from("{ { let x: int = 1; } }"),
        Rc::new(String::from("test.opal")),
    );
    let mut parser = Parser::new(lexer, &mut scopes, package_scope).unwrap();

    parse_stmt(&mut parser).unwrap();
    assert_eq!(parser.current_scope(), package_scope);
}

#[test]
fn test_scope_restored_after_error() {
    let mut scopes = ScopeTree::new();
    let package_scope = scopes.push_scope(ScopeKind::Package, None);
    let lexer = Lexer::new(
        String::from("{ { until x { let y: int = ; } } }"),
        Rc::new(String::from("test.opal")),
    );
    let mut parser = Parser::new(lexer, &mut scopes, package_scope).unwrap();

    assert!(parse_stmt(&mut parser).is_err());
    assert_eq!(parser.current_scope(), package_scope);
}
