//! Integration tests for the full front end.
//!
//! These tests drive the complete pipeline from source text through
//! tokenization, parsing, and semantic analysis, and verify the
//! diagnostic contract a driver relies on.

use std::fs;

use opalc::ast::ast::Decl;
use opalc::errors::errors::Category;
use opalc::{compile, compile_sources};

#[test]
fn test_compile_simple_program() {
    let source = "
        fn main() {
            let x: int = 42;
            let y: int = x * 2 + 1;
        }
    ";
    let krate = compile_sources(&[("main", source)]).unwrap();

    assert_eq!(krate.packages.len(), 1);
    assert_eq!(krate.packages[0].declarations.len(), 1);
}

#[test]
fn test_compile_full_program() {
    let source = r#"
        enum Kind { Flat, Solid }

        trait Shape {
            fn area() -> int;
        }

        struct Square {
            size: int,
        }

        impl Square : Shape {
            fn area() -> int {
                return size * size;
            }

            fn grow(amount: int) -> int {
                return size + amount;
            }
        }

        fn classify(value: int) -> string {
            match value {
                0 => { return "empty"; }
                _ => { return "solid"; }
            }
            return "unknown";
        }

        fn main() {
            let s: Square = new Square { size: 4 };
            let area: int = s.area();
            let k: int = Kind.Solid;
            let label: string = classify(area);

            let done: bool = false;
            until done {
                done = true;
            }
        }
    "#;

    let krate = compile_sources(&[("main", source)]).unwrap();
    assert_eq!(krate.packages[0].declarations.len(), 6);
}

#[test]
fn test_compile_multiple_packages() {
    let util = "
        struct Pair { a: int, b: int }
        fn sum(p: Pair) -> int { return p.a + p.b; }
    ";
    let main = "
        pkg util;
        fn main() { }
    ";

    let krate = compile_sources(&[("util", util), ("main", main)]).unwrap();
    assert_eq!(krate.packages.len(), 2);
    assert_eq!(krate.packages[1].imports[0].name, "util");
}

#[test]
fn test_forward_references_resolve() {
    let source = "
        fn connect(a: Node, b: Node) { }

        struct Node {
            next: #Node,
            value: int,
        }

        fn main() { }
    ";

    let krate = compile_sources(&[("main", source)]).unwrap();
    match &krate.packages[0].declarations[0] {
        Decl::Function(function) => {
            assert_eq!(function.parameters[0].ty.to_string(), "Node");
        }
        other => panic!("expected a function, got {:?}", other),
    }
}

#[test]
fn test_first_error_aborts_the_run() {
    // The second package would parse, but the first one fails the run
    // before it is reached.
    let error = compile_sources(&[("broken", "fn ("), ("main", "fn main() { }")]).unwrap_err();

    assert_eq!(error.category(), Category::ParseError);
}

#[test]
fn test_lex_error_diagnostic_format() {
    let error = compile_sources(&[("main", "fn main() { $ }")]).unwrap_err();

    assert_eq!(
        error.to_string(),
        "opalc: panic: unrecognised character `$`\nsee: main.opal:1:13"
    );
}

#[test]
fn test_missing_entry_point_diagnostic() {
    let error = compile_sources(&[("main", "fn helper() { }")]).unwrap_err();

    assert_eq!(error.category(), Category::ControlFlowError);
    assert_eq!(
        error.to_string(),
        "opalc: panic: no function named `main` taking no parameters and returning nothing"
    );
}

#[test]
fn test_duplicate_declaration_diagnostic_points_at_source() {
    let source = "fn f() { }\nfn f() { }";
    let error = compile_sources(&[("main", source)]).unwrap_err();

    assert_eq!(error.category(), Category::ScopeError);
    let position = error.position().expect("duplicate declarations are located");
    assert_eq!(position.line, 2);
}

#[test]
fn test_compile_from_files() {
    let dir = std::env::temp_dir().join("opalc_integration_tests");
    fs::create_dir_all(&dir).unwrap();

    let main_path = dir.join("main.opal");
    let util_path = dir.join("util.opal");
    fs::write(&main_path, "pkg util;\nfn main() { let x: int = 1; }").unwrap();
    fs::write(&util_path, "fn helper() -> int { return 7; }").unwrap();

    let krate = compile(&[&util_path, &main_path]).unwrap();
    assert_eq!(krate.packages.len(), 2);
    assert_eq!(krate.packages[0].name, "util");
    assert_eq!(krate.packages[1].name, "main");
}

#[test]
fn test_unreadable_file_is_a_diagnostic() {
    let missing = std::env::temp_dir().join("opalc_integration_tests_missing.opal");
    let error = compile(&[&missing]).unwrap_err();

    assert!(error.position().is_none());
    assert!(error.to_string().starts_with("opalc: panic: cannot read"));
}
