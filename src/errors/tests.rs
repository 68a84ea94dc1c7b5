//! Unit tests for diagnostics.
//!
//! This module contains tests for diagnostic categories and the fixed
//! report format.

use std::rc::Rc;

use crate::Position;

use super::errors::{Category, Diagnostic, DiagnosticKind};

fn position(line: u32, column: u32) -> Position {
    Position {
        file: Rc::new(String::from("test.opal")),
        line,
        column,
    }
}

#[test]
fn test_located_report_format() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::UnrecognisedCharacter {
            text: String::from("$"),
        },
        position(3, 14),
    );

    assert_eq!(
        diagnostic.to_string(),
        "opalc: panic: unrecognised character `$`\nsee: test.opal:3:14"
    );
}

#[test]
fn test_unlocated_report_format() {
    let diagnostic = Diagnostic::unlocated(DiagnosticKind::MissingEntryPoint);

    assert_eq!(
        diagnostic.to_string(),
        "opalc: panic: no function named `main` taking no parameters and returning nothing"
    );
}

#[test]
fn test_unexpected_token_message() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::UnexpectedToken {
            expected: String::from("`;`"),
            found: String::from("`}`"),
        },
        position(1, 1),
    );

    assert!(diagnostic.to_string().contains("expected `;`, found `}`"));
}

#[test]
fn test_lexical_categories() {
    let kinds = [
        DiagnosticKind::UnrecognisedCharacter {
            text: String::from("$"),
        },
        DiagnosticKind::MalformedCharLiteral {
            text: String::from("'ab'"),
        },
        DiagnosticKind::UnterminatedString,
        DiagnosticKind::UnterminatedBlockComment,
    ];

    for kind in kinds {
        assert_eq!(kind.category(), Category::LexError);
    }
}

#[test]
fn test_scope_categories() {
    assert_eq!(
        DiagnosticKind::DuplicateDeclaration {
            name: String::from("x")
        }
        .category(),
        Category::ScopeError
    );
    assert_eq!(
        DiagnosticKind::UnresolvedImport {
            name: String::from("io")
        }
        .category(),
        Category::ScopeError
    );
}

#[test]
fn test_type_categories() {
    assert_eq!(
        DiagnosticKind::UnknownType {
            name: String::from("Missing")
        }
        .category(),
        Category::TypeError
    );
    assert_eq!(
        DiagnosticKind::TypeMismatch {
            expected: String::from("int"),
            received: String::from("bool"),
        }
        .category(),
        Category::TypeError
    );
    assert_eq!(DiagnosticKind::MissingMatchDefault.category(), Category::TypeError);
}

#[test]
fn test_control_flow_categories() {
    assert_eq!(
        DiagnosticKind::BreakOutsideLoop.category(),
        Category::ControlFlowError
    );
    assert_eq!(
        DiagnosticKind::ReturnTypeMismatch {
            expected: String::from("int"),
            received: String::from("void"),
        }
        .category(),
        Category::ControlFlowError
    );
    assert_eq!(
        DiagnosticKind::MissingEntryPoint.category(),
        Category::ControlFlowError
    );
}

#[test]
fn test_conformance_categories() {
    assert_eq!(
        DiagnosticKind::MissingTraitMethod {
            trait_name: String::from("Shape"),
            method: String::from("area"),
        }
        .category(),
        Category::ConformanceError
    );
}

#[test]
fn test_position_display() {
    assert_eq!(position(12, 7).to_string(), "test.opal:12:7");
}
