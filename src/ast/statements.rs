use crate::{scope::scope::ScopeId, Span};

use super::{ast::VariableDecl, expressions::Expr};

#[derive(Debug, Clone)]
pub enum Stmt {
    Compound(CompoundStmt),
    If(IfStmt),
    Match(MatchStmt),
    Until(UntilStmt),
    Return(ReturnStmt),
    Break(Span),
    Continue(Span),
    Declaration(VariableDecl),
    Expression(Expr),
}

/// An ordered list of statements together with the scope it owns. A
/// function body reuses the function's own scope; every other compound
/// gets a child scope of its own.
#[derive(Debug, Clone)]
pub struct CompoundStmt {
    pub statements: Vec<Stmt>,
    pub scope: ScopeId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: CompoundStmt,
    /// Either another `If` (an `else if` chain) or a `Compound`.
    pub else_body: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MatchStmt {
    pub scrutinee: Expr,
    pub cases: Vec<MatchCase>,
    pub span: Span,
}

/// One match arm. `pattern` is `None` for the `_` default case.
#[derive(Debug, Clone)]
pub struct MatchCase {
    pub pattern: Option<Expr>,
    pub body: CompoundStmt,
    pub span: Span,
}

/// A pre-test loop: the body runs while the condition is false.
#[derive(Debug, Clone)]
pub struct UntilStmt {
    pub condition: Expr,
    pub body: CompoundStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}
