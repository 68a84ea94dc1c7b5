use crate::{
    ast::statements::{CompoundStmt, IfStmt, MatchCase, MatchStmt, ReturnStmt, Stmt, UntilStmt},
    errors::errors::Diagnostic,
    lexer::tokens::TokenKind,
    scope::scope::ScopeKind,
    Span,
};

use super::{
    decl::parse_var_decl,
    expr::parse_expr,
    lookups::{BindingPower, STMT_LOOKUP},
    parser::Parser,
};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    if parser.current_kind() == TokenKind::Identifier {
        let handler = STMT_LOOKUP
            .get(parser.current_token().text.as_str())
            .copied();
        if let Some(handler) = handler {
            return handler(parser);
        }
    }

    if parser.current_kind() == TokenKind::OpenBrace {
        return parse_compound_stmt(parser, ScopeKind::Block).map(Stmt::Compound);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect_terminator()?;
    Ok(Stmt::Expression(expr))
}

/// `{ ... }` opening a child scope of the given kind.
pub fn parse_compound_stmt(parser: &mut Parser, kind: ScopeKind) -> Result<CompoundStmt, Diagnostic> {
    let start = parser.expect(TokenKind::OpenBrace)?.span.start;

    let (statements, scope) = parser.with_new_scope(kind, parse_stmt_list)?;

    let end = parser.expect(TokenKind::CloseBrace)?.span.end;
    Ok(CompoundStmt {
        statements,
        scope,
        span: Span { start, end },
    })
}

/// `{ ... }` parsed in the scope already active; function bodies use
/// this so parameters and locals share the function's scope.
pub fn parse_compound_in_current_scope(parser: &mut Parser) -> Result<CompoundStmt, Diagnostic> {
    let start = parser.expect(TokenKind::OpenBrace)?.span.start;
    let statements = parse_stmt_list(parser)?;
    let end = parser.expect(TokenKind::CloseBrace)?.span.end;

    Ok(CompoundStmt {
        statements,
        scope: parser.current_scope(),
        span: Span { start, end },
    })
}

fn parse_stmt_list(parser: &mut Parser) -> Result<Vec<Stmt>, Diagnostic> {
    let mut statements = Vec::new();
    while parser.current_kind() != TokenKind::CloseBrace && parser.current_kind() != TokenKind::Eof
    {
        statements.push(parse_stmt(parser)?);
    }
    Ok(statements)
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    parse_var_decl(parser, false).map(Stmt::Declaration)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.expect_keyword("if")?.span.start;
    let condition = parse_expr(parser, BindingPower::Default)?;
    let then_body = parse_compound_stmt(parser, ScopeKind::Conditional)?;

    let else_body = if parser.current_token().is_identifier("else") {
        parser.advance()?;
        if parser.current_token().is_identifier("if") {
            Some(Box::new(parse_if_stmt(parser)?))
        } else {
            Some(Box::new(Stmt::Compound(parse_compound_stmt(
                parser,
                ScopeKind::Conditional,
            )?)))
        }
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition,
        then_body,
        else_body,
        span: Span {
            start,
            end: parser.end_position(),
        },
    }))
}

pub fn parse_match_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.expect_keyword("match")?.span.start;
    let scrutinee = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::OpenBrace)?;

    let mut cases = Vec::new();
    while parser.current_kind() != TokenKind::CloseBrace && parser.current_kind() != TokenKind::Eof
    {
        cases.push(parse_match_case(parser)?);
    }

    parser.expect(TokenKind::CloseBrace)?;
    Ok(Stmt::Match(MatchStmt {
        scrutinee,
        cases,
        span: Span {
            start,
            end: parser.end_position(),
        },
    }))
}

fn parse_match_case(parser: &mut Parser) -> Result<MatchCase, Diagnostic> {
    let start = parser.current_token().span.start.clone();

    // A bare `_` is the default case, not a name reference.
    let pattern = if parser.current_token().is_identifier("_") {
        parser.advance()?;
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };

    parser.expect(TokenKind::FatArrow)?;
    let body = parse_compound_stmt(parser, ScopeKind::Conditional)?;

    if parser.current_kind() == TokenKind::Comma {
        parser.advance()?;
    }

    Ok(MatchCase {
        pattern,
        body,
        span: Span {
            start,
            end: parser.end_position(),
        },
    })
}

pub fn parse_until_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.expect_keyword("until")?.span.start;
    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_compound_stmt(parser, ScopeKind::Loop)?;

    Ok(Stmt::Until(UntilStmt {
        condition,
        body,
        span: Span {
            start,
            end: parser.end_position(),
        },
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.expect_keyword("return")?.span.start;

    let value = if parser.current_kind() != TokenKind::Semicolon
        && parser.current_kind() != TokenKind::CloseBrace
    {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect_terminator()?;
    Ok(Stmt::Return(ReturnStmt {
        value,
        span: Span {
            start,
            end: parser.end_position(),
        },
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.expect_keyword("break")?;
    parser.expect_terminator()?;
    Ok(Stmt::Break(token.span))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.expect_keyword("continue")?;
    parser.expect_terminator()?;
    Ok(Stmt::Continue(token.span))
}
