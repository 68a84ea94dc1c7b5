use crate::{
    ast::expressions::{
        BinaryExpr, BinaryOp, CallExpr, Expr, IndexExpr, MemberExpr, MethodCallExpr, PostfixExpr,
        PostfixOp, StructInitExpr, UnaryExpr, UnaryOp,
    },
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::tokens::{LiteralKind, TokenKind},
    Span,
};

use super::{
    lookups::{BindingPower, BP_LOOKUP, KEYWORDS, LED_LOOKUP, NUD_LOOKUP},
    parser::Parser,
};

/// Precedence climbing: parse a primary expression, then keep consuming
/// operators that bind tighter than `bp`. Ties associate left because an
/// operator's own power does not exceed itself.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Diagnostic> {
    let nud = NUD_LOOKUP
        .get(&parser.current_kind())
        .copied()
        .ok_or_else(|| parser.unexpected("an expression"))?;

    let mut left = nud(parser)?;

    loop {
        let next_bp = match BP_LOOKUP.get(&parser.current_kind()) {
            Some(&next_bp) if next_bp > bp => next_bp,
            _ => break,
        };
        let led = LED_LOOKUP
            .get(&parser.current_kind())
            .copied()
            .ok_or_else(|| parser.unexpected("an operator"))?;

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_literal_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let token = parser.advance()?;
    let span = token.span.clone();

    match token.literal {
        Some(LiteralKind::Null) => Ok(Expr::Null(span)),
        Some(LiteralKind::Bool) => Ok(Expr::Bool(token.text == "true", span)),
        Some(LiteralKind::Integer) => match token.text.parse::<i64>() {
            Ok(value) => Ok(Expr::Integer(value, span)),
            Err(_) => Err(Diagnostic::new(
                DiagnosticKind::NumberParseError { token: token.text },
                span.start,
            )),
        },
        Some(LiteralKind::Float) => match token.text.parse::<f64>() {
            Ok(value) => Ok(Expr::Float(value, span)),
            Err(_) => Err(Diagnostic::new(
                DiagnosticKind::NumberParseError { token: token.text },
                span.start,
            )),
        },
        Some(LiteralKind::Char) => {
            let value = token.text.chars().next().ok_or_else(|| {
                Diagnostic::new(
                    DiagnosticKind::MalformedCharLiteral {
                        text: token.text.clone(),
                    },
                    span.start.clone(),
                )
            })?;
            Ok(Expr::Char(value, span))
        }
        Some(LiteralKind::Byte) => {
            let value = token.text.bytes().next().ok_or_else(|| {
                Diagnostic::new(
                    DiagnosticKind::MalformedCharLiteral {
                        text: token.text.clone(),
                    },
                    span.start.clone(),
                )
            })?;
            Ok(Expr::Byte(value, span))
        }
        Some(LiteralKind::Str) => Ok(Expr::Str(token.text, span)),
        Some(LiteralKind::ByteStr) => Ok(Expr::ByteStr(token.text.into_bytes(), span)),
        None => Err(Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                expected: String::from("a literal"),
                found: token.describe(),
            },
            span.start,
        )),
    }
}

/// An identifier in expression position: a name reference, or the `new`
/// keyword opening a struct initializer. Other reserved words cannot
/// start an expression.
pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    if parser.current_token().is_identifier("new") {
        return parse_struct_init_expr(parser);
    }
    if KEYWORDS.contains(parser.current_token().text.as_str()) {
        return Err(parser.unexpected("an expression"));
    }

    let token = parser.advance()?;
    Ok(Expr::Name(token.text, token.span))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    Ok(expr)
}

pub fn parse_unary_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let operator = parser.advance()?;
    let op = match operator.kind {
        TokenKind::Bang => UnaryOp::Not,
        TokenKind::Hash => UnaryOp::Deref,
        TokenKind::At => UnaryOp::RuneOf,
        TokenKind::DotDot => UnaryOp::Range,
        _ => {
            return Err(Diagnostic::new(
                DiagnosticKind::UnexpectedToken {
                    expected: String::from("a prefix operator"),
                    found: operator.describe(),
                },
                operator.span.start,
            ))
        }
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;
    Ok(Expr::Unary(UnaryExpr {
        span: Span {
            start: operator.span.start,
            end: operand.span().end.clone(),
        },
        op,
        operand: Box::new(operand),
    }))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Diagnostic> {
    let operator = parser.advance()?;
    let op = BinaryOp::from_token(operator.kind).ok_or_else(|| {
        Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                expected: String::from("a binary operator"),
                found: operator.describe(),
            },
            operator.span.start.clone(),
        )
    })?;

    let right = parse_expr(parser, bp)?;
    Ok(Expr::Binary(BinaryExpr {
        span: Span {
            start: left.span().start.clone(),
            end: right.span().end.clone(),
        },
        op,
        left: Box::new(left),
        right: Box::new(right),
    }))
}

pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, Diagnostic> {
    parse_binary_expr(parser, left, bp)
}

pub fn parse_postfix_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Diagnostic> {
    let operator = parser.advance()?;
    let op = match operator.kind {
        TokenKind::PlusPlus => PostfixOp::Increment,
        _ => PostfixOp::Decrement,
    };

    Ok(Expr::Postfix(PostfixExpr {
        span: Span {
            start: left.span().start.clone(),
            end: operator.span.end,
        },
        op,
        operand: Box::new(left),
    }))
}

/// Member access, turning into a member call when a parenthesized
/// argument list follows.
pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Diagnostic> {
    parser.expect(TokenKind::Dot)?;
    let member = parser.expect_identifier()?;
    let start = left.span().start.clone();

    if parser.current_kind() == TokenKind::OpenParen {
        let arguments = parse_call_arguments(parser)?;
        return Ok(Expr::MethodCall(MethodCallExpr {
            object: Box::new(left),
            method: member.text,
            arguments,
            span: Span {
                start,
                end: parser.end_position(),
            },
        }));
    }

    Ok(Expr::Member(MemberExpr {
        object: Box::new(left),
        member: member.text,
        span: Span {
            start,
            end: member.span.end,
        },
    }))
}

/// A direct call. Only a plain name is callable; the language has no
/// function values.
pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Diagnostic> {
    let (callee, start) = match left {
        Expr::Name(name, span) => (name, span.start),
        other => {
            return Err(Diagnostic::new(
                DiagnosticKind::UnexpectedToken {
                    expected: String::from("a function name"),
                    found: String::from("an expression"),
                },
                other.span().start.clone(),
            ))
        }
    };

    let arguments = parse_call_arguments(parser)?;
    Ok(Expr::Call(CallExpr {
        callee,
        arguments,
        span: Span {
            start,
            end: parser.end_position(),
        },
    }))
}

fn parse_call_arguments(parser: &mut Parser) -> Result<Vec<Expr>, Diagnostic> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = Vec::new();
    while parser.current_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Default)?);
        if parser.current_kind() == TokenKind::Comma {
            parser.advance()?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(arguments)
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Diagnostic> {
    parser.expect(TokenKind::OpenBracket)?;
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::Index(IndexExpr {
        span: Span {
            start: left.span().start.clone(),
            end: parser.end_position(),
        },
        object: Box::new(left),
        index: Box::new(index),
    }))
}

/// `new Name { field: value, ... }`
pub fn parse_struct_init_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let start = parser.expect_keyword("new")?.span.start;
    let name = parser.expect_identifier()?;

    parser.expect(TokenKind::OpenBrace)?;

    let mut fields = Vec::new();
    while parser.current_kind() != TokenKind::CloseBrace {
        let field = parser.expect_identifier()?;
        parser.expect(TokenKind::Colon)?;
        let value = parse_expr(parser, BindingPower::Default)?;
        fields.push((field.text, value));

        if parser.current_kind() == TokenKind::Comma {
            parser.advance()?;
        }
    }

    parser.expect(TokenKind::CloseBrace)?;
    Ok(Expr::StructInit(StructInitExpr {
        name: name.text,
        fields,
        span: Span {
            start,
            end: parser.end_position(),
        },
    }))
}
