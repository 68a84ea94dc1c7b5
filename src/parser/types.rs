//! Type annotation parsing.
//!
//! Type expressions get the same NUD/LED treatment as value
//! expressions, with a much smaller table: a bare name (builtin or a
//! named forward reference), a `#` rune prefix, and a `[N]` array
//! suffix. A name that is not a builtin becomes a `Type::Named`
//! placeholder for the analyzer to resolve.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::types::Type,
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::tokens::{LiteralKind, TokenKind},
};

use super::{lookups::BindingPower, parser::Parser};

pub type TypeNudHandler = for<'a, 'b> fn(&'a mut Parser<'b>) -> Result<Type, Diagnostic>;
pub type TypeLedHandler =
    for<'a, 'b> fn(&'a mut Parser<'b>, Type, BindingPower) -> Result<Type, Diagnostic>;

pub type TypeNudLookup = HashMap<TokenKind, TypeNudHandler>;
pub type TypeLedLookup = HashMap<TokenKind, TypeLedHandler>;
pub type TypeBpLookup = HashMap<TokenKind, BindingPower>;

lazy_static! {
    static ref TYPE_NUD_LOOKUP: TypeNudLookup = {
        let mut map: TypeNudLookup = HashMap::new();
        map.insert(TokenKind::Identifier, parse_symbol_type);
        map.insert(TokenKind::Hash, parse_rune_type);
        map
    };
    static ref TYPE_LED_LOOKUP: TypeLedLookup = {
        let mut map: TypeLedLookup = HashMap::new();
        map.insert(TokenKind::OpenBracket, parse_array_type);
        map
    };
    static ref TYPE_BP_LOOKUP: TypeBpLookup = {
        let mut map: TypeBpLookup = HashMap::new();
        map.insert(TokenKind::OpenBracket, BindingPower::Member);
        map
    };
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<Type, Diagnostic> {
    let nud = TYPE_NUD_LOOKUP
        .get(&parser.current_kind())
        .copied()
        .ok_or_else(|| parser.unexpected("a type"))?;

    let mut left = nud(parser)?;

    loop {
        let next_bp = match TYPE_BP_LOOKUP.get(&parser.current_kind()) {
            Some(&next_bp) if next_bp > bp => next_bp,
            _ => break,
        };
        let led = TYPE_LED_LOOKUP
            .get(&parser.current_kind())
            .copied()
            .ok_or_else(|| parser.unexpected("a type"))?;

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

fn parse_symbol_type(parser: &mut Parser) -> Result<Type, Diagnostic> {
    let token = parser.expect_identifier()?;
    Ok(Type::from_builtin_name(&token.text).unwrap_or(Type::Named(token.text)))
}

fn parse_rune_type(parser: &mut Parser) -> Result<Type, Diagnostic> {
    parser.expect(TokenKind::Hash)?;
    let inner = parse_type(parser, BindingPower::Unary)?;
    Ok(Type::Rune(Box::new(inner)))
}

/// `T[N]`: a fixed-size array of N elements.
fn parse_array_type(parser: &mut Parser, left: Type, _bp: BindingPower) -> Result<Type, Diagnostic> {
    parser.expect(TokenKind::OpenBracket)?;

    let size_token = parser.expect(TokenKind::Literal)?;
    if size_token.literal != Some(LiteralKind::Integer) {
        return Err(Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                expected: String::from("an array length"),
                found: size_token.describe(),
            },
            size_token.span.start,
        ));
    }
    let size = size_token.text.parse::<u32>().map_err(|_| {
        Diagnostic::new(
            DiagnosticKind::NumberParseError {
                token: size_token.text.clone(),
            },
            size_token.span.start.clone(),
        )
    })?;

    parser.expect(TokenKind::CloseBracket)?;
    Ok(Type::Array(Box::new(left), size))
}
