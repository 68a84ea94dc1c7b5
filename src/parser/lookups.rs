use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::{
    ast::{expressions::Expr, statements::Stmt},
    errors::errors::Diagnostic,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator strength, weakest first. The variant order is the
/// precedence table: postfix increment/decrement bind tightest, then
/// member access, prefix operators, and the binary tiers down to
/// assignment.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    Logical,
    Bitwise,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Unary,
    Member,
    Postfix,
    Primary,
}

pub type StmtHandler = for<'a, 'b> fn(&'a mut Parser<'b>) -> Result<Stmt, Diagnostic>;
pub type NudHandler = for<'a, 'b> fn(&'a mut Parser<'b>) -> Result<Expr, Diagnostic>;
pub type LedHandler =
    for<'a, 'b> fn(&'a mut Parser<'b>, Expr, BindingPower) -> Result<Expr, Diagnostic>;

pub type StmtLookup = HashMap<&'static str, StmtHandler>;
pub type NudLookup = HashMap<TokenKind, NudHandler>;
pub type LedLookup = HashMap<TokenKind, LedHandler>;
pub type BpLookup = HashMap<TokenKind, BindingPower>;

lazy_static! {
    /// Reserved words. The tokenizer emits these as plain identifiers;
    /// the parser refuses them as declaration or member names and
    /// dispatches on them for statements and declarations.
    pub static ref KEYWORDS: HashSet<&'static str> = {
        let mut set = HashSet::new();
        set.insert("pkg");
        set.insert("priv");
        set.insert("fn");
        set.insert("struct");
        set.insert("trait");
        set.insert("enum");
        set.insert("impl");
        set.insert("let");
        set.insert("if");
        set.insert("else");
        set.insert("match");
        set.insert("until");
        set.insert("return");
        set.insert("break");
        set.insert("continue");
        set.insert("new");
        set
    };

    /// Statement dispatch by keyword text.
    pub static ref STMT_LOOKUP: StmtLookup = {
        let mut map: StmtLookup = HashMap::new();
        map.insert("let", parse_var_decl_stmt);
        map.insert("if", parse_if_stmt);
        map.insert("match", parse_match_stmt);
        map.insert("until", parse_until_stmt);
        map.insert("return", parse_return_stmt);
        map.insert("break", parse_break_stmt);
        map.insert("continue", parse_continue_stmt);
        map
    };

    /// Null denotation handlers: tokens an expression may start with.
    pub static ref NUD_LOOKUP: NudLookup = {
        let mut map: NudLookup = HashMap::new();
        map.insert(TokenKind::Literal, parse_literal_expr);
        map.insert(TokenKind::Identifier, parse_primary_expr);
        map.insert(TokenKind::OpenParen, parse_grouping_expr);
        map.insert(TokenKind::Bang, parse_unary_expr);
        map.insert(TokenKind::Hash, parse_unary_expr);
        map.insert(TokenKind::At, parse_unary_expr);
        map.insert(TokenKind::DotDot, parse_unary_expr);
        map
    };

    /// Left denotation handlers: tokens that extend an expression.
    pub static ref LED_LOOKUP: LedLookup = {
        let mut map: LedLookup = HashMap::new();
        map.insert(TokenKind::Assign, parse_assignment_expr);
        map.insert(TokenKind::PlusAssign, parse_assignment_expr);
        map.insert(TokenKind::MinusAssign, parse_assignment_expr);
        map.insert(TokenKind::StarAssign, parse_assignment_expr);
        map.insert(TokenKind::SlashAssign, parse_assignment_expr);

        map.insert(TokenKind::AndAnd, parse_binary_expr);
        map.insert(TokenKind::OrOr, parse_binary_expr);
        map.insert(TokenKind::XorXor, parse_binary_expr);

        map.insert(TokenKind::Ampersand, parse_binary_expr);
        map.insert(TokenKind::Pipe, parse_binary_expr);
        map.insert(TokenKind::Caret, parse_binary_expr);

        map.insert(TokenKind::Equals, parse_binary_expr);
        map.insert(TokenKind::NotEquals, parse_binary_expr);

        map.insert(TokenKind::Less, parse_binary_expr);
        map.insert(TokenKind::LessEquals, parse_binary_expr);
        map.insert(TokenKind::Greater, parse_binary_expr);
        map.insert(TokenKind::GreaterEquals, parse_binary_expr);

        map.insert(TokenKind::ShiftLeft, parse_binary_expr);
        map.insert(TokenKind::ShiftRight, parse_binary_expr);

        map.insert(TokenKind::Plus, parse_binary_expr);
        map.insert(TokenKind::Minus, parse_binary_expr);

        map.insert(TokenKind::Star, parse_binary_expr);
        map.insert(TokenKind::Slash, parse_binary_expr);

        map.insert(TokenKind::Dot, parse_member_expr);
        map.insert(TokenKind::OpenParen, parse_call_expr);
        map.insert(TokenKind::OpenBracket, parse_index_expr);

        map.insert(TokenKind::PlusPlus, parse_postfix_expr);
        map.insert(TokenKind::MinusMinus, parse_postfix_expr);
        map
    };

    /// Binding powers for the expression climbing loop.
    pub static ref BP_LOOKUP: BpLookup = {
        let mut map: BpLookup = HashMap::new();
        map.insert(TokenKind::Assign, BindingPower::Assignment);
        map.insert(TokenKind::PlusAssign, BindingPower::Assignment);
        map.insert(TokenKind::MinusAssign, BindingPower::Assignment);
        map.insert(TokenKind::StarAssign, BindingPower::Assignment);
        map.insert(TokenKind::SlashAssign, BindingPower::Assignment);

        map.insert(TokenKind::AndAnd, BindingPower::Logical);
        map.insert(TokenKind::OrOr, BindingPower::Logical);
        map.insert(TokenKind::XorXor, BindingPower::Logical);

        map.insert(TokenKind::Ampersand, BindingPower::Bitwise);
        map.insert(TokenKind::Pipe, BindingPower::Bitwise);
        map.insert(TokenKind::Caret, BindingPower::Bitwise);

        map.insert(TokenKind::Equals, BindingPower::Equality);
        map.insert(TokenKind::NotEquals, BindingPower::Equality);

        map.insert(TokenKind::Less, BindingPower::Relational);
        map.insert(TokenKind::LessEquals, BindingPower::Relational);
        map.insert(TokenKind::Greater, BindingPower::Relational);
        map.insert(TokenKind::GreaterEquals, BindingPower::Relational);

        map.insert(TokenKind::ShiftLeft, BindingPower::Shift);
        map.insert(TokenKind::ShiftRight, BindingPower::Shift);

        map.insert(TokenKind::Plus, BindingPower::Additive);
        map.insert(TokenKind::Minus, BindingPower::Additive);

        map.insert(TokenKind::Star, BindingPower::Multiplicative);
        map.insert(TokenKind::Slash, BindingPower::Multiplicative);

        map.insert(TokenKind::Dot, BindingPower::Member);
        map.insert(TokenKind::OpenParen, BindingPower::Member);
        map.insert(TokenKind::OpenBracket, BindingPower::Member);

        map.insert(TokenKind::PlusPlus, BindingPower::Postfix);
        map.insert(TokenKind::MinusMinus, BindingPower::Postfix);

        map.insert(TokenKind::Literal, BindingPower::Primary);
        map.insert(TokenKind::Identifier, BindingPower::Primary);
        map
    };
}
