use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Diagnostic, DiagnosticKind},
    Position, Span, MK_PUNCT_HANDLER,
};

use super::tokens::{LiteralKind, Token, TokenKind};

pub type LexHandler = fn(&mut Lexer, &str) -> Result<Option<Token>, Diagnostic>;

struct LexRule {
    regex: Regex,
    handler: LexHandler,
}

fn rule(pattern: &str, handler: LexHandler) -> LexRule {
    LexRule {
        regex: Regex::new(pattern).unwrap(),
        handler,
    }
}

lazy_static! {
    /// The rule table, tried in order at the current cursor. Within one
    /// shared prefix the longer pattern comes first, which gives greedy
    /// longest-match for multi-character operators.
    static ref RULES: Vec<LexRule> = vec![
        rule(r"^[ \t\r\n]+", skip_handler),
        rule(r"^//[^\n]*", skip_handler),
        rule(r"^/\*", block_comment_handler),
        rule(r#"^b"[^"]*""#, byte_string_handler),
        rule(r"^b'(\\.|[^'\n])*'", byte_char_handler),
        rule(r#"^"[^"]*""#, string_handler),
        rule(r"^'(\\.|[^'\n])*'", char_handler),
        rule(r#"^""#, unterminated_string_handler),
        rule(r"^'", malformed_char_handler),
        rule(r"^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        rule(r"^[0-9]+(\.[0-9]+)?", number_handler),
        rule(r"^\.\.\.", MK_PUNCT_HANDLER!(TokenKind::Ellipsis)),
        rule(r"^\.\.", MK_PUNCT_HANDLER!(TokenKind::DotDot)),
        rule(r"^\.", MK_PUNCT_HANDLER!(TokenKind::Dot)),
        rule(r"^->", MK_PUNCT_HANDLER!(TokenKind::Arrow)),
        rule(r"^--", MK_PUNCT_HANDLER!(TokenKind::MinusMinus)),
        rule(r"^-=", MK_PUNCT_HANDLER!(TokenKind::MinusAssign)),
        rule(r"^-", MK_PUNCT_HANDLER!(TokenKind::Minus)),
        rule(r"^\+\+", MK_PUNCT_HANDLER!(TokenKind::PlusPlus)),
        rule(r"^\+=", MK_PUNCT_HANDLER!(TokenKind::PlusAssign)),
        rule(r"^\+", MK_PUNCT_HANDLER!(TokenKind::Plus)),
        rule(r"^=>", MK_PUNCT_HANDLER!(TokenKind::FatArrow)),
        rule(r"^==", MK_PUNCT_HANDLER!(TokenKind::Equals)),
        rule(r"^=", MK_PUNCT_HANDLER!(TokenKind::Assign)),
        rule(r"^!=", MK_PUNCT_HANDLER!(TokenKind::NotEquals)),
        rule(r"^!", MK_PUNCT_HANDLER!(TokenKind::Bang)),
        rule(r"^<<", MK_PUNCT_HANDLER!(TokenKind::ShiftLeft)),
        rule(r"^<=", MK_PUNCT_HANDLER!(TokenKind::LessEquals)),
        rule(r"^<", MK_PUNCT_HANDLER!(TokenKind::Less)),
        rule(r"^>>", MK_PUNCT_HANDLER!(TokenKind::ShiftRight)),
        rule(r"^>=", MK_PUNCT_HANDLER!(TokenKind::GreaterEquals)),
        rule(r"^>", MK_PUNCT_HANDLER!(TokenKind::Greater)),
        rule(r"^&&", MK_PUNCT_HANDLER!(TokenKind::AndAnd)),
        rule(r"^&", MK_PUNCT_HANDLER!(TokenKind::Ampersand)),
        rule(r"^\|\|", MK_PUNCT_HANDLER!(TokenKind::OrOr)),
        rule(r"^\|", MK_PUNCT_HANDLER!(TokenKind::Pipe)),
        rule(r"^\^\^", MK_PUNCT_HANDLER!(TokenKind::XorXor)),
        rule(r"^\^", MK_PUNCT_HANDLER!(TokenKind::Caret)),
        rule(r"^\*=", MK_PUNCT_HANDLER!(TokenKind::StarAssign)),
        rule(r"^\*", MK_PUNCT_HANDLER!(TokenKind::Star)),
        rule(r"^/=", MK_PUNCT_HANDLER!(TokenKind::SlashAssign)),
        rule(r"^/", MK_PUNCT_HANDLER!(TokenKind::Slash)),
        rule(r"^#", MK_PUNCT_HANDLER!(TokenKind::Hash)),
        rule(r"^@", MK_PUNCT_HANDLER!(TokenKind::At)),
        rule(r"^\(", MK_PUNCT_HANDLER!(TokenKind::OpenParen)),
        rule(r"^\)", MK_PUNCT_HANDLER!(TokenKind::CloseParen)),
        rule(r"^\{", MK_PUNCT_HANDLER!(TokenKind::OpenBrace)),
        rule(r"^\}", MK_PUNCT_HANDLER!(TokenKind::CloseBrace)),
        rule(r"^\[", MK_PUNCT_HANDLER!(TokenKind::OpenBracket)),
        rule(r"^\]", MK_PUNCT_HANDLER!(TokenKind::CloseBracket)),
        rule(r"^,", MK_PUNCT_HANDLER!(TokenKind::Comma)),
        rule(r"^;", MK_PUNCT_HANDLER!(TokenKind::Semicolon)),
        rule(r"^:", MK_PUNCT_HANDLER!(TokenKind::Colon)),
    ];
}

/// Pull-based tokenizer over one source file.
pub struct Lexer {
    source: String,
    pos: usize,
    line: u32,
    column: u32,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Rc<String>) -> Lexer {
        Lexer {
            source,
            pos: 0,
            line: 1,
            column: 1,
            file,
        }
    }

    pub fn position(&self) -> Position {
        Position {
            file: Rc::clone(&self.file),
            line: self.line,
            column: self.column,
        }
    }

    fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Advances past `text`, which must be exactly what the cursor is
    /// looking at, keeping the line and column counters in step.
    fn advance_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += text.len();
    }

    /// Consumes `raw` from the source and builds a token whose text is
    /// `value` (the decoded form for quoted literals).
    fn make_token(
        &mut self,
        kind: TokenKind,
        raw: &str,
        value: &str,
        literal: Option<LiteralKind>,
    ) -> Token {
        let start = self.position();
        self.advance_text(raw);
        Token::new(
            kind,
            value,
            literal,
            Span {
                start,
                end: self.position(),
            },
        )
    }

    /// Produces the next token, discarding whitespace and comments first.
    /// Yields the `Eof` token once the source is exhausted; any text no
    /// rule matches is a fatal lexical error.
    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        'scan: while !self.at_eof() {
            for rule in RULES.iter() {
                let matched = match rule.regex.find(self.remainder()) {
                    Some(matched) => matched.as_str().to_string(),
                    None => continue,
                };
                match (rule.handler)(self, &matched)? {
                    Some(token) => return Ok(token),
                    None => continue 'scan,
                }
            }

            let offending: String = self.remainder().chars().take(1).collect();
            return Err(Diagnostic::new(
                DiagnosticKind::UnrecognisedCharacter { text: offending },
                self.position(),
            ));
        }

        Ok(Token::new(
            TokenKind::Eof,
            "",
            None,
            Span {
                start: self.position(),
                end: self.position(),
            },
        ))
    }
}

fn skip_handler(lexer: &mut Lexer, text: &str) -> Result<Option<Token>, Diagnostic> {
    lexer.advance_text(text);
    Ok(None)
}

fn block_comment_handler(lexer: &mut Lexer, _text: &str) -> Result<Option<Token>, Diagnostic> {
    let comment = match lexer.remainder().find("*/") {
        Some(end) => lexer.remainder()[..end + 2].to_string(),
        None => {
            return Err(Diagnostic::new(
                DiagnosticKind::UnterminatedBlockComment,
                lexer.position(),
            ))
        }
    };
    lexer.advance_text(&comment);
    Ok(None)
}

fn symbol_handler(lexer: &mut Lexer, text: &str) -> Result<Option<Token>, Diagnostic> {
    let token = match text {
        "null" => lexer.make_token(TokenKind::Literal, text, text, Some(LiteralKind::Null)),
        "true" | "false" => lexer.make_token(TokenKind::Literal, text, text, Some(LiteralKind::Bool)),
        _ => lexer.make_token(TokenKind::Identifier, text, text, None),
    };
    Ok(Some(token))
}

fn number_handler(lexer: &mut Lexer, text: &str) -> Result<Option<Token>, Diagnostic> {
    let literal = if text.contains('.') {
        LiteralKind::Float
    } else {
        LiteralKind::Integer
    };
    Ok(Some(lexer.make_token(TokenKind::Literal, text, text, Some(literal))))
}

fn string_handler(lexer: &mut Lexer, text: &str) -> Result<Option<Token>, Diagnostic> {
    let value = unescape(&text[1..text.len() - 1]);
    Ok(Some(lexer.make_token(
        TokenKind::Literal,
        text,
        &value,
        Some(LiteralKind::Str),
    )))
}

fn byte_string_handler(lexer: &mut Lexer, text: &str) -> Result<Option<Token>, Diagnostic> {
    let value = unescape(&text[2..text.len() - 1]);
    Ok(Some(lexer.make_token(
        TokenKind::Literal,
        text,
        &value,
        Some(LiteralKind::ByteStr),
    )))
}

fn char_handler(lexer: &mut Lexer, text: &str) -> Result<Option<Token>, Diagnostic> {
    quoted_char(lexer, text, &text[1..text.len() - 1], LiteralKind::Char)
}

fn byte_char_handler(lexer: &mut Lexer, text: &str) -> Result<Option<Token>, Diagnostic> {
    quoted_char(lexer, text, &text[2..text.len() - 1], LiteralKind::Byte)
}

/// A quoted character literal holds exactly one character once escapes
/// are applied.
fn quoted_char(
    lexer: &mut Lexer,
    raw: &str,
    inner: &str,
    literal: LiteralKind,
) -> Result<Option<Token>, Diagnostic> {
    let value = unescape(inner);
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(_), None) => Ok(Some(lexer.make_token(TokenKind::Literal, raw, &value, Some(literal)))),
        _ => Err(Diagnostic::new(
            DiagnosticKind::MalformedCharLiteral {
                text: raw.to_string(),
            },
            lexer.position(),
        )),
    }
}

fn unterminated_string_handler(lexer: &mut Lexer, _text: &str) -> Result<Option<Token>, Diagnostic> {
    Err(Diagnostic::new(
        DiagnosticKind::UnterminatedString,
        lexer.position(),
    ))
}

fn malformed_char_handler(lexer: &mut Lexer, text: &str) -> Result<Option<Token>, Diagnostic> {
    Err(Diagnostic::new(
        DiagnosticKind::MalformedCharLiteral {
            text: text.to_string(),
        },
        lexer.position(),
    ))
}

/// Applies escape sequences inside a quoted literal. Unknown escapes keep
/// the backslash as written.
fn unescape(text: &str) -> String {
    let mut result = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('\'') => {
                result.push('\'');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('0') => {
                result.push('\0');
                chars.next();
            }
            Some('x') => {
                chars.next();
                let mut hex = String::new();
                for _ in 0..2 {
                    if let Some(digit) = chars.peek() {
                        if digit.is_ascii_hexdigit() {
                            hex.push(*digit);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }
                if let Ok(value) = u8::from_str_radix(&hex, 16) {
                    result.push(value as char);
                }
            }
            _ => {
                result.push(ch);
            }
        }
    }

    result
}
