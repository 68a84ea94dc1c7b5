//! Parser state and the package-level entry point.
//!
//! The parser owns the lexer and consumes its tokens strictly left to
//! right with a single token of lookahead (the current token) plus the
//! two most recently consumed tokens. It threads one explicit context
//! through every parse call: the scope tree and the current-scope
//! cursor. Scope push/pop must nest exactly, including on every
//! error-return path, so all scope changes go through the two `with_*`
//! helpers below.

use std::rc::Rc;

use crate::{
    ast::ast::Package,
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    scope::scope::{ScopeId, ScopeKind, ScopeTree, Symbol},
    Position, Span,
};

use super::{
    decl::{parse_decl, parse_imports},
    lookups::KEYWORDS,
};

pub struct Parser<'a> {
    lexer: Lexer,
    current: Token,
    previous: Option<Token>,
    before_previous: Option<Token>,
    scopes: &'a mut ScopeTree,
    current_scope: ScopeId,
}

impl<'a> Parser<'a> {
    pub fn new(
        mut lexer: Lexer,
        scopes: &'a mut ScopeTree,
        package_scope: ScopeId,
    ) -> Result<Self, Diagnostic> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            previous: None,
            before_previous: None,
            scopes,
            current_scope: package_scope,
        })
    }

    pub fn current_token(&self) -> &Token {
        &self.current
    }

    pub fn current_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// The most recently consumed token, if any.
    pub fn previous_token(&self) -> Option<&Token> {
        self.previous.as_ref()
    }

    /// The token consumed before the previous one, if any.
    pub fn before_previous_token(&self) -> Option<&Token> {
        self.before_previous.as_ref()
    }

    /// Consumes the current token, pulls the next one from the lexer,
    /// and returns what was consumed.
    pub fn advance(&mut self) -> Result<Token, Diagnostic> {
        let next = self.lexer.next_token()?;
        let consumed = std::mem::replace(&mut self.current, next);
        self.before_previous = self.previous.take();
        self.previous = Some(consumed.clone());
        Ok(consumed)
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.current.kind != kind {
            return Err(self.unexpected(&kind.to_string()));
        }
        self.advance()
    }

    /// Consumes the identifier `keyword`. The tokenizer does not
    /// distinguish keywords, so this is a text check on top of the kind
    /// check.
    pub fn expect_keyword(&mut self, keyword: &str) -> Result<Token, Diagnostic> {
        if !self.current.is_identifier(keyword) {
            return Err(self.unexpected(&format!("`{}`", keyword)));
        }
        self.advance()
    }

    /// Consumes an identifier that is not a reserved word.
    pub fn expect_identifier(&mut self) -> Result<Token, Diagnostic> {
        if self.current.kind != TokenKind::Identifier {
            return Err(self.unexpected("identifier"));
        }
        if KEYWORDS.contains(self.current.text.as_str()) {
            return Err(self.unexpected("identifier"));
        }
        self.advance()
    }

    /// Statement terminator, with the `;` elided when the next token is
    /// the closing brace of the enclosing block. The error points at the
    /// end of the previously consumed token, where the `;` belonged.
    pub fn expect_terminator(&mut self) -> Result<(), Diagnostic> {
        if self.current.kind == TokenKind::Semicolon {
            self.advance()?;
            return Ok(());
        }
        if self.current.kind == TokenKind::CloseBrace {
            return Ok(());
        }
        Err(Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                expected: String::from("`;`"),
                found: self.current.describe(),
            },
            self.end_position(),
        ))
    }

    pub fn unexpected(&self, expected: &str) -> Diagnostic {
        Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                expected: expected.to_string(),
                found: self.current.describe(),
            },
            self.current.span.start.clone(),
        )
    }

    /// Where the most recently consumed token ended; used to close off
    /// node spans.
    pub fn end_position(&self) -> Position {
        match &self.previous {
            Some(token) => token.span.end.clone(),
            None => self.current.span.start.clone(),
        }
    }

    pub fn scopes(&self) -> &ScopeTree {
        self.scopes
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current_scope
    }

    /// Registers a declaration in the currently active scope.
    pub fn declare(&mut self, symbol: Symbol) -> Result<(), Diagnostic> {
        self.scopes.declare(self.current_scope, symbol)
    }

    /// Runs `f` inside a fresh child scope of the given kind. The
    /// previous scope is restored on every exit path, error returns
    /// included.
    pub fn with_new_scope<T>(
        &mut self,
        kind: ScopeKind,
        f: impl FnOnce(&mut Self) -> Result<T, Diagnostic>,
    ) -> Result<(T, ScopeId), Diagnostic> {
        let child = self.scopes.push_scope(kind, Some(self.current_scope));
        let saved = std::mem::replace(&mut self.current_scope, child);
        let result = f(self);
        self.current_scope = saved;
        Ok((result?, child))
    }

    /// Runs `f` with an existing scope as the current one (impl blocks
    /// re-enter the target struct's scope). Restores on every exit path.
    pub fn with_scope<T>(
        &mut self,
        scope: ScopeId,
        f: impl FnOnce(&mut Self) -> Result<T, Diagnostic>,
    ) -> Result<T, Diagnostic> {
        let saved = std::mem::replace(&mut self.current_scope, scope);
        let result = f(self);
        self.current_scope = saved;
        result
    }
}

/// Parses one source file into a Package rooted in a fresh package
/// scope. `file` is the name diagnostics point at.
pub fn parse_package(
    source: &str,
    name: String,
    file: String,
    scopes: &mut ScopeTree,
) -> Result<Package, Diagnostic> {
    let lexer = Lexer::new(source.to_string(), Rc::new(file));
    let package_scope = scopes.push_scope(ScopeKind::Package, None);
    let mut parser = Parser::new(lexer, scopes, package_scope)?;

    let start = parser.current_token().span.start.clone();
    let imports = parse_imports(&mut parser)?;

    let mut declarations = Vec::new();
    while parser.current_kind() != TokenKind::Eof {
        declarations.push(parse_decl(&mut parser)?);
    }

    Ok(Package {
        name,
        imports,
        declarations,
        scope: package_scope,
        span: Span {
            start,
            end: parser.end_position(),
        },
    })
}
