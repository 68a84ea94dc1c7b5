use crate::{
    ast::{
        ast::{
            Decl, EnumDecl, EnumVariantDecl, FieldDecl, FunctionDecl, ImplDecl, Import,
            ParameterDecl, StructDecl, TraitDecl, VariableDecl,
        },
        types::Type,
    },
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::tokens::{Token, TokenKind},
    scope::scope::{FunctionSig, ScopeKind, Symbol, SymbolKind},
    Span,
};

use super::{
    expr::parse_expr,
    lookups::BindingPower,
    parser::Parser,
    stmt::parse_compound_in_current_scope,
    types::parse_type,
};

/// The `pkg <name>;` imports at the top of a package file.
pub fn parse_imports(parser: &mut Parser) -> Result<Vec<Import>, Diagnostic> {
    let mut imports = Vec::new();
    while parser.current_token().is_identifier("pkg") {
        let start = parser.advance()?.span.start;
        let name = parser.expect_identifier()?;
        parser.expect(TokenKind::Semicolon)?;

        imports.push(Import {
            name: name.text,
            span: Span {
                start,
                end: parser.end_position(),
            },
        });
    }
    Ok(imports)
}

/// One top-level declaration, optionally marked private.
pub fn parse_decl(parser: &mut Parser) -> Result<Decl, Diagnostic> {
    let is_private = if parser.current_token().is_identifier("priv") {
        parser.advance()?;
        true
    } else {
        false
    };

    if parser.current_kind() != TokenKind::Identifier {
        return Err(parser.unexpected("a declaration"));
    }

    match parser.current_token().text.as_str() {
        "fn" => parse_function_decl(parser, is_private).map(Decl::Function),
        "struct" => parse_struct_decl(parser, is_private).map(Decl::Struct),
        "trait" => parse_trait_decl(parser, is_private).map(Decl::Trait),
        "enum" => parse_enum_decl(parser, is_private).map(Decl::Enum),
        "impl" if !is_private => parse_impl_decl(parser).map(Decl::Impl),
        "let" => parse_var_decl(parser, is_private).map(Decl::Variable),
        _ => Err(parser.unexpected("a declaration")),
    }
}

/// The common `fn name(params) [-> type]` prefix of function
/// declarations and trait method signatures.
fn parse_function_header(
    parser: &mut Parser,
) -> Result<(Token, Vec<ParameterDecl>, Type), Diagnostic> {
    parser.expect_keyword("fn")?;
    let name = parser.expect_identifier()?;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    while parser.current_kind() != TokenKind::CloseParen {
        let param_name = parser.expect_identifier()?;
        parser.expect(TokenKind::Colon)?;
        let ty = parse_type(parser, BindingPower::Default)?;

        parameters.push(ParameterDecl {
            name: param_name.text,
            ty,
            span: Span {
                start: param_name.span.start,
                end: parser.end_position(),
            },
        });

        if parser.current_kind() == TokenKind::Comma {
            parser.advance()?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser.current_kind() == TokenKind::Arrow {
        parser.advance()?;
        parse_type(parser, BindingPower::Default)?
    } else {
        Type::void()
    };

    Ok((name, parameters, return_type))
}

fn declare_parameters(parser: &mut Parser, parameters: &[ParameterDecl]) -> Result<(), Diagnostic> {
    for param in parameters {
        parser.declare(Symbol {
            name: param.name.clone(),
            kind: SymbolKind::Parameter {
                ty: param.ty.clone(),
            },
            span: param.span.clone(),
        })?;
    }
    Ok(())
}

fn function_sig(name: &str, parameters: &[ParameterDecl], return_type: &Type) -> FunctionSig {
    FunctionSig {
        name: name.to_string(),
        params: parameters
            .iter()
            .map(|param| (param.name.clone(), param.ty.clone()))
            .collect(),
        return_type: return_type.clone(),
    }
}

/// A full function declaration. The function scope holds the parameters
/// and the body's locals; the function itself is registered in the
/// enclosing scope once fully parsed.
pub fn parse_function_decl(
    parser: &mut Parser,
    is_private: bool,
) -> Result<FunctionDecl, Diagnostic> {
    let start = parser.current_token().span.start.clone();
    let (name, parameters, return_type) = parse_function_header(parser)?;

    let (body, scope) = parser.with_new_scope(ScopeKind::Function, |parser| {
        declare_parameters(parser, &parameters)?;
        parse_compound_in_current_scope(parser)
    })?;

    let span = Span {
        start,
        end: parser.end_position(),
    };

    parser.declare(Symbol {
        name: name.text.clone(),
        kind: SymbolKind::Function(function_sig(&name.text, &parameters, &return_type)),
        span: span.clone(),
    })?;

    Ok(FunctionDecl {
        name: name.text,
        parameters,
        return_type,
        body: Some(body),
        scope,
        is_private,
        span,
    })
}

pub fn parse_struct_decl(parser: &mut Parser, is_private: bool) -> Result<StructDecl, Diagnostic> {
    let start = parser.expect_keyword("struct")?.span.start;
    let name = parser.expect_identifier()?;

    parser.expect(TokenKind::OpenBrace)?;

    let (fields, scope) = parser.with_new_scope(ScopeKind::Struct, |parser| {
        let mut fields: Vec<FieldDecl> = Vec::new();
        while parser.current_kind() != TokenKind::CloseBrace
            && parser.current_kind() != TokenKind::Eof
        {
            let field_name = parser.expect_identifier()?;
            parser.expect(TokenKind::Colon)?;
            let ty = parse_type(parser, BindingPower::Default)?;

            let field = FieldDecl {
                name: field_name.text,
                ty,
                span: Span {
                    start: field_name.span.start,
                    end: parser.end_position(),
                },
            };
            parser.declare(Symbol {
                name: field.name.clone(),
                kind: SymbolKind::Field {
                    ty: field.ty.clone(),
                },
                span: field.span.clone(),
            })?;
            fields.push(field);

            if parser.current_kind() == TokenKind::Comma {
                parser.advance()?;
            }
        }
        Ok(fields)
    })?;

    parser.expect(TokenKind::CloseBrace)?;

    let span = Span {
        start,
        end: parser.end_position(),
    };

    parser.declare(Symbol {
        name: name.text.clone(),
        kind: SymbolKind::Struct {
            fields: fields
                .iter()
                .map(|field| (field.name.clone(), field.ty.clone()))
                .collect(),
            scope,
        },
        span: span.clone(),
    })?;

    Ok(StructDecl {
        name: name.text,
        fields,
        scope,
        is_private,
        span,
    })
}

/// Trait methods are signatures only; a `{` where the `;` belongs is a
/// parse error.
pub fn parse_trait_decl(parser: &mut Parser, is_private: bool) -> Result<TraitDecl, Diagnostic> {
    let start = parser.expect_keyword("trait")?.span.start;
    let name = parser.expect_identifier()?;

    parser.expect(TokenKind::OpenBrace)?;

    let mut methods = Vec::new();
    while parser.current_kind() != TokenKind::CloseBrace && parser.current_kind() != TokenKind::Eof
    {
        let method_start = parser.current_token().span.start.clone();
        let (method_name, parameters, return_type) = parse_function_header(parser)?;

        if parser.current_kind() == TokenKind::OpenBrace {
            return Err(Diagnostic::new(
                DiagnosticKind::TraitMethodBody {
                    name: method_name.text,
                },
                parser.current_token().span.start.clone(),
            ));
        }
        parser.expect(TokenKind::Semicolon)?;

        // The signature still gets a scope of its own so duplicate
        // parameter names are rejected here too.
        let ((), scope) = parser.with_new_scope(ScopeKind::Function, |parser| {
            declare_parameters(parser, &parameters)
        })?;

        methods.push(FunctionDecl {
            name: method_name.text,
            parameters,
            return_type,
            body: None,
            scope,
            is_private: false,
            span: Span {
                start: method_start,
                end: parser.end_position(),
            },
        });
    }

    parser.expect(TokenKind::CloseBrace)?;

    let span = Span {
        start,
        end: parser.end_position(),
    };

    parser.declare(Symbol {
        name: name.text.clone(),
        kind: SymbolKind::Trait {
            methods: methods
                .iter()
                .map(|method| function_sig(&method.name, &method.parameters, &method.return_type))
                .collect(),
        },
        span: span.clone(),
    })?;

    Ok(TraitDecl {
        name: name.text,
        methods,
        is_private,
        span,
    })
}

pub fn parse_enum_decl(parser: &mut Parser, is_private: bool) -> Result<EnumDecl, Diagnostic> {
    let start = parser.expect_keyword("enum")?.span.start;
    let name = parser.expect_identifier()?;

    parser.expect(TokenKind::OpenBrace)?;

    let mut variants: Vec<EnumVariantDecl> = Vec::new();
    while parser.current_kind() != TokenKind::CloseBrace && parser.current_kind() != TokenKind::Eof
    {
        let variant = parser.expect_identifier()?;
        if variants.iter().any(|existing| existing.name == variant.text) {
            return Err(Diagnostic::new(
                DiagnosticKind::DuplicateDeclaration { name: variant.text },
                variant.span.start,
            ));
        }
        variants.push(EnumVariantDecl {
            name: variant.text,
            span: variant.span,
        });

        if parser.current_kind() == TokenKind::Comma {
            parser.advance()?;
        }
    }

    parser.expect(TokenKind::CloseBrace)?;

    let span = Span {
        start,
        end: parser.end_position(),
    };

    parser.declare(Symbol {
        name: name.text.clone(),
        kind: SymbolKind::Enum {
            variants: variants.iter().map(|variant| variant.name.clone()).collect(),
        },
        span: span.clone(),
    })?;

    Ok(EnumDecl {
        name: name.text,
        variants,
        is_private,
        span,
    })
}

/// `impl Struct [: Trait] { fn ... }`. The target struct's own scope is
/// re-entered for the method bodies, so methods see the struct's fields
/// the way the struct body itself did, and the methods are registered
/// there. The prior scope is restored afterwards on every path.
pub fn parse_impl_decl(parser: &mut Parser) -> Result<ImplDecl, Diagnostic> {
    let start = parser.expect_keyword("impl")?.span.start;
    let target = parser.expect_identifier()?;

    let trait_name = if parser.current_kind() == TokenKind::Colon {
        parser.advance()?;
        Some(parser.expect_identifier()?.text)
    } else {
        None
    };

    let struct_scope = match parser.scopes().lookup(parser.current_scope(), &target.text) {
        Some(Symbol {
            kind: SymbolKind::Struct { scope, .. },
            ..
        }) => *scope,
        Some(_) => {
            return Err(Diagnostic::new(
                DiagnosticKind::NotAStruct { name: target.text },
                target.span.start,
            ))
        }
        None => {
            return Err(Diagnostic::new(
                DiagnosticKind::UnknownType { name: target.text },
                target.span.start,
            ))
        }
    };

    parser.expect(TokenKind::OpenBrace)?;

    let methods = parser.with_scope(struct_scope, |parser| {
        let mut methods = Vec::new();
        while parser.current_kind() != TokenKind::CloseBrace
            && parser.current_kind() != TokenKind::Eof
        {
            methods.push(parse_function_decl(parser, false)?);
        }
        Ok(methods)
    })?;

    parser.expect(TokenKind::CloseBrace)?;

    Ok(ImplDecl {
        struct_name: target.text,
        trait_name,
        methods,
        span: Span {
            start,
            end: parser.end_position(),
        },
    })
}

/// `let name: type [= expr];` in either statement or package context.
/// The variable is registered once the whole declaration has parsed.
pub fn parse_var_decl(parser: &mut Parser, is_private: bool) -> Result<VariableDecl, Diagnostic> {
    let start = parser.expect_keyword("let")?.span.start;
    let name = parser.expect_identifier()?;

    parser.expect(TokenKind::Colon)?;
    let ty = parse_type(parser, BindingPower::Default)?;

    let initializer = if parser.current_kind() == TokenKind::Assign {
        parser.advance()?;
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect_terminator()?;

    let span = Span {
        start,
        end: parser.end_position(),
    };

    parser.declare(Symbol {
        name: name.text.clone(),
        kind: SymbolKind::Variable { ty: ty.clone() },
        span: span.clone(),
    })?;

    Ok(VariableDecl {
        name: name.text,
        ty,
        initializer,
        is_private,
        span,
    })
}
