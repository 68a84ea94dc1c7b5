use crate::{
    scope::scope::{ScopeId, ScopeTree},
    Span,
};

use super::{expressions::Expr, statements::CompoundStmt, types::Type};

/// Top-level declarations of a package.
#[derive(Debug, Clone)]
pub enum Decl {
    Function(FunctionDecl),
    Struct(StructDecl),
    Trait(TraitDecl),
    Enum(EnumDecl),
    Impl(ImplDecl),
    Variable(VariableDecl),
}

/// A function declaration. `body` is absent on trait method signatures;
/// `scope` is the function's own scope, holding its parameters and the
/// body's locals.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub parameters: Vec<ParameterDecl>,
    pub return_type: Type,
    pub body: Option<CompoundStmt>,
    pub scope: ScopeId,
    pub is_private: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParameterDecl {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub scope: ScopeId,
    pub is_private: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

/// A named set of method signatures a struct may implement.
#[derive(Debug, Clone)]
pub struct TraitDecl {
    pub name: String,
    pub methods: Vec<FunctionDecl>,
    pub is_private: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: String,
    pub variants: Vec<EnumVariantDecl>,
    pub is_private: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct EnumVariantDecl {
    pub name: String,
    pub span: Span,
}

/// Methods for a struct, inherent or bound to a trait. Method bodies are
/// parsed inside the target struct's own scope.
#[derive(Debug, Clone)]
pub struct ImplDecl {
    pub struct_name: String,
    pub trait_name: Option<String>,
    pub methods: Vec<FunctionDecl>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VariableDecl {
    pub name: String,
    pub ty: Type,
    pub initializer: Option<Expr>,
    pub is_private: bool,
    pub span: Span,
}

/// A `pkg <name>;` import at the top of a package file.
#[derive(Debug, Clone)]
pub struct Import {
    pub name: String,
    pub span: Span,
}

/// One source file's worth of declarations plus its imports. The package
/// name is the file stem.
#[derive(Debug)]
pub struct Package {
    pub name: String,
    pub imports: Vec<Import>,
    pub declarations: Vec<Decl>,
    pub scope: ScopeId,
    pub span: Span,
}

/// The whole-program unit handed to the backend once validated.
#[derive(Debug)]
pub struct Crate {
    pub packages: Vec<Package>,
    pub scopes: ScopeTree,
}
