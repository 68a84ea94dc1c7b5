use std::mem;

use log::debug;

use crate::{
    ast::{
        ast::{Crate, Decl, FunctionDecl, ImplDecl, Package, StructDecl, TraitDecl, VariableDecl},
        expressions::Expr,
        statements::{CompoundStmt, MatchStmt, Stmt},
        types::Type,
    },
    errors::errors::{Diagnostic, DiagnosticKind},
    scope::scope::{FunctionSig, ScopeId, ScopeTree, Symbol, SymbolKind},
    Position,
};

/// Validates a parsed crate in place. On success every named-type
/// placeholder has been rewritten to its concrete type and the backend
/// may rely on the invariants checked here.
pub fn analyze(krate: &mut Crate) -> Result<(), Diagnostic> {
    let Crate { packages, scopes } = krate;
    debug!("analyzing crate with {} package(s)", packages.len());

    let mut names: Vec<String> = Vec::new();
    for package in packages.iter() {
        if names.iter().any(|name| name == &package.name) {
            return Err(Diagnostic::new(
                DiagnosticKind::DuplicatePackage {
                    name: package.name.clone(),
                },
                package.span.start.clone(),
            ));
        }
        names.push(package.name.clone());
    }

    let first_scope = match packages.first() {
        Some(package) => package.scope,
        None => return Err(Diagnostic::unlocated(DiagnosticKind::MissingEntryPoint)),
    };

    let mut analyzer = Analyzer {
        scopes,
        scope: first_scope,
        return_type: None,
        in_loop: false,
        entry_points: 0,
    };

    for package in packages.iter_mut() {
        analyzer.check_package(package, &names)?;
    }

    if analyzer.entry_points == 0 {
        return Err(Diagnostic::unlocated(DiagnosticKind::MissingEntryPoint));
    }

    Ok(())
}

/// The traversal context: one value threaded through the whole pass
/// instead of ambient globals. `scope` follows the compound being
/// visited, `return_type` is the ambient function return context, and
/// `in_loop` is set entering and cleared leaving an `until` body.
pub struct Analyzer<'a> {
    pub(crate) scopes: &'a mut ScopeTree,
    pub(crate) scope: ScopeId,
    return_type: Option<Type>,
    in_loop: bool,
    entry_points: u32,
}

impl<'a> Analyzer<'a> {
    fn check_package(
        &mut self,
        package: &mut Package,
        crate_packages: &[String],
    ) -> Result<(), Diagnostic> {
        self.scope = package.scope;

        let mut seen: Vec<&str> = Vec::new();
        for import in &package.imports {
            if !crate_packages.iter().any(|name| name == &import.name) {
                return Err(Diagnostic::new(
                    DiagnosticKind::UnresolvedImport {
                        name: import.name.clone(),
                    },
                    import.span.start.clone(),
                ));
            }
            if seen.contains(&import.name.as_str()) {
                return Err(Diagnostic::new(
                    DiagnosticKind::DuplicateImport {
                        name: import.name.clone(),
                    },
                    import.span.start.clone(),
                ));
            }
            seen.push(&import.name);
        }

        for decl in package.declarations.iter_mut() {
            self.check_decl(decl)?;
        }

        Ok(())
    }

    fn check_decl(&mut self, decl: &mut Decl) -> Result<(), Diagnostic> {
        match decl {
            Decl::Function(function) => {
                if function.name == "main" {
                    self.note_entry_point(function)?;
                }
                self.check_function(function)
            }
            Decl::Struct(decl) => self.check_struct(decl),
            Decl::Trait(decl) => self.check_trait(decl),
            Decl::Enum(_) => Ok(()),
            Decl::Impl(decl) => self.check_impl(decl),
            Decl::Variable(decl) => self.check_variable_decl(decl),
        }
    }

    /// The crate needs exactly one `main`, taking no parameters and
    /// returning no value.
    fn note_entry_point(&mut self, function: &FunctionDecl) -> Result<(), Diagnostic> {
        self.entry_points += 1;
        if self.entry_points > 1 {
            return Err(Diagnostic::new(
                DiagnosticKind::DuplicateEntryPoint,
                function.span.start.clone(),
            ));
        }
        if !function.parameters.is_empty() || !function.return_type.is_void() {
            return Err(Diagnostic::new(
                DiagnosticKind::InvalidEntryPoint,
                function.span.start.clone(),
            ));
        }
        Ok(())
    }

    fn check_function(&mut self, function: &mut FunctionDecl) -> Result<(), Diagnostic> {
        for param in function.parameters.iter_mut() {
            let at = param.span.start.clone();
            self.resolve_type(&mut param.ty, function.scope, &at)?;
        }
        let at = function.span.start.clone();
        self.resolve_type(&mut function.return_type, function.scope, &at)?;

        if let Some(body) = &mut function.body {
            let saved = self.return_type.replace(function.return_type.clone());
            let result = self.check_compound(body);
            self.return_type = saved;
            result?;
        }

        Ok(())
    }

    fn check_struct(&mut self, decl: &mut StructDecl) -> Result<(), Diagnostic> {
        for field in decl.fields.iter_mut() {
            let at = field.span.start.clone();
            self.resolve_type(&mut field.ty, decl.scope, &at)?;
        }
        Ok(())
    }

    /// Trait method signatures are visited like functions; the grammar
    /// has already ruled bodies out.
    fn check_trait(&mut self, decl: &mut TraitDecl) -> Result<(), Diagnostic> {
        for method in decl.methods.iter_mut() {
            self.check_function(method)?;
        }
        Ok(())
    }

    fn check_impl(&mut self, decl: &mut ImplDecl) -> Result<(), Diagnostic> {
        let at = decl.span.start.clone();

        match self.scopes.lookup(self.scope, &decl.struct_name) {
            Some(Symbol {
                kind: SymbolKind::Struct { .. },
                ..
            }) => {}
            Some(_) => {
                return Err(Diagnostic::new(
                    DiagnosticKind::NotAStruct {
                        name: decl.struct_name.clone(),
                    },
                    at,
                ))
            }
            None => {
                return Err(Diagnostic::new(
                    DiagnosticKind::UnknownType {
                        name: decl.struct_name.clone(),
                    },
                    at,
                ))
            }
        }

        if let Some(trait_name) = decl.trait_name.clone() {
            self.check_conformance(decl, &trait_name)?;
        }

        for method in decl.methods.iter_mut() {
            self.check_function(method)?;
        }

        Ok(())
    }

    /// The impl must supply a method of matching name and matching
    /// resolved signature for every method the trait declares. Methods
    /// beyond the trait's are permitted.
    fn check_conformance(&mut self, decl: &ImplDecl, trait_name: &str) -> Result<(), Diagnostic> {
        let at = decl.span.start.clone();

        let required: Vec<FunctionSig> = match self.scopes.lookup(self.scope, trait_name) {
            Some(Symbol {
                kind: SymbolKind::Trait { methods },
                ..
            }) => methods.clone(),
            Some(_) => {
                return Err(Diagnostic::new(
                    DiagnosticKind::NotATrait {
                        name: trait_name.to_string(),
                    },
                    at,
                ))
            }
            None => {
                return Err(Diagnostic::new(
                    DiagnosticKind::UnknownTrait {
                        name: trait_name.to_string(),
                    },
                    at,
                ))
            }
        };

        for required_sig in &required {
            let provided = match decl
                .methods
                .iter()
                .find(|method| method.name == required_sig.name)
            {
                Some(method) => method,
                None => {
                    return Err(Diagnostic::new(
                        DiagnosticKind::MissingTraitMethod {
                            trait_name: trait_name.to_string(),
                            method: required_sig.name.clone(),
                        },
                        at,
                    ))
                }
            };

            let wanted = self.resolved_sig(required_sig, &at)?;
            let given = self.resolved_sig(
                &FunctionSig {
                    name: provided.name.clone(),
                    params: provided
                        .parameters
                        .iter()
                        .map(|param| (param.name.clone(), param.ty.clone()))
                        .collect(),
                    return_type: provided.return_type.clone(),
                },
                &provided.span.start,
            )?;

            let params_match = wanted.params.len() == given.params.len()
                && wanted
                    .params
                    .iter()
                    .zip(given.params.iter())
                    .all(|((_, wanted_ty), (_, given_ty))| wanted_ty == given_ty);

            if !params_match || wanted.return_type != given.return_type {
                return Err(Diagnostic::new(
                    DiagnosticKind::TraitMethodSignatureMismatch {
                        trait_name: trait_name.to_string(),
                        method: required_sig.name.clone(),
                    },
                    provided.span.start.clone(),
                ));
            }
        }

        Ok(())
    }

    /// The initializer is visited first; the declared type is then
    /// resolved and must structurally equal the initializer's type.
    /// There is no implicit coercion.
    fn check_variable_decl(&mut self, decl: &mut VariableDecl) -> Result<(), Diagnostic> {
        let initializer_ty = match &decl.initializer {
            Some(expr) => Some(self.type_of_expr(expr, self.scope)?),
            None => None,
        };

        let at = decl.span.start.clone();
        self.resolve_type(&mut decl.ty, self.scope, &at)?;

        if let Some(initializer_ty) = initializer_ty {
            if initializer_ty != decl.ty {
                return Err(Diagnostic::new(
                    DiagnosticKind::TypeMismatch {
                        expected: decl.ty.to_string(),
                        received: initializer_ty.to_string(),
                    },
                    at,
                ));
            }
        }

        Ok(())
    }

    fn check_compound(&mut self, compound: &mut CompoundStmt) -> Result<(), Diagnostic> {
        let saved = mem::replace(&mut self.scope, compound.scope);
        let mut result = Ok(());
        for stmt in compound.statements.iter_mut() {
            result = self.check_stmt(stmt);
            if result.is_err() {
                break;
            }
        }
        self.scope = saved;
        result
    }

    fn check_stmt(&mut self, stmt: &mut Stmt) -> Result<(), Diagnostic> {
        match stmt {
            Stmt::Compound(compound) => self.check_compound(compound),
            Stmt::If(stmt) => {
                let ty = self.type_of_expr(&stmt.condition, self.scope)?;
                if !ty.is_bool() {
                    return Err(Diagnostic::new(
                        DiagnosticKind::NonBooleanCondition {
                            received: ty.to_string(),
                        },
                        stmt.condition.span().start.clone(),
                    ));
                }
                self.check_compound(&mut stmt.then_body)?;
                if let Some(else_body) = &mut stmt.else_body {
                    self.check_stmt(else_body)?;
                }
                Ok(())
            }
            Stmt::Match(stmt) => self.check_match(stmt),
            Stmt::Until(stmt) => {
                let ty = self.type_of_expr(&stmt.condition, self.scope)?;
                if !ty.is_bool() {
                    return Err(Diagnostic::new(
                        DiagnosticKind::NonBooleanCondition {
                            received: ty.to_string(),
                        },
                        stmt.condition.span().start.clone(),
                    ));
                }

                let saved = mem::replace(&mut self.in_loop, true);
                let result = self.check_compound(&mut stmt.body);
                self.in_loop = saved;
                result
            }
            Stmt::Return(stmt) => {
                let expected = match self.return_type.clone() {
                    Some(expected) => expected,
                    None => {
                        return Err(Diagnostic::new(
                            DiagnosticKind::ReturnOutsideFunction,
                            stmt.span.start.clone(),
                        ))
                    }
                };

                let received = match &stmt.value {
                    Some(expr) => self.type_of_expr(expr, self.scope)?,
                    None => Type::void(),
                };

                if received != expected {
                    return Err(Diagnostic::new(
                        DiagnosticKind::ReturnTypeMismatch {
                            expected: expected.to_string(),
                            received: received.to_string(),
                        },
                        stmt.span.start.clone(),
                    ));
                }
                Ok(())
            }
            Stmt::Break(span) => {
                if !self.in_loop {
                    return Err(Diagnostic::new(
                        DiagnosticKind::BreakOutsideLoop,
                        span.start.clone(),
                    ));
                }
                Ok(())
            }
            Stmt::Continue(span) => {
                if !self.in_loop {
                    return Err(Diagnostic::new(
                        DiagnosticKind::ContinueOutsideLoop,
                        span.start.clone(),
                    ));
                }
                Ok(())
            }
            Stmt::Declaration(decl) => self.check_variable_decl(decl),
            Stmt::Expression(expr) => {
                self.type_of_expr(expr, self.scope)?;
                Ok(())
            }
        }
    }

    /// A boolean scrutinee must cover `true` and `false` exactly once
    /// each (a default is allowed but not required); any other matchable
    /// scrutinee requires a `_` default case.
    fn check_match(&mut self, stmt: &mut MatchStmt) -> Result<(), Diagnostic> {
        let scrutinee_ty = self.type_of_expr(&stmt.scrutinee, self.scope)?;
        if !scrutinee_ty.is_matchable() {
            return Err(Diagnostic::new(
                DiagnosticKind::UnmatchableScrutinee {
                    received: scrutinee_ty.to_string(),
                },
                stmt.scrutinee.span().start.clone(),
            ));
        }

        let mut has_default = false;
        let mut seen_true = false;
        let mut seen_false = false;

        for case in &stmt.cases {
            let pattern = match &case.pattern {
                None => {
                    if has_default {
                        return Err(Diagnostic::new(
                            DiagnosticKind::DuplicateMatchCase {
                                value: String::from("_"),
                            },
                            case.span.start.clone(),
                        ));
                    }
                    has_default = true;
                    continue;
                }
                Some(pattern) => pattern,
            };

            let pattern_ty = self.type_of_expr(pattern, self.scope)?;
            if pattern_ty != scrutinee_ty {
                return Err(Diagnostic::new(
                    DiagnosticKind::TypeMismatch {
                        expected: scrutinee_ty.to_string(),
                        received: pattern_ty.to_string(),
                    },
                    pattern.span().start.clone(),
                ));
            }

            if let Expr::Bool(value, span) = pattern {
                let seen = if *value { &mut seen_true } else { &mut seen_false };
                if *seen {
                    return Err(Diagnostic::new(
                        DiagnosticKind::DuplicateMatchCase {
                            value: value.to_string(),
                        },
                        span.start.clone(),
                    ));
                }
                *seen = true;
            }
        }

        if scrutinee_ty.is_bool() {
            for (seen, value) in [(seen_true, "true"), (seen_false, "false")] {
                if !seen {
                    return Err(Diagnostic::new(
                        DiagnosticKind::MissingMatchCase {
                            value: value.to_string(),
                        },
                        stmt.span.start.clone(),
                    ));
                }
            }
        } else if !has_default {
            return Err(Diagnostic::new(
                DiagnosticKind::MissingMatchDefault,
                stmt.span.start.clone(),
            ));
        }

        for case in stmt.cases.iter_mut() {
            self.check_compound(&mut case.body)?;
        }

        Ok(())
    }

    /// Rewrites a named-type placeholder to the struct it names, looked
    /// up through the scope chain. Already-resolved types pass through
    /// untouched, which makes resolution idempotent.
    pub(crate) fn resolve_type(
        &mut self,
        ty: &mut Type,
        scope: ScopeId,
        at: &Position,
    ) -> Result<(), Diagnostic> {
        match ty {
            Type::Named(name) => match self.scopes.lookup(scope, name) {
                Some(Symbol {
                    kind: SymbolKind::Struct { .. },
                    ..
                }) => {
                    *ty = Type::Struct(name.clone());
                    Ok(())
                }
                _ => Err(Diagnostic::new(
                    DiagnosticKind::UnknownType { name: name.clone() },
                    at.clone(),
                )),
            },
            Type::Array(inner, _) | Type::Rune(inner) => self.resolve_type(inner, scope, at),
            _ => Ok(()),
        }
    }

    /// Resolution applied to a copy, for types that live in the symbol
    /// table rather than the AST. Same lookup rule, same idempotence.
    pub(crate) fn resolved(
        &self,
        ty: &Type,
        scope: ScopeId,
        at: &Position,
    ) -> Result<Type, Diagnostic> {
        match ty {
            Type::Named(name) => match self.scopes.lookup(scope, name) {
                Some(Symbol {
                    kind: SymbolKind::Struct { .. },
                    ..
                }) => Ok(Type::Struct(name.clone())),
                _ => Err(Diagnostic::new(
                    DiagnosticKind::UnknownType { name: name.clone() },
                    at.clone(),
                )),
            },
            Type::Array(inner, size) => {
                let inner = self.resolved(inner, scope, at)?;
                Ok(Type::Array(Box::new(inner), *size))
            }
            Type::Rune(inner) => {
                let inner = self.resolved(inner, scope, at)?;
                Ok(Type::Rune(Box::new(inner)))
            }
            other => Ok(other.clone()),
        }
    }

    fn resolved_sig(&self, sig: &FunctionSig, at: &Position) -> Result<FunctionSig, Diagnostic> {
        let mut params = Vec::new();
        for (name, ty) in &sig.params {
            params.push((name.clone(), self.resolved(ty, self.scope, at)?));
        }
        Ok(FunctionSig {
            name: sig.name.clone(),
            params,
            return_type: self.resolved(&sig.return_type, self.scope, at)?,
        })
    }
}
