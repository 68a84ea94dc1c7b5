//! Expression typing.
//!
//! Every check the analyzer performs reduces to knowing an expression's
//! type: declared-versus-initializer equality, boolean conditions,
//! matchable scrutinees, return types, call arguments. The functions
//! here compute those types against the scope tree without mutating the
//! expression nodes. Literal nodes carry their intrinsic type in their
//! variant, so no separate subkind consistency check is needed.

use crate::{
    ast::{
        expressions::{
            BinaryExpr, BinaryOp, CallExpr, Expr, IndexExpr, MemberExpr, MethodCallExpr,
            PostfixExpr, StructInitExpr, UnaryExpr, UnaryOp,
        },
        types::{Builtin, IntWidth, Type},
    },
    errors::errors::{Diagnostic, DiagnosticKind},
    scope::scope::{ScopeId, Symbol, SymbolKind},
    Position,
};

use super::analyzer::Analyzer;

impl<'a> Analyzer<'a> {
    pub(crate) fn type_of_expr(&self, expr: &Expr, scope: ScopeId) -> Result<Type, Diagnostic> {
        match expr {
            Expr::Null(_) => Ok(Type::Builtin(Builtin::Null)),
            Expr::Bool(_, _) => Ok(Type::Builtin(Builtin::Bool)),
            Expr::Integer(_, _) => Ok(Type::Int(IntWidth::I64)),
            Expr::Float(_, _) => Ok(Type::Builtin(Builtin::Float)),
            Expr::Char(_, _) => Ok(Type::Builtin(Builtin::Char)),
            Expr::Byte(_, _) => Ok(Type::Builtin(Builtin::Byte)),
            Expr::Str(_, _) => Ok(Type::Builtin(Builtin::Str)),
            Expr::ByteStr(bytes, _) => Ok(Type::Array(
                Box::new(Type::Builtin(Builtin::Byte)),
                bytes.len() as u32,
            )),
            Expr::Name(name, span) => self.type_of_name(name, scope, &span.start),
            Expr::Binary(inner) => self.type_of_binary(inner, scope),
            Expr::Unary(inner) => self.type_of_unary(inner, scope),
            Expr::Postfix(inner) => self.type_of_postfix(inner, scope),
            Expr::Call(inner) => self.type_of_call(inner, scope),
            Expr::Member(inner) => self.type_of_member(inner, scope),
            Expr::MethodCall(inner) => self.type_of_method_call(inner, scope),
            Expr::StructInit(inner) => self.type_of_struct_init(inner, scope),
            Expr::Index(inner) => self.type_of_index(inner, scope),
        }
    }

    fn type_of_name(&self, name: &str, scope: ScopeId, at: &Position) -> Result<Type, Diagnostic> {
        match self.scopes.lookup(scope, name) {
            Some(Symbol {
                kind:
                    SymbolKind::Variable { ty }
                    | SymbolKind::Parameter { ty }
                    | SymbolKind::Field { ty },
                ..
            }) => self.resolved(ty, scope, at),
            Some(_) => Err(Diagnostic::new(
                DiagnosticKind::NotAValue {
                    name: name.to_string(),
                },
                at.clone(),
            )),
            None => Err(Diagnostic::new(
                DiagnosticKind::UnknownIdentifier {
                    name: name.to_string(),
                },
                at.clone(),
            )),
        }
    }

    fn type_of_binary(&self, expr: &BinaryExpr, scope: ScopeId) -> Result<Type, Diagnostic> {
        let left = self.type_of_expr(&expr.left, scope)?;
        let right = self.type_of_expr(&expr.right, scope)?;
        let at = expr.span.start.clone();

        let op = expr.op;
        if left != right {
            return Err(Diagnostic::new(
                DiagnosticKind::TypeMismatch {
                    expected: left.to_string(),
                    received: right.to_string(),
                },
                at,
            ));
        }

        if op.is_logical() {
            if !left.is_bool() {
                return Err(self.invalid_operand(op.symbol(), &left, &at));
            }
            return Ok(Type::Builtin(Builtin::Bool));
        }
        if op.is_equality() {
            return Ok(Type::Builtin(Builtin::Bool));
        }
        if op.is_comparison() {
            if !left.is_numeric() {
                return Err(self.invalid_operand(op.symbol(), &left, &at));
            }
            return Ok(Type::Builtin(Builtin::Bool));
        }
        if op.is_arithmetic() {
            if !left.is_numeric() {
                return Err(self.invalid_operand(op.symbol(), &left, &at));
            }
            return Ok(left);
        }
        if op.is_bitwise() {
            if !left.is_integer() {
                return Err(self.invalid_operand(op.symbol(), &left, &at));
            }
            return Ok(left);
        }

        // Assignment and compound assignment evaluate to the assignee's
        // type; the compound forms need numeric operands.
        if op.is_assignment() && op != BinaryOp::Assign && !left.is_numeric() {
            return Err(self.invalid_operand(op.symbol(), &left, &at));
        }
        Ok(left)
    }

    fn type_of_unary(&self, expr: &UnaryExpr, scope: ScopeId) -> Result<Type, Diagnostic> {
        let operand = self.type_of_expr(&expr.operand, scope)?;
        let at = expr.span.start.clone();

        match expr.op {
            UnaryOp::Not => {
                if !operand.is_bool() {
                    return Err(self.invalid_operand(expr.op.symbol(), &operand, &at));
                }
                Ok(Type::Builtin(Builtin::Bool))
            }
            UnaryOp::Deref => match operand {
                Type::Rune(inner) => Ok(*inner),
                other => Err(self.invalid_operand(expr.op.symbol(), &other, &at)),
            },
            UnaryOp::RuneOf => Ok(Type::Rune(Box::new(operand))),
            UnaryOp::Range => {
                if !operand.is_integer() {
                    return Err(self.invalid_operand(expr.op.symbol(), &operand, &at));
                }
                Ok(operand)
            }
        }
    }

    fn type_of_postfix(&self, expr: &PostfixExpr, scope: ScopeId) -> Result<Type, Diagnostic> {
        let operand = self.type_of_expr(&expr.operand, scope)?;
        if !operand.is_integer() {
            return Err(self.invalid_operand(
                expr.op.symbol(),
                &operand,
                &expr.span.start,
            ));
        }
        Ok(operand)
    }

    fn type_of_call(&self, expr: &CallExpr, scope: ScopeId) -> Result<Type, Diagnostic> {
        let at = expr.span.start.clone();

        let sig = match self.scopes.lookup(scope, &expr.callee) {
            Some(Symbol {
                kind: SymbolKind::Function(sig),
                ..
            }) => sig.clone(),
            Some(_) => {
                return Err(Diagnostic::new(
                    DiagnosticKind::NotCallable {
                        name: expr.callee.clone(),
                    },
                    at,
                ))
            }
            None => {
                return Err(Diagnostic::new(
                    DiagnosticKind::UnknownIdentifier {
                        name: expr.callee.clone(),
                    },
                    at,
                ))
            }
        };

        self.check_arguments(&sig.params, &expr.arguments, scope, &at)?;
        self.resolved(&sig.return_type, scope, &at)
    }

    fn check_arguments(
        &self,
        params: &[(String, Type)],
        arguments: &[Expr],
        scope: ScopeId,
        at: &Position,
    ) -> Result<(), Diagnostic> {
        if arguments.len() > params.len() {
            return Err(Diagnostic::new(
                DiagnosticKind::UnexpectedArguments {
                    expected: params.len(),
                    received: arguments.len(),
                },
                at.clone(),
            ));
        }
        if arguments.len() < params.len() {
            return Err(Diagnostic::new(
                DiagnosticKind::MissingArguments {
                    expected: params.len(),
                    received: arguments.len(),
                },
                at.clone(),
            ));
        }

        for ((_, param_ty), argument) in params.iter().zip(arguments.iter()) {
            let expected = self.resolved(param_ty, scope, at)?;
            let received = self.type_of_expr(argument, scope)?;
            if received != expected {
                return Err(Diagnostic::new(
                    DiagnosticKind::ArgumentTypeMismatch {
                        expected: expected.to_string(),
                        received: received.to_string(),
                    },
                    argument.span().start.clone(),
                ));
            }
        }

        Ok(())
    }

    /// Member access: a field of a struct value, or an enum variant
    /// named through the enum (which evaluates as a 64-bit integer).
    fn type_of_member(&self, expr: &MemberExpr, scope: ScopeId) -> Result<Type, Diagnostic> {
        let at = expr.span.start.clone();

        if let Expr::Name(name, _) = &*expr.object {
            if let Some(Symbol {
                kind: SymbolKind::Enum { variants },
                ..
            }) = self.scopes.lookup(scope, name)
            {
                if variants.iter().any(|variant| variant == &expr.member) {
                    return Ok(Type::Int(IntWidth::I64));
                }
                return Err(Diagnostic::new(
                    DiagnosticKind::UnknownMember {
                        type_name: name.clone(),
                        member: expr.member.clone(),
                    },
                    at,
                ));
            }
        }

        let object = self.type_of_expr(&expr.object, scope)?;
        let fields = self.struct_fields(&object, &at)?;

        match fields.iter().find(|(name, _)| name == &expr.member) {
            Some((_, ty)) => self.resolved(ty, scope, &at),
            None => Err(Diagnostic::new(
                DiagnosticKind::UnknownMember {
                    type_name: object.to_string(),
                    member: expr.member.clone(),
                },
                at,
            )),
        }
    }

    fn type_of_method_call(
        &self,
        expr: &MethodCallExpr,
        scope: ScopeId,
    ) -> Result<Type, Diagnostic> {
        let at = expr.span.start.clone();
        let object = self.type_of_expr(&expr.object, scope)?;

        let struct_scope = match &object {
            Type::Struct(name) => match self.scopes.lookup(scope, name) {
                Some(Symbol {
                    kind: SymbolKind::Struct { scope, .. },
                    ..
                }) => *scope,
                _ => {
                    return Err(Diagnostic::new(
                        DiagnosticKind::UnknownType { name: name.clone() },
                        at,
                    ))
                }
            },
            other => {
                return Err(Diagnostic::new(
                    DiagnosticKind::NotAStruct {
                        name: other.to_string(),
                    },
                    at,
                ))
            }
        };

        let sig = match self.scopes.lookup_local(struct_scope, &expr.method) {
            Some(Symbol {
                kind: SymbolKind::Function(sig),
                ..
            }) => sig.clone(),
            Some(_) => {
                return Err(Diagnostic::new(
                    DiagnosticKind::NotCallable {
                        name: expr.method.clone(),
                    },
                    at,
                ))
            }
            None => {
                return Err(Diagnostic::new(
                    DiagnosticKind::UnknownMember {
                        type_name: object.to_string(),
                        member: expr.method.clone(),
                    },
                    at,
                ))
            }
        };

        self.check_arguments(&sig.params, &expr.arguments, scope, &at)?;
        self.resolved(&sig.return_type, scope, &at)
    }

    /// The initializer must name an existing struct and every
    /// initialized field must exist on it with a matching value type.
    fn type_of_struct_init(
        &self,
        expr: &StructInitExpr,
        scope: ScopeId,
    ) -> Result<Type, Diagnostic> {
        let at = expr.span.start.clone();

        let fields = match self.scopes.lookup(scope, &expr.name) {
            Some(Symbol {
                kind: SymbolKind::Struct { fields, .. },
                ..
            }) => fields.clone(),
            Some(_) => {
                return Err(Diagnostic::new(
                    DiagnosticKind::NotAStruct {
                        name: expr.name.clone(),
                    },
                    at,
                ))
            }
            None => {
                return Err(Diagnostic::new(
                    DiagnosticKind::UnknownType {
                        name: expr.name.clone(),
                    },
                    at,
                ))
            }
        };

        for (field_name, value) in &expr.fields {
            let declared = match fields.iter().find(|(name, _)| name == field_name) {
                Some((_, ty)) => self.resolved(ty, scope, &at)?,
                None => {
                    return Err(Diagnostic::new(
                        DiagnosticKind::UnknownMember {
                            type_name: expr.name.clone(),
                            member: field_name.clone(),
                        },
                        value.span().start.clone(),
                    ))
                }
            };

            let received = self.type_of_expr(value, scope)?;
            if received != declared {
                return Err(Diagnostic::new(
                    DiagnosticKind::FieldTypeMismatch {
                        expected: declared.to_string(),
                        received: received.to_string(),
                    },
                    value.span().start.clone(),
                ));
            }
        }

        Ok(Type::Struct(expr.name.clone()))
    }

    fn type_of_index(&self, expr: &IndexExpr, scope: ScopeId) -> Result<Type, Diagnostic> {
        let object = self.type_of_expr(&expr.object, scope)?;
        let index = self.type_of_expr(&expr.index, scope)?;

        if !index.is_integer() {
            return Err(self.invalid_operand("[]", &index, &expr.index.span().start));
        }

        match object {
            Type::Array(inner, _) => Ok(*inner),
            other => Err(Diagnostic::new(
                DiagnosticKind::NotIndexable {
                    received: other.to_string(),
                },
                expr.span.start.clone(),
            )),
        }
    }

    fn struct_fields(&self, ty: &Type, at: &Position) -> Result<Vec<(String, Type)>, Diagnostic> {
        match ty {
            Type::Struct(name) => match self.scopes.lookup(self.scope, name) {
                Some(Symbol {
                    kind: SymbolKind::Struct { fields, .. },
                    ..
                }) => Ok(fields.clone()),
                _ => Err(Diagnostic::new(
                    DiagnosticKind::UnknownType { name: name.clone() },
                    at.clone(),
                )),
            },
            other => Err(Diagnostic::new(
                DiagnosticKind::NotAStruct {
                    name: other.to_string(),
                },
                at.clone(),
            )),
        }
    }

    fn invalid_operand(&self, operator: &str, ty: &Type, at: &Position) -> Diagnostic {
        Diagnostic::new(
            DiagnosticKind::InvalidOperand {
                operator: operator.to_string(),
                received: ty.to_string(),
            },
            at.clone(),
        )
    }
}
