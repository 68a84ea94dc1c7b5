//! Type representations in the AST.
//!
//! Types form a closed variant. A bare type name the parser cannot bind
//! yet becomes `Type::Named`, the placeholder for a forward reference to
//! a struct within the package; the analyzer rewrites it to
//! `Type::Struct` in place. Resolution is idempotent: an already
//! resolved type resolves to itself and never re-raises an error.

use std::fmt::Display;

/// Widths of the sized integer types. `int` in source is the 64-bit one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
}

/// Builtin primitive types. `Void` is the unwritten return type of a
/// function without `->`; `Null` is the type of the null literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Void,
    Null,
    Bool,
    Char,
    Byte,
    Float,
    Str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Builtin(Builtin),
    Int(IntWidth),
    Array(Box<Type>, u32),
    Rune(Box<Type>),
    Struct(String),
    Named(String),
}

impl Type {
    pub fn void() -> Type {
        Type::Builtin(Builtin::Void)
    }

    /// Maps a builtin type name to its type, if the name is one.
    pub fn from_builtin_name(name: &str) -> Option<Type> {
        match name {
            "bool" => Some(Type::Builtin(Builtin::Bool)),
            "char" => Some(Type::Builtin(Builtin::Char)),
            "byte" => Some(Type::Builtin(Builtin::Byte)),
            "float" => Some(Type::Builtin(Builtin::Float)),
            "string" => Some(Type::Builtin(Builtin::Str)),
            "int" | "i64" => Some(Type::Int(IntWidth::I64)),
            "i8" => Some(Type::Int(IntWidth::I8)),
            "i16" => Some(Type::Int(IntWidth::I16)),
            "i32" => Some(Type::Int(IntWidth::I32)),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Builtin(Builtin::Void))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Builtin(Builtin::Bool))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int(_) | Type::Builtin(Builtin::Byte))
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, Type::Builtin(Builtin::Float))
    }

    /// Types a `match` scrutinee may have.
    pub fn is_matchable(&self) -> bool {
        matches!(
            self,
            Type::Int(_)
                | Type::Builtin(Builtin::Bool)
                | Type::Builtin(Builtin::Char)
                | Type::Builtin(Builtin::Byte)
                | Type::Builtin(Builtin::Str)
        )
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Builtin(Builtin::Void) => write!(f, "void"),
            Type::Builtin(Builtin::Null) => write!(f, "null"),
            Type::Builtin(Builtin::Bool) => write!(f, "bool"),
            Type::Builtin(Builtin::Char) => write!(f, "char"),
            Type::Builtin(Builtin::Byte) => write!(f, "byte"),
            Type::Builtin(Builtin::Float) => write!(f, "float"),
            Type::Builtin(Builtin::Str) => write!(f, "string"),
            Type::Int(IntWidth::I8) => write!(f, "i8"),
            Type::Int(IntWidth::I16) => write!(f, "i16"),
            Type::Int(IntWidth::I32) => write!(f, "i32"),
            Type::Int(IntWidth::I64) => write!(f, "int"),
            Type::Array(inner, size) => write!(f, "{}[{}]", inner, size),
            Type::Rune(inner) => write!(f, "#{}", inner),
            Type::Struct(name) | Type::Named(name) => write!(f, "{}", name),
        }
    }
}
