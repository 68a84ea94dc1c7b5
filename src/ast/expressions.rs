use crate::{lexer::tokens::TokenKind, Span};

/// Binary operators, compound assignment included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Add,
    Sub,
    Shl,
    Shr,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Eq,
    NotEq,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Xor,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        match kind {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::ShiftLeft => Some(BinaryOp::Shl),
            TokenKind::ShiftRight => Some(BinaryOp::Shr),
            TokenKind::Less => Some(BinaryOp::Less),
            TokenKind::LessEquals => Some(BinaryOp::LessEq),
            TokenKind::Greater => Some(BinaryOp::Greater),
            TokenKind::GreaterEquals => Some(BinaryOp::GreaterEq),
            TokenKind::Equals => Some(BinaryOp::Eq),
            TokenKind::NotEquals => Some(BinaryOp::NotEq),
            TokenKind::Ampersand => Some(BinaryOp::BitAnd),
            TokenKind::Pipe => Some(BinaryOp::BitOr),
            TokenKind::Caret => Some(BinaryOp::BitXor),
            TokenKind::AndAnd => Some(BinaryOp::And),
            TokenKind::OrOr => Some(BinaryOp::Or),
            TokenKind::XorXor => Some(BinaryOp::Xor),
            TokenKind::Assign => Some(BinaryOp::Assign),
            TokenKind::PlusAssign => Some(BinaryOp::AddAssign),
            TokenKind::MinusAssign => Some(BinaryOp::SubAssign),
            TokenKind::StarAssign => Some(BinaryOp::MulAssign),
            TokenKind::SlashAssign => Some(BinaryOp::DivAssign),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Less => "<",
            BinaryOp::LessEq => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Xor => "^^",
            BinaryOp::Assign => "=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubAssign => "-=",
            BinaryOp::MulAssign => "*=",
            BinaryOp::DivAssign => "/=",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Add | BinaryOp::Sub
        )
    }

    pub fn is_bitwise(&self) -> bool {
        matches!(
            self,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Less | BinaryOp::LessEq | BinaryOp::Greater | BinaryOp::GreaterEq
        )
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::NotEq)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Xor)
    }

    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            BinaryOp::Assign
                | BinaryOp::AddAssign
                | BinaryOp::SubAssign
                | BinaryOp::MulAssign
                | BinaryOp::DivAssign
        )
    }
}

/// Prefix operators: logical not, rune dereference, rune-of, and the
/// range marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Deref,
    RuneOf,
    Range,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Deref => "#",
            UnaryOp::RuneOf => "@",
            UnaryOp::Range => "..",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

impl PostfixOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            PostfixOp::Increment => "++",
            PostfixOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Null(Span),
    Bool(bool, Span),
    Integer(i64, Span),
    Float(f64, Span),
    Char(char, Span),
    Byte(u8, Span),
    Str(String, Span),
    ByteStr(Vec<u8>, Span),
    Name(String, Span),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Postfix(PostfixExpr),
    Call(CallExpr),
    Member(MemberExpr),
    MethodCall(MethodCallExpr),
    StructInit(StructInitExpr),
    Index(IndexExpr),
}

impl Expr {
    pub fn span(&self) -> &Span {
        match self {
            Expr::Null(span)
            | Expr::Bool(_, span)
            | Expr::Integer(_, span)
            | Expr::Float(_, span)
            | Expr::Char(_, span)
            | Expr::Byte(_, span)
            | Expr::Str(_, span)
            | Expr::ByteStr(_, span)
            | Expr::Name(_, span) => span,
            Expr::Binary(inner) => &inner.span,
            Expr::Unary(inner) => &inner.span,
            Expr::Postfix(inner) => &inner.span,
            Expr::Call(inner) => &inner.span,
            Expr::Member(inner) => &inner.span,
            Expr::MethodCall(inner) => &inner.span,
            Expr::StructInit(inner) => &inner.span,
            Expr::Index(inner) => &inner.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct PostfixExpr {
    pub op: PostfixOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// A direct call of a named function.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub member: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MethodCallExpr {
    pub object: Box<Expr>,
    pub method: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// `new Name { field: value, ... }`
#[derive(Debug, Clone)]
pub struct StructInitExpr {
    pub name: String,
    pub fields: Vec<(String, Expr)>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IndexExpr {
    pub object: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}
