use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// The failure categories of the front end. Every concrete diagnostic kind
/// maps to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    LexError,
    ParseError,
    ScopeError,
    TypeError,
    ControlFlowError,
    ConformanceError,
}

/// A fatal diagnostic. The first one raised terminates the compilation
/// run; there is no batching and no recovery.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    position: Option<Position>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, position: Position) -> Self {
        Diagnostic {
            kind,
            position: Some(position),
        }
    }

    /// A diagnostic with no source location, such as a crate-wide check.
    pub fn unlocated(kind: DiagnosticKind) -> Self {
        Diagnostic {
            kind,
            position: None,
        }
    }

    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: panic: {}", crate::TOOL_NAME, self.kind)?;
        if let Some(position) = &self.position {
            write!(f, "\nsee: {}", position)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

#[derive(Error, Debug, Clone)]
pub enum DiagnosticKind {
    #[error("unrecognised character `{text}`")]
    UnrecognisedCharacter { text: String },
    #[error("malformed character literal {text:?}")]
    MalformedCharLiteral { text: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("cannot read {file}: {reason}")]
    UnreadableFile { file: String, reason: String },

    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("trait method {name:?} must not have a body")]
    TraitMethodBody { name: String },

    #[error("duplicate declaration of {name:?} in this scope")]
    DuplicateDeclaration { name: String },
    #[error("unknown identifier {name:?}")]
    UnknownIdentifier { name: String },
    #[error("duplicate package {name:?}")]
    DuplicatePackage { name: String },
    #[error("import of unknown package {name:?}")]
    UnresolvedImport { name: String },
    #[error("duplicate import of package {name:?}")]
    DuplicateImport { name: String },

    #[error("unknown type {name:?}")]
    UnknownType { name: String },
    #[error("{name:?} is not a struct")]
    NotAStruct { name: String },
    #[error("{name:?} is not a value")]
    NotAValue { name: String },
    #[error("{name:?} is not callable")]
    NotCallable { name: String },
    #[error("type {received} cannot be indexed")]
    NotIndexable { received: String },
    #[error("no member {member:?} on type {type_name}")]
    UnknownMember { type_name: String, member: String },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("field types do not match: expected {expected}, received {received}")]
    FieldTypeMismatch { expected: String, received: String },
    #[error("argument types do not match: expected {expected}, received {received}")]
    ArgumentTypeMismatch { expected: String, received: String },
    #[error("unexpected arguments: expected {expected}, received {received}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("missing arguments: expected {expected}, received {received}")]
    MissingArguments { expected: usize, received: usize },
    #[error("operator `{operator}` cannot be applied to type {received}")]
    InvalidOperand { operator: String, received: String },
    #[error("condition must be a boolean, received {received}")]
    NonBooleanCondition { received: String },
    #[error("type {received} cannot be matched on")]
    UnmatchableScrutinee { received: String },
    #[error("match on a non-boolean value requires a `_` case")]
    MissingMatchDefault,
    #[error("match must cover the value `{value}`")]
    MissingMatchCase { value: String },
    #[error("duplicate match case for `{value}`")]
    DuplicateMatchCase { value: String },

    #[error("`break` outside of a loop")]
    BreakOutsideLoop,
    #[error("`continue` outside of a loop")]
    ContinueOutsideLoop,
    #[error("`return` outside of a function")]
    ReturnOutsideFunction,
    #[error("return types do not match: expected {expected}, received {received}")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("no function named `main` taking no parameters and returning nothing")]
    MissingEntryPoint,
    #[error("more than one function named `main`")]
    DuplicateEntryPoint,
    #[error("`main` must take no parameters and return nothing")]
    InvalidEntryPoint,

    #[error("{name:?} is not a trait")]
    NotATrait { name: String },
    #[error("unknown trait {name:?}")]
    UnknownTrait { name: String },
    #[error("implementation of trait {trait_name:?} is missing method {method:?}")]
    MissingTraitMethod { trait_name: String, method: String },
    #[error("method {method:?} does not match its declaration in trait {trait_name:?}")]
    TraitMethodSignatureMismatch { trait_name: String, method: String },
}

impl DiagnosticKind {
    pub fn category(&self) -> Category {
        use DiagnosticKind::*;

        match self {
            UnrecognisedCharacter { .. }
            | MalformedCharLiteral { .. }
            | UnterminatedString
            | UnterminatedBlockComment
            | UnreadableFile { .. } => Category::LexError,

            UnexpectedToken { .. } | NumberParseError { .. } | TraitMethodBody { .. } => {
                Category::ParseError
            }

            DuplicateDeclaration { .. }
            | UnknownIdentifier { .. }
            | DuplicatePackage { .. }
            | UnresolvedImport { .. }
            | DuplicateImport { .. } => Category::ScopeError,

            UnknownType { .. }
            | NotAStruct { .. }
            | NotAValue { .. }
            | NotCallable { .. }
            | NotIndexable { .. }
            | UnknownMember { .. }
            | TypeMismatch { .. }
            | FieldTypeMismatch { .. }
            | ArgumentTypeMismatch { .. }
            | UnexpectedArguments { .. }
            | MissingArguments { .. }
            | InvalidOperand { .. }
            | NonBooleanCondition { .. }
            | UnmatchableScrutinee { .. }
            | MissingMatchDefault
            | MissingMatchCase { .. }
            | DuplicateMatchCase { .. } => Category::TypeError,

            BreakOutsideLoop
            | ContinueOutsideLoop
            | ReturnOutsideFunction
            | ReturnTypeMismatch { .. }
            | MissingEntryPoint
            | DuplicateEntryPoint
            | InvalidEntryPoint => Category::ControlFlowError,

            NotATrait { .. }
            | UnknownTrait { .. }
            | MissingTraitMethod { .. }
            | TraitMethodSignatureMismatch { .. } => Category::ConformanceError,
        }
    }
}
