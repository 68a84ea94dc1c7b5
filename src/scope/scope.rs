use std::collections::HashMap;

use crate::{
    ast::types::Type,
    errors::errors::{Diagnostic, DiagnosticKind},
    Span,
};

/// Stable handle to a scope in the crate-wide scope tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// The construct a scope belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Package,
    Function,
    Struct,
    Loop,
    Conditional,
    Block,
}

impl ScopeKind {
    pub fn is_package(self) -> bool {
        self == ScopeKind::Package
    }

    pub fn is_function(self) -> bool {
        self == ScopeKind::Function
    }

    pub fn is_struct(self) -> bool {
        self == ScopeKind::Struct
    }

    pub fn is_loop(self) -> bool {
        self == ScopeKind::Loop
    }

    pub fn is_conditional(self) -> bool {
        self == ScopeKind::Conditional
    }

    pub fn is_block(self) -> bool {
        self == ScopeKind::Block
    }
}

/// A function's shape as recorded in the symbol table, used for call
/// checking and trait conformance.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSig {
    pub name: String,
    pub params: Vec<(String, Type)>,
    pub return_type: Type,
}

#[derive(Debug, Clone)]
pub enum SymbolKind {
    Function(FunctionSig),
    Parameter { ty: Type },
    /// `scope` is the struct's own scope, re-entered while parsing impl
    /// blocks and consulted for member lookup.
    Struct {
        fields: Vec<(String, Type)>,
        scope: ScopeId,
    },
    Field { ty: Type },
    Trait { methods: Vec<FunctionSig> },
    Enum { variants: Vec<String> },
    Variable { ty: Type },
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub span: Span,
}

#[derive(Debug)]
struct Scope {
    parent: Option<ScopeId>,
    kind: ScopeKind,
    symbols: HashMap<String, Symbol>,
}

/// Arena of scopes for one compilation run. Each package roots its own
/// subtree; handles stay valid for the lifetime of the tree.
#[derive(Debug, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub fn new() -> Self {
        ScopeTree { scopes: Vec::new() }
    }

    /// Creates a new scope under `parent` and returns its handle.
    pub fn push_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent,
            kind,
            symbols: HashMap::new(),
        });
        id
    }

    pub fn kind(&self, id: ScopeId) -> ScopeKind {
        self.scopes[id.0].kind
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes[id.0].parent
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Registers `symbol` in `scope`. A second declaration of the same
    /// name in one scope is rejected.
    pub fn declare(&mut self, scope: ScopeId, symbol: Symbol) -> Result<(), Diagnostic> {
        let entry = &mut self.scopes[scope.0];
        if entry.symbols.contains_key(&symbol.name) {
            return Err(Diagnostic::new(
                DiagnosticKind::DuplicateDeclaration {
                    name: symbol.name.clone(),
                },
                symbol.span.start.clone(),
            ));
        }
        entry.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Walks from `scope` to the root and returns the first symbol named
    /// `name`; inner declarations shadow outer ones.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            if let Some(symbol) = self.scopes[id.0].symbols.get(name) {
                return Some(symbol);
            }
            cursor = self.scopes[id.0].parent;
        }
        None
    }

    /// Looks `name` up in `scope` alone, ignoring ancestors.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.scopes[scope.0].symbols.get(name)
    }

    /// Nearest enclosing function scope, `scope` itself included. `None`
    /// signals a scoping error at the caller.
    pub fn enclosing_function(&self, scope: ScopeId) -> Option<ScopeId> {
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            if self.scopes[id.0].kind.is_function() {
                return Some(id);
            }
            cursor = self.scopes[id.0].parent;
        }
        None
    }
}
