#![allow(clippy::module_inception)]

use std::{fmt::Display, fs, path::Path, rc::Rc};

use log::debug;

use crate::{
    analyzer::analyzer::analyze,
    ast::ast::Crate,
    errors::errors::{Diagnostic, DiagnosticKind},
    parser::parser::parse_package,
    scope::scope::ScopeTree,
};

pub mod analyzer;
pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod scope;

/// Name the tool reports itself as in diagnostics.
pub const TOOL_NAME: &str = "opalc";

/// A location in a source file, tracked as the humans read it: the file
/// name plus a one-based line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub file: Rc<String>,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn start(file: Rc<String>) -> Self {
        Position {
            file,
            line: 1,
            column: 1,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Front-end entry point: reads every input file, parses one package per
/// file (the package name is the file stem), and validates the assembled
/// crate. The backend only ever sees the `Ok` result; the first diagnostic
/// aborts the whole run.
pub fn compile<P: AsRef<Path>>(files: &[P]) -> Result<Crate, Diagnostic> {
    debug!("compiling {} file(s)", files.len());

    let mut scopes = ScopeTree::new();
    let mut packages = Vec::new();

    for file in files {
        let path = file.as_ref();
        let source = fs::read_to_string(path).map_err(|err| {
            Diagnostic::unlocated(DiagnosticKind::UnreadableFile {
                file: path.display().to_string(),
                reason: err.to_string(),
            })
        })?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("main")
            .to_string();

        debug!("parsing package `{}` from {}", name, path.display());
        packages.push(parse_package(
            &source,
            name,
            path.display().to_string(),
            &mut scopes,
        )?);
    }

    let mut krate = Crate { packages, scopes };
    analyze(&mut krate)?;

    Ok(krate)
}

/// In-memory variant of [`compile`]: each entry is a `(package name,
/// source text)` pair, with the file name derived as `<name>.opal`.
pub fn compile_sources(sources: &[(&str, &str)]) -> Result<Crate, Diagnostic> {
    let mut scopes = ScopeTree::new();
    let mut packages = Vec::new();

    for (name, source) in sources {
        let file = format!("{}.opal", name);
        debug!("parsing package `{}`", name);
        packages.push(parse_package(source, name.to_string(), file, &mut scopes)?);
    }

    let mut krate = Crate { packages, scopes };
    analyze(&mut krate)?;

    Ok(krate)
}
