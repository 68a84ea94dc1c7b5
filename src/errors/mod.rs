//! Error types and error handling for the compiler.
//!
//! This module defines the diagnostics used throughout the front end. It
//! includes:
//!
//! - The `Diagnostic` structure carrying an optional source position
//! - Specific diagnostic kinds for every compilation phase
//! - The six failure categories the kinds map onto
//! - The fixed `opalc: panic:` report format

pub mod errors;

#[cfg(test)]
mod tests;
