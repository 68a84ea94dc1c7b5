//! Semantic analysis module.
//!
//! This module performs the whole-crate validation pass that runs once
//! parsing has completed. It walks the AST depth-first while:
//!
//! - Resolving named-type placeholders against the scope tree, mutating
//!   them in place (idempotently)
//! - Enforcing the crate invariants: unique package names, valid and
//!   duplicate-free import lists, exactly one `main`
//! - Typing every expression and checking declarations, conditions,
//!   match coverage, returns and loop control against the results
//! - Checking impl blocks against the traits they claim
//!
//! The walk carries its context (current scope, ambient return type,
//! inside-loop flag) in one value rather than globals; it never
//! allocates or deletes AST nodes.

pub mod analyzer;
pub mod expr;
