//! Utility macros for the compiler.
//!
//! This module defines helper macros used by the lexer:
//!
//! - `MK_PUNCT_HANDLER!` - Creates a handler for a fixed punctuation or
//!   operator token
//!
//! These macros reduce boilerplate in the lexer's rule table.

/// Creates a lexer handler for a fixed punctuation or operator token.
///
/// Generates a handler that turns the matched text into a token of the
/// given kind and advances the cursor past it.
///
/// # Example
///
/// ```ignore
/// rule(r"^->", MK_PUNCT_HANDLER!(TokenKind::Arrow))
/// ```
#[macro_export]
macro_rules! MK_PUNCT_HANDLER {
    ($kind:expr) => {
        |lexer: &mut Lexer, text: &str| Ok(Some(lexer.make_token($kind, text, text, None)))
    };
}
