//! Lexical scanning for dump lines
//!
//! The scanner is deliberately coarse. It only separates whitespace runs, the
//! `=` and `,` delimiters, and everything else. Parentheses, brackets,
//! colons, slashes and arrows stay inside value tokens and are interpreted
//! later by the term grammar, which works on raw substrings.
//!
//! Whitespace is reported rather than skipped because the header grammar
//! accepts both `,` and a plain space as field separators.

pub mod scanner;
pub mod tokens;

pub use scanner::{tokenize, Scanner};
pub use tokens::Token;
