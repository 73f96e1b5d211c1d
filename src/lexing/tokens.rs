//! Token definitions for dump lines
//!
//! Tokens are produced by the logos derive macro. A value token is the
//! maximal run of characters that are neither whitespace, `=` nor `,`.
//! The end of a line is the end of the token stream (`Scanner::scan`
//! returns `None`).
use logos::Logos;

/// All tokens a dump line can produce
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token<'a> {
    #[regex(r"\s+")]
    Whitespace,

    // Generic value (catch-all for everything that isn't a delimiter)
    #[regex(r"[^\s=,]+", |lex| lex.slice())]
    Value(&'a str),

    #[token("=")]
    Equal,

    #[token(",")]
    Comma,
}

impl<'a> Token<'a> {
    /// Both `,` and whitespace terminate a header field
    pub fn is_separator(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Comma)
    }

    /// The raw text of a value token
    pub fn value(&self) -> Option<&'a str> {
        match *self {
            Token::Value(text) => Some(text),
            _ => None,
        }
    }
}
