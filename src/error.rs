//! Error types for flow and group parsing
//!
//! Every failure is local to the line being parsed. There is no partial
//! result: a malformed line yields exactly one of these and no document.

use thiserror::Error;

/// Errors raised while compiling a dump line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The scanner met input it could not classify.
    #[error("unrecognized input at byte {offset}")]
    Scan { offset: usize },

    #[error(transparent)]
    Header(#[from] HeaderError),

    /// An opened `(` or `[` was never closed, or a close had no opener.
    #[error("unbalanced delimiter at byte {offset} in `{text}`")]
    UnbalancedDelimiter { text: String, offset: usize },

    /// Range content present but not of the form `lo..hi`.
    #[error("malformed range `{0}`, expected `field[lo..hi]`")]
    MalformedRange(String),

    /// Text follows the `)` that closes a call, as in `output(1)x`.
    #[error("unexpected `{trailing}` after call in `{text}`")]
    TrailingText { text: String, trailing: String },

    #[error("empty input")]
    EmptyInput,

    /// Action nesting exceeded the configured limit.
    #[error("actions nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    /// The parsed tree could not be rendered.
    #[error("failed to render JSON: {0}")]
    Render(String),
}

/// Errors in the header part of a line (everything before the actions).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("no `actions=` field found")]
    MissingActions,

    #[error("required field `{0}` not found")]
    MissingField(&'static str),

    #[error("invalid number `{value}` for `{key}`")]
    InvalidNumber { key: String, value: String },
}

impl HeaderError {
    pub(crate) fn invalid_number(key: &str, value: &str) -> Self {
        HeaderError::InvalidNumber {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}
