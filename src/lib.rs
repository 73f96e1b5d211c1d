//! # ofjson
//!
//! Compiles the human readable output of `ovs-ofctl dump-flows` and
//! `ovs-ofctl dump-groups` into a canonical, compact JSON document.
//!
//! The pipeline is strictly forward:
//!
//! ```text
//!   line --> lexing (Scanner) --> parsing::header / parsing::group
//!                                       |  raw action text
//!                                       v
//!                               parsing::term --> ast --> formats::json
//! ```
//!
//! One line in, one document out. Nothing is shared between calls besides
//! the read-only meta key table, so lines can be parsed from any number of
//! threads without coordination.
//!
//! ```text
//! let json = ofjson::rule_to_json(
//!     " cookie=0x0, duration=1.1s, table=0, n_packets=0, n_bytes=0, priority=0 actions=NORMAL",
//! )?;
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod parsing;

pub use ast::{Bucket, Field, Group, Rule, Slot, Term, TermKind};
pub use config::{OfJsonConfig, ParserOptions};
pub use error::{HeaderError, ParseError};

/// Parse one `dump-flows` line into a [`Rule`].
pub fn parse_rule(line: &str) -> Result<Rule, ParseError> {
    parse_rule_with_options(line, &ParserOptions::default())
}

/// Parse one `dump-flows` line with explicit parser options.
pub fn parse_rule_with_options(line: &str, options: &ParserOptions) -> Result<Rule, ParseError> {
    parsing::header::parse_rule(line, options)
}

/// Parse one `dump-groups` line into a [`Group`].
pub fn parse_group(line: &str) -> Result<Group, ParseError> {
    parse_group_with_options(line, &ParserOptions::default())
}

/// Parse one `dump-groups` line with explicit parser options.
pub fn parse_group_with_options(line: &str, options: &ParserOptions) -> Result<Group, ParseError> {
    parsing::group::parse_group(line, options)
}

/// Parse a flow line and render it as canonical JSON.
pub fn rule_to_json(line: &str) -> Result<String, ParseError> {
    formats::json::to_string(&parse_rule(line)?)
}

/// Parse a group line and render it as canonical JSON.
pub fn group_to_json(line: &str) -> Result<String, ParseError> {
    formats::json::to_string(&parse_group(line)?)
}
