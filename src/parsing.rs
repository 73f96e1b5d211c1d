//! Parsing of dump lines into the [`crate::ast`] tree
//!
//! - `header`: flow lines, and the field reader shared with groups
//! - `group`: group lines, one action list per bucket
//! - `term`: the recursive action grammar
//! - `split`: depth-aware delimiter splitting used by all of the above

pub mod group;
pub mod header;
pub mod split;
pub mod term;

pub use group::parse_group;
pub use header::{is_meta_key, parse_rule};
pub use term::{parse_action_list, parse_term};
