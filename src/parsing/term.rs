//! Term grammar for action lists
//!
//! Action text is parsed straight from substrings. A term is classified by
//! the first structural character found at depth zero, scanning left to
//! right:
//!
//! ```text
//!   name(args,...)            call, arguments parsed as an action list
//!   name:seg:seg              colon call, `a->b` segments flatten into two args
//!   set_field:V[/M]->FIELD    always three slots: value, mask or null, field
//!   label=value               value term carrying `label`
//!   FIELD[lo..hi]=value       `=` call with a range on the left
//!   FIELD[lo..hi] / FIELD[]   range reference
//!   anything else             literal leaf, passed through verbatim
//! ```
//!
//! Empty positions in any list (`resubmit(,11)`) become `None` slots so the
//! arity of the source is preserved.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::ast::{Slot, Term};
use crate::config::ParserOptions;
use crate::error::ParseError;
use crate::parsing::split::{
    check_balanced, first_top_level, matching_close, split_once_top_level, split_top_level,
};

static RANGE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\[([^\[\]]*)\]$").unwrap());

static CALL_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

static HEX_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]+$").unwrap());

const STRUCTURAL: &[u8] = b"([:=";

/// Parse a comma separated action list into slots.
pub fn parse_action_list(text: &str, options: &ParserOptions) -> Result<Vec<Slot>, ParseError> {
    check_balanced(text)?;
    Grammar::new(options).action_list(text, 0)
}

/// Parse a single action or argument.
pub fn parse_term(text: &str, options: &ParserOptions) -> Result<Term, ParseError> {
    check_balanced(text)?;
    Grammar::new(options)
        .slot(text, 0)?
        .ok_or(ParseError::EmptyInput)
}

struct Grammar {
    max_depth: usize,
}

impl Grammar {
    fn new(options: &ParserOptions) -> Self {
        Self {
            max_depth: options.max_depth,
        }
    }

    fn action_list(&self, text: &str, depth: usize) -> Result<Vec<Slot>, ParseError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        split_top_level(text, ",")?
            .into_iter()
            .map(|piece| self.slot(piece, depth))
            .collect()
    }

    fn slot(&self, text: &str, depth: usize) -> Result<Slot, ParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        self.term(text, depth).map(Some)
    }

    /// `text` is trimmed and non-empty
    fn term(&self, text: &str, depth: usize) -> Result<Term, ParseError> {
        if depth > self.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
            });
        }

        match first_top_level(text, STRUCTURAL)? {
            Some((open, b'(')) if open > 0 => {
                trace!(term = text, "call");
                self.call(text, open, depth)
            }
            Some((colon, b':')) if is_call_name(&text[..colon]) => {
                trace!(term = text, "colon call");
                self.colon_call(&text[..colon], &text[colon + 1..], depth)
            }
            Some((equal, b'=')) if equal > 0 => {
                trace!(term = text, "labeled value");
                let value = self.slot(&text[equal + 1..], depth + 1)?;
                let label = text[..equal].trim();
                Ok(value.unwrap_or_else(|| Term::leaf("")).with_label(label))
            }
            Some((_, b'[')) => self.bracketed(text, depth),
            _ => Ok(Term::leaf(text)),
        }
    }

    fn call(&self, text: &str, open: usize, depth: usize) -> Result<Term, ParseError> {
        let close = matching_close(text, open)?;
        if close + 1 < text.len() {
            return Err(ParseError::TrailingText {
                text: text.to_string(),
                trailing: text[close + 1..].to_string(),
            });
        }

        let name = text[..open].trim();
        let args = self.action_list(&text[open + 1..close], depth + 1)?;
        Ok(Term::call(name, args))
    }

    fn colon_call(&self, name: &str, rest: &str, depth: usize) -> Result<Term, ParseError> {
        if name == "set_field" {
            return self.set_field(rest, depth);
        }

        let mut args = Vec::new();
        for segment in split_top_level(rest, ":")? {
            match split_once_top_level(segment, "->")? {
                Some((source, destination)) => {
                    args.push(self.slot(source, depth + 1)?);
                    args.push(self.slot(destination, depth + 1)?);
                }
                None => args.push(self.slot(segment, depth + 1)?),
            }
        }

        Ok(Term::call(name, args))
    }

    /// `set_field:VALUE[/MASK]->FIELD`
    ///
    /// Value and mask are opaque: a MAC such as `11:22:33:44:55:66` must not
    /// be read as a colon call.
    fn set_field(&self, rest: &str, depth: usize) -> Result<Term, ParseError> {
        let (value, field) = match split_once_top_level(rest, "->")? {
            Some((value, field)) => (value, self.slot(field, depth + 1)?),
            None => (rest, None),
        };
        let (value, mask) = match value.split_once('/') {
            Some((value, mask)) => (value, leaf_slot(mask)),
            None => (value, None),
        };

        Ok(Term::call("set_field", vec![leaf_slot(value), mask, field]))
    }

    /// A term whose first structural character is `[`
    ///
    /// With a depth-zero `=`, a range on the left makes an assignment and
    /// anything else is a label.
    fn bracketed(&self, text: &str, depth: usize) -> Result<Term, ParseError> {
        if let Some((target, value)) = split_once_top_level(text, "=")? {
            let target = target.trim();
            let value = self.slot(value, depth + 1)?;
            return match range_ref(target)? {
                Some(range) => {
                    trace!(term = text, "field assignment");
                    Ok(Term::call("=", vec![Some(range), value]))
                }
                None => Ok(value.unwrap_or_else(|| Term::leaf("")).with_label(target)),
            };
        }

        match range_ref(text)? {
            Some(range) => Ok(range),
            None => Ok(Term::leaf(text)),
        }
    }
}

/// `FIELD[]` or `FIELD[lo..hi]`, `None` when `text` has another shape
fn range_ref(text: &str) -> Result<Option<Term>, ParseError> {
    let Some(captures) = RANGE_REF.captures(text) else {
        return Ok(None);
    };
    let field = &captures[1];
    let bounds = captures[2].trim();

    if bounds.is_empty() {
        return Ok(Some(Term::range(field, None)));
    }

    match split_top_level(bounds, "..")?.as_slice() {
        [lo, hi] if !lo.trim().is_empty() && !hi.trim().is_empty() => {
            Ok(Some(Term::range(field, Some((lo.trim(), hi.trim())))))
        }
        _ => Err(ParseError::MalformedRange(text.to_string())),
    }
}

/// Colon calls are named by identifiers. Pure hex prefixes are address
/// literals (`fa:16:3e:00:00:01`, `fe80::1`), not calls.
fn is_call_name(prefix: &str) -> bool {
    CALL_NAME.is_match(prefix) && !HEX_DIGITS.is_match(prefix)
}

fn leaf_slot(text: &str) -> Slot {
    let text = text.trim();
    (!text.is_empty()).then(|| Term::leaf(text))
}
