//! Header parsing for `dump-flows` lines
//!
//! A flow line is a run of `key=value` or bare `key` fields separated by
//! commas or whitespace, terminated by `actions=`. Everything after that
//! `=` is handed to the term grammar untokenized.
//!
//! ```text
//!  cookie=0x0, duration=1.1s, table=0, n_packets=0, priority=10,ip,in_port=1 actions=output:2
//!  |_______|   |_____________________________|      |________| |__________| |_____________|
//!  promoted    meta                                  promoted   filters      raw action text
//! ```

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::debug;

use crate::ast::{Field, Rule};
use crate::config::ParserOptions;
use crate::error::{HeaderError, ParseError};
use crate::lexing::{Scanner, Token};
use crate::parsing::term::parse_action_list;

/// Flow accounting and flag keys. Any other key that isn't promoted is a
/// match field.
static META_KEYS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "duration",
        "n_packets",
        "n_bytes",
        "idle_age",
        "hard_age",
        "idle_timeout",
        "hard_timeout",
        "importance",
        "reset_counts",
        "send_flow_rem",
        "check_overlap",
        "no_packet_counts",
        "no_byte_counts",
    ]
    .into_iter()
    .collect()
});

pub fn is_meta_key(key: &str) -> bool {
    META_KEYS.contains(key)
}

/// Parse one flow line.
pub fn parse_rule(line: &str, options: &ParserOptions) -> Result<Rule, ParseError> {
    if line.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut reader = FieldReader::new(line, &["actions"]);
    let mut rule = Rule::default();

    while let Some(item) = reader.next_item()? {
        match item {
            HeaderItem::Field(field) => classify(&mut rule, field)?,
            HeaderItem::Marker(_) => {
                let text = reader.take_rest();
                debug!(
                    meta = rule.meta.len(),
                    filters = rule.filters.len(),
                    actions = text,
                    "flow header parsed"
                );
                rule.actions = parse_action_list(text, options)?;
                return Ok(rule);
            }
        }
    }

    Err(HeaderError::MissingActions.into())
}

fn classify(rule: &mut Rule, field: RawField<'_>) -> Result<(), HeaderError> {
    match field.key {
        "cookie" => rule.cookie = parse_hex(field.key, field.value)?,
        "table" => rule.table = parse_decimal(field.key, field.value)?,
        "priority" => rule.priority = parse_decimal(field.key, field.value)?,
        key if is_meta_key(key) => rule.meta.push(field.into()),
        _ => rule.filters.push(field.into()),
    }
    Ok(())
}

/// `0x`-prefixed (or bare) hexadecimal
pub(crate) fn parse_hex(key: &str, value: &str) -> Result<u64, HeaderError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(HeaderError::invalid_number(key, value));
    }
    u64::from_str_radix(digits, 16).map_err(|_| HeaderError::invalid_number(key, value))
}

pub(crate) fn parse_decimal<T: FromStr>(key: &str, value: &str) -> Result<T, HeaderError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HeaderError::invalid_number(key, value));
    }
    value
        .parse()
        .map_err(|_| HeaderError::invalid_number(key, value))
}

/// One header field as written. `value` is empty for bare tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawField<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl From<RawField<'_>> for Field {
    fn from(raw: RawField<'_>) -> Self {
        Field::new(raw.key, raw.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderItem<'a> {
    Field(RawField<'a>),
    /// `key=` for a section key such as `actions`; the text after the `=`
    /// has not been tokenized.
    Marker(&'a str),
}

/// Assembles header fields from the token stream.
///
/// Separators inside `(...)`/`[...]` don't end a field, so composite
/// tokens like `fields(eth_src,eth_dst)` come back whole.
pub(crate) struct FieldReader<'a> {
    scanner: Scanner<'a>,
    markers: &'static [&'static str],
}

impl<'a> FieldReader<'a> {
    pub fn new(source: &'a str, markers: &'static [&'static str]) -> Self {
        Self {
            scanner: Scanner::new(source),
            markers,
        }
    }

    pub fn next_item(&mut self) -> Result<Option<HeaderItem<'a>>, ParseError> {
        let source = self.scanner.source();
        let mut start: Option<usize> = None;
        let mut equal: Option<usize> = None;
        let mut end = 0;
        let mut depth: i64 = 0;

        while let Some(token) = self.scanner.scan()? {
            let span = self.scanner.span();

            if depth == 0 {
                match token {
                    _ if token.is_separator() && start.is_none() => continue,
                    _ if token.is_separator() => break,
                    Token::Equal if equal.is_none() => {
                        if let Some(start) = start {
                            let key = &source[start..span.start];
                            if self.markers.iter().any(|marker| *marker == key) {
                                return Ok(Some(HeaderItem::Marker(key)));
                            }
                        }
                        equal = Some(span.start);
                    }
                    _ => {}
                }
            }

            if let Some(text) = token.value() {
                depth += bracket_delta(text);
                if depth < 0 {
                    return Err(ParseError::UnbalancedDelimiter {
                        text: source.to_string(),
                        offset: span.start,
                    });
                }
            }

            start.get_or_insert(span.start);
            end = span.end;
        }

        let Some(start) = start else {
            return Ok(None);
        };
        if depth > 0 {
            return Err(ParseError::UnbalancedDelimiter {
                text: source.to_string(),
                offset: start,
            });
        }

        let field = match equal {
            Some(equal) => RawField {
                key: &source[start..equal],
                value: &source[equal + 1..end],
            },
            None => RawField {
                key: &source[start..end],
                value: "",
            },
        };
        Ok(Some(HeaderItem::Field(field)))
    }

    /// Untokenized input after the last item
    pub fn remainder(&self) -> &'a str {
        self.scanner.remainder()
    }

    /// Consume `len` bytes of the remainder as raw text
    pub fn take_raw(&mut self, len: usize) -> &'a str {
        let rest = self.scanner.remainder();
        self.scanner.skip(len);
        &rest[..len]
    }

    pub fn take_rest(&mut self) -> &'a str {
        let len = self.remainder().len();
        self.take_raw(len)
    }
}

fn bracket_delta(text: &str) -> i64 {
    text.bytes()
        .map(|b| match b {
            b'(' | b'[' => 1,
            b')' | b']' => -1,
            _ => 0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Term;

    fn rule(line: &str) -> Rule {
        parse_rule(line, &ParserOptions::default()).unwrap()
    }

    #[test]
    fn test_promoted_fields() {
        let parsed = rule(" cookie=0xd, table=21, priority=100 actions=drop");
        assert_eq!(parsed.cookie, 13);
        assert_eq!(parsed.table, 21);
        assert_eq!(parsed.priority, 100);
        assert!(parsed.meta.is_empty());
        assert!(parsed.filters.is_empty());
        assert_eq!(parsed.actions, vec![Some(Term::leaf("drop"))]);
    }

    #[test]
    fn test_defaults_when_absent() {
        let parsed = rule("actions=NORMAL");
        assert_eq!(parsed.cookie, 0);
        assert_eq!(parsed.table, 0);
        assert_eq!(parsed.priority, 0);
    }

    #[test]
    fn test_classification_keeps_order() {
        let parsed = rule(
            " cookie=0x0, duration=0.007s, n_packets=0, idle_timeout=10, reset_counts in_port=2,dl_src=00:44:55:66:77:88 actions=drop",
        );
        assert_eq!(
            parsed.meta,
            vec![
                Field::new("duration", "0.007s"),
                Field::new("n_packets", "0"),
                Field::new("idle_timeout", "10"),
                Field::flag("reset_counts"),
            ]
        );
        assert_eq!(
            parsed.filters,
            vec![
                Field::new("in_port", "2"),
                Field::new("dl_src", "00:44:55:66:77:88"),
            ]
        );
    }

    #[test]
    fn test_bare_filter_has_empty_value() {
        let parsed = rule("priority=1,ip,ct_state=+new-rel actions=drop");
        assert_eq!(
            parsed.filters,
            vec![Field::flag("ip"), Field::new("ct_state", "+new-rel")]
        );
    }

    #[test]
    fn test_action_text_is_not_tokenized() {
        let parsed = rule("actions=resubmit(,11)");
        assert_eq!(
            parsed.actions,
            vec![Some(Term::call(
                "resubmit",
                vec![None, Some(Term::leaf("11"))]
            ))]
        );
    }

    #[test]
    fn test_missing_actions() {
        let err = parse_rule(" cookie=0x0, priority=1", &ParserOptions::default()).unwrap_err();
        assert_eq!(err, ParseError::Header(HeaderError::MissingActions));
    }

    #[test]
    fn test_invalid_numbers() {
        for line in [
            "cookie=0xzz actions=drop",
            "cookie= actions=drop",
            "table=t1 actions=drop",
            "priority=+5 actions=drop",
            "priority=99999999999 actions=drop",
        ] {
            let err = parse_rule(line, &ParserOptions::default()).unwrap_err();
            assert!(
                matches!(err, ParseError::Header(HeaderError::InvalidNumber { .. })),
                "{line}: {err:?}"
            );
        }
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(
            parse_rule("   ", &ParserOptions::default()),
            Err(ParseError::EmptyInput)
        );
    }

    #[test]
    fn test_field_reader_keeps_composite_tokens() {
        let mut reader = FieldReader::new("fields(eth_src,eth_dst),weight:2 x", &[]);
        let mut keys = Vec::new();
        while let Some(HeaderItem::Field(field)) = reader.next_item().unwrap() {
            keys.push(field.key);
        }
        assert_eq!(keys, vec!["fields(eth_src,eth_dst)", "weight:2", "x"]);
    }

    #[test]
    fn test_field_reader_stops_at_marker() {
        let mut reader = FieldReader::new("a=1,actions=output:1,b", &["actions"]);
        assert_eq!(
            reader.next_item().unwrap(),
            Some(HeaderItem::Field(RawField { key: "a", value: "1" }))
        );
        assert_eq!(reader.next_item().unwrap(), Some(HeaderItem::Marker("actions")));
        assert_eq!(reader.remainder(), "output:1,b");
    }

    #[test]
    fn test_meta_key_table() {
        assert!(is_meta_key("n_bytes"));
        assert!(is_meta_key("idle_age"));
        assert!(!is_meta_key("in_port"));
        assert!(!is_meta_key("priority"));
    }
}
