//! Property-based tests for the scanner and the line parsers
//!
//! These check structural guarantees over generated input: the scanner loses
//! no bytes, header fields keep their order, and no input makes a parser
//! panic.

use ofjson::lexing::tokenize;
use ofjson::parsing::is_meta_key;
use ofjson::{parse_group, parse_rule, Field};
use proptest::prelude::*;

const PROMOTED: &[&str] = &["cookie", "table", "priority", "actions"];

fn filter_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
        .prop_filter("promoted and meta keys are not filters", |key| {
            !PROMOTED.contains(&key.as_str()) && !is_meta_key(key)
        })
}

fn filter_value() -> impl Strategy<Value = String> {
    "[a-z0-9:.+/-]{0,12}"
}

proptest! {
    #[test]
    fn scanner_slices_rebuild_input(line in "[ -~\t]{0,120}") {
        let tokens = tokenize(&line).unwrap();
        let rebuilt: String = tokens.iter().map(|(_, span)| &line[span.clone()]).collect();
        prop_assert_eq!(rebuilt, line);
    }

    #[test]
    fn filters_keep_source_order(
        fields in prop::collection::vec((filter_key(), filter_value()), 1..8),
        separator in prop::sample::select(vec![",", " ", ", "]),
    ) {
        let header: Vec<String> = fields
            .iter()
            .map(|(key, value)| {
                if value.is_empty() {
                    key.clone()
                } else {
                    format!("{key}={value}")
                }
            })
            .collect();
        let line = format!(" cookie=0x1, priority=5,{} actions=drop", header.join(separator));

        let rule = parse_rule(&line).unwrap();
        let expected: Vec<Field> = fields
            .iter()
            .map(|(key, value)| Field::new(key.as_str(), value.as_str()))
            .collect();
        prop_assert_eq!(rule.filters, expected);
        prop_assert_eq!(rule.cookie, 1);
        prop_assert_eq!(rule.priority, 5);
    }

    #[test]
    fn rule_parser_never_panics(line in "\\PC{0,160}") {
        let _ = parse_rule(&line);
    }

    #[test]
    fn group_parser_never_panics(line in "\\PC{0,160}") {
        let _ = parse_group(&line);
    }

    #[test]
    fn action_soup_never_panics(actions in "[a-z0-9_:,()\\[\\]=>./-]{0,80}") {
        let _ = parse_rule(&format!("priority=1 actions={actions}"));
    }
}
