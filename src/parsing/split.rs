//! Depth-aware splitting on delimiters
//!
//! Everything in the action grammar is split the same way: on a delimiter
//! that sits outside any `(...)` or `[...]`. This module is that single
//! primitive, shared by the action list splitter, the colon segment
//! splitter, the arrow splitter and the range bounds splitter.
//!
//! All delimiters are ASCII, so walking bytes never lands inside a
//! multi-byte character and every reported index is a valid slice boundary.

use crate::error::ParseError;

/// Walk `text`, calling `visit(index, byte, depth)` for every byte.
///
/// `depth` is the nesting level outside the byte: an opener and its closer
/// both report the level they open from. Walking stops early when `visit`
/// returns `true`; otherwise the whole text is checked for balance.
fn walk(text: &str, mut visit: impl FnMut(usize, u8, usize) -> bool) -> Result<(), ParseError> {
    let mut open: Vec<(u8, usize)> = Vec::new();

    for (index, &byte) in text.as_bytes().iter().enumerate() {
        match byte {
            b'(' | b'[' => {
                if visit(index, byte, open.len()) {
                    return Ok(());
                }
                let closer = if byte == b'(' { b')' } else { b']' };
                open.push((closer, index));
            }
            b')' | b']' => match open.pop() {
                Some((closer, _)) if closer == byte => {
                    if visit(index, byte, open.len()) {
                        return Ok(());
                    }
                }
                _ => return Err(unbalanced(text, index)),
            },
            _ => {
                if visit(index, byte, open.len()) {
                    return Ok(());
                }
            }
        }
    }

    match open.first() {
        Some(&(_, index)) => Err(unbalanced(text, index)),
        None => Ok(()),
    }
}

fn unbalanced(text: &str, offset: usize) -> ParseError {
    ParseError::UnbalancedDelimiter {
        text: text.to_string(),
        offset,
    }
}

/// Start offsets of every non-overlapping depth-zero `delim`.
fn top_level_matches(text: &str, delim: &str) -> Result<Vec<usize>, ParseError> {
    let pattern = delim.as_bytes();
    let mut found = Vec::new();
    let mut resume = 0;

    walk(text, |index, _, depth| {
        if depth == 0 && index >= resume && text.as_bytes()[index..].starts_with(pattern) {
            found.push(index);
            resume = index + pattern.len();
        }
        false
    })?;

    Ok(found)
}

/// Split on every depth-zero `delim`. Always yields at least one piece.
pub fn split_top_level<'a>(text: &'a str, delim: &str) -> Result<Vec<&'a str>, ParseError> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for index in top_level_matches(text, delim)? {
        pieces.push(&text[start..index]);
        start = index + delim.len();
    }
    pieces.push(&text[start..]);

    Ok(pieces)
}

/// Split at the first depth-zero `delim`, if any.
pub fn split_once_top_level<'a>(
    text: &'a str,
    delim: &str,
) -> Result<Option<(&'a str, &'a str)>, ParseError> {
    let first = top_level_matches(text, delim)?.into_iter().next();
    Ok(first.map(|index| (&text[..index], &text[index + delim.len()..])))
}

/// First depth-zero byte that is one of `candidates`, with its offset.
pub fn first_top_level(text: &str, candidates: &[u8]) -> Result<Option<(usize, u8)>, ParseError> {
    let mut found = None;

    walk(text, |index, byte, depth| {
        if depth == 0 && candidates.contains(&byte) {
            found = Some((index, byte));
            return true;
        }
        false
    })?;

    Ok(found)
}

/// Offset of the bracket closing the opener at `open`.
pub fn matching_close(text: &str, open: usize) -> Result<usize, ParseError> {
    let mut found = None;

    walk(&text[open..], |index, byte, depth| {
        if depth == 0 && index > 0 && matches!(byte, b')' | b']') {
            found = Some(open + index);
            return true;
        }
        false
    })?;

    found.ok_or_else(|| unbalanced(text, open))
}

/// Check that every opener in `text` is closed in order.
pub fn check_balanced(text: &str) -> Result<(), ParseError> {
    walk(text, |_, _, _| false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_nesting() {
        let pieces = split_top_level("a(b,c),d[1,2],e", ",").unwrap();
        assert_eq!(pieces, vec!["a(b,c)", "d[1,2]", "e"]);
    }

    #[test]
    fn test_split_keeps_empty_pieces() {
        assert_eq!(split_top_level(",11", ",").unwrap(), vec!["", "11"]);
        assert_eq!(split_top_level("a,,b,", ",").unwrap(), vec!["a", "", "b", ""]);
        assert_eq!(split_top_level("", ",").unwrap(), vec![""]);
    }

    #[test]
    fn test_split_multibyte_delimiter() {
        let pieces = split_top_level("0..15", "..").unwrap();
        assert_eq!(pieces, vec!["0", "15"]);

        let (left, right) = split_once_top_level("NXM_OF_IP_DST[]->NXM_OF_IP_SRC[]", "->")
            .unwrap()
            .unwrap();
        assert_eq!(left, "NXM_OF_IP_DST[]");
        assert_eq!(right, "NXM_OF_IP_SRC[]");
    }

    #[test]
    fn test_split_once_missing() {
        assert_eq!(split_once_top_level("f(a->b)", "->").unwrap(), None);
    }

    #[test]
    fn test_first_top_level_skips_nested() {
        assert_eq!(
            first_top_level("ct(zone=1):x", b"(:=[").unwrap(),
            Some((2, b'('))
        );
        assert_eq!(
            first_top_level("NXM_OF_ETH_DST[]=NXM_OF_ETH_SRC[]", b"(:=[").unwrap(),
            Some((14, b'['))
        );
        assert_eq!(first_top_level("NORMAL", b"(:=[").unwrap(), None);
    }

    #[test]
    fn test_matching_close() {
        let text = "encap(nsh(tlv(1)))x";
        assert_eq!(matching_close(text, 5).unwrap(), 17);
        assert_eq!(matching_close(text, 9).unwrap(), 16);
    }

    #[test]
    fn test_unbalanced_inputs() {
        assert!(matches!(
            check_balanced("output(1"),
            Err(ParseError::UnbalancedDelimiter { offset: 6, .. })
        ));
        assert!(matches!(
            split_top_level("a),b", ","),
            Err(ParseError::UnbalancedDelimiter { offset: 1, .. })
        ));
        assert!(matches!(
            check_balanced("a[0..3)"),
            Err(ParseError::UnbalancedDelimiter { offset: 6, .. })
        ));
        assert!(check_balanced("a(b[c](d))").is_ok());
    }
}
