//! Pull scanner over a single dump line
//!
//! Wraps the logos lexer so header parsers can read one token at a time,
//! inspect spans, and hand the untokenized action text over to the term
//! grammar by skipping past it.

use crate::error::ParseError;
use crate::lexing::tokens::Token;
use logos::{Lexer, Logos, Span};

/// Token-at-a-time reader over one line
pub struct Scanner<'a> {
    lexer: Lexer<'a, Token<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Token::lexer(source),
        }
    }

    /// Next token, or `None` once the line is exhausted
    pub fn scan(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        match self.lexer.next() {
            None => Ok(None),
            Some(Ok(token)) => Ok(Some(token)),
            Some(Err(())) => Err(ParseError::Scan {
                offset: self.lexer.span().start,
            }),
        }
    }

    /// Byte span of the token returned by the last `scan`
    pub fn span(&self) -> Span {
        self.lexer.span()
    }

    pub fn source(&self) -> &'a str {
        self.lexer.source()
    }

    /// Input not yet consumed
    pub fn remainder(&self) -> &'a str {
        self.lexer.remainder()
    }

    /// Consume `len` bytes of the remainder without tokenizing them
    ///
    /// `len` must land on a char boundary of the remainder.
    pub fn skip(&mut self, len: usize) {
        self.lexer.bump(len);
    }
}

/// Tokenize a whole line, keeping spans
pub fn tokenize(source: &str) -> Result<Vec<(Token<'_>, Span)>, ParseError> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();

    while let Some(token) = scanner.scan()? {
        tokens.push((token, scanner.span()));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token<'_>> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_empty_line_has_no_tokens() {
        let mut scanner = Scanner::new("");
        assert_eq!(scanner.scan(), Ok(None));
        assert_eq!(scanner.scan(), Ok(None));
    }

    #[test]
    fn test_default_rule_stream() {
        let tokens = kinds(" cookie=0x0, priority=0 actions=NORMAL");
        assert_eq!(
            tokens,
            vec![
                Token::Whitespace,
                Token::Value("cookie"),
                Token::Equal,
                Token::Value("0x0"),
                Token::Comma,
                Token::Whitespace,
                Token::Value("priority"),
                Token::Equal,
                Token::Value("0"),
                Token::Whitespace,
                Token::Value("actions"),
                Token::Equal,
                Token::Value("NORMAL"),
            ]
        );
    }

    #[test]
    fn test_comma_without_space() {
        let tokens = kinds("priority=1,dl_src=01:00:00:00:00:00/01:00:00:00:00:00");
        assert_eq!(
            tokens,
            vec![
                Token::Value("priority"),
                Token::Equal,
                Token::Value("1"),
                Token::Comma,
                Token::Value("dl_src"),
                Token::Equal,
                Token::Value("01:00:00:00:00:00/01:00:00:00:00:00"),
            ]
        );
    }

    #[test]
    fn test_spans_follow_source() {
        let tokens = tokenize("a=bc").unwrap();
        let spans: Vec<Span> = tokens.into_iter().map(|(_, span)| span).collect();
        assert_eq!(spans, vec![0..1, 1..2, 2..4]);
    }

    #[test]
    fn test_skip_hands_over_remainder() {
        let mut scanner = Scanner::new("actions=output:1,bucket=x");
        assert_eq!(scanner.scan(), Ok(Some(Token::Value("actions"))));
        assert_eq!(scanner.scan(), Ok(Some(Token::Equal)));
        assert_eq!(scanner.remainder(), "output:1,bucket=x");

        scanner.skip("output:1".len());
        assert_eq!(scanner.scan(), Ok(Some(Token::Comma)));
        assert_eq!(scanner.scan(), Ok(Some(Token::Value("bucket"))));
    }
}
