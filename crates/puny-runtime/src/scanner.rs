//! Lexical analysis driven by an ordered rule table
//!
//! A [`TokenRules`] table is a list of `(pattern, kind)` pairs tried top to
//! bottom against the remaining input; the first pattern that matches at the
//! current offset wins. Keyword rules must therefore come before the generic
//! identifier rule that would otherwise shadow them.

use crate::error::LexError;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use regex::Regex;

/// Characters of the line kept after the failing offset in a lexical error
const CONTEXT_WIDTH: usize = 20;
/// Characters of the line kept before the failing offset
const CONTEXT_BEFORE: usize = 10;

/// One `(pattern, kind)` entry of a rule table
#[derive(Debug, Clone)]
pub struct TokenRule {
    pattern: Regex,
    kind: TokenKind,
}

impl TokenRule {
    /// Compile a rule; the pattern is anchored to the start of the input
    pub fn new(pattern: &str, kind: TokenKind) -> Result<Self, regex::Error> {
        let anchored = if pattern.starts_with('^') {
            pattern.to_string()
        } else {
            format!("^(?:{})", pattern)
        };
        Ok(Self {
            pattern: Regex::new(&anchored)?,
            kind,
        })
    }

    /// Length of the match at the very start of `input`, if any
    fn match_len(&self, input: &str) -> Option<usize> {
        self.pattern
            .find(input)
            .filter(|m| m.start() == 0 && !m.is_empty())
            .map(|m| m.end())
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }
}

/// Ordered rule table, first match wins
#[derive(Debug, Clone)]
pub struct TokenRules {
    rules: Vec<TokenRule>,
}

impl TokenRules {
    /// Compile a table of `(pattern, kind)` pairs, keeping their order
    pub fn from_table(table: &[(&str, TokenKind)]) -> Result<Self, regex::Error> {
        let rules = table
            .iter()
            .map(|(pattern, kind)| TokenRule::new(pattern, *kind))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// First rule matching at the start of `input`
    fn first_match(&self, input: &str) -> Option<(TokenKind, usize)> {
        self.rules
            .iter()
            .find_map(|rule| rule.match_len(input).map(|len| (rule.kind, len)))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.rules.len()
    }
}

/// Lazy token stream over one piece of source text
///
/// Yields `Ok(token)` for every match, including ignorable whitespace, and a
/// single `Err(LexError)` when no rule matches. The scanner is fused after an
/// error and never rewinds.
pub struct Scanner<'a> {
    rules: &'a TokenRules,
    source: &'a str,
    /// Offset into `source` of the first unconsumed byte
    offset: usize,
    /// Absolute offset of `source` within the whole program
    base: usize,
    failed: bool,
}

impl<'a> Scanner<'a> {
    /// Scan `source` from its start
    pub fn new(rules: &'a TokenRules, source: &'a str) -> Self {
        Self::with_base(rules, source, 0)
    }

    /// Scan `source`, reporting spans shifted by `base`
    ///
    /// Used when a program is scanned piecewise (one BASIC line at a time)
    /// but spans must stay absolute.
    pub fn with_base(rules: &'a TokenRules, source: &'a str, base: usize) -> Self {
        Self {
            rules,
            source,
            offset: 0,
            base,
            failed: false,
        }
    }

    /// Absolute offset of the next unconsumed byte
    pub fn offset(&self) -> usize {
        self.base + self.offset
    }

    /// Whether all input has been consumed
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// Describe the current location for an error report
    ///
    /// The context is the text around the offset, never crossing a line end.
    pub fn error(&self) -> LexError {
        let (before, rest) = self.source.split_at(self.offset);
        let line_before = before.rsplit('\n').next().unwrap_or("");
        let skip = line_before.chars().count().saturating_sub(CONTEXT_BEFORE);
        let line_after = rest.lines().next().unwrap_or("");
        let context: String = line_before
            .chars()
            .skip(skip)
            .chain(line_after.chars().take(CONTEXT_WIDTH))
            .collect();
        LexError::NoMatch {
            offset: self.offset(),
            context,
            span: Span::new(self.offset(), self.offset() + rest.chars().next().map_or(0, char::len_utf8)),
        }
    }

    /// Collect every remaining token, stopping at the first error
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.is_at_end() {
            return None;
        }

        let rest = &self.source[self.offset..];
        match self.rules.first_match(rest) {
            Some((kind, len)) => {
                let start = self.offset();
                let lexeme = &rest[..len];
                self.offset += len;
                Some(Ok(Token::new(kind, lexeme, Span::new(start, start + len))))
            }
            None => {
                self.failed = true;
                Some(Err(self.error()))
            }
        }
    }
}
