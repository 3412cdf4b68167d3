//! Parsing (tokens to parse tree)
//!
//! [`Parser`] is a grammar-agnostic cursor over a scanner with one token of
//! look-ahead. Concrete grammars implement [`Grammar`] and drive the cursor
//! through `peek`, `match_kind` and `skip`. Parsing is LL(1) and stops at the
//! first error; there is no recovery.

mod basic;
mod funcs;

pub use basic::BasicParser;
pub use funcs::FuncParser;

use crate::error::{LexError, PunyError, SyntaxError};
use crate::scanner::Scanner;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Result type shared by every parsing operation
pub type ParseResult<T> = Result<T, PunyError>;

/// Deepest expression nesting a grammar may open
///
/// Both grammars are right-recursive, so every infix operator adds a level.
pub const MAX_NESTING: usize = 256;

/// Token-stream cursor with one token of look-ahead
///
/// Ignorable tokens are dropped before they reach the buffer, so grammars
/// never see whitespace.
pub struct Parser<'src> {
    scanner: Scanner<'src>,
    lookahead: Option<Token>,
    /// Lexical error already reported by the scanner, replayed on every call
    lex_error: Option<LexError>,
    /// End offset of the last consumed token
    last_end: usize,
    consumed: usize,
    /// Expression rules currently open
    depth: usize,
}

impl<'src> Parser<'src> {
    /// Create a new parser over the given scanner
    pub fn new(scanner: Scanner<'src>) -> Self {
        let last_end = scanner.offset();
        Self {
            scanner,
            lookahead: None,
            lex_error: None,
            last_end,
            consumed: 0,
            depth: 0,
        }
    }

    /// Pull the next non-ignorable token into the look-ahead buffer
    fn fill(&mut self) -> ParseResult<()> {
        if self.lookahead.is_some() {
            return Ok(());
        }
        if let Some(err) = &self.lex_error {
            return Err(err.clone().into());
        }
        for item in self.scanner.by_ref() {
            match item {
                Ok(token) if token.kind.is_ignorable() => continue,
                Ok(token) => {
                    self.lookahead = Some(token);
                    return Ok(());
                }
                Err(err) => {
                    self.lex_error = Some(err.clone());
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    /// Kind of the next token, without consuming it
    pub fn peek(&mut self) -> ParseResult<Option<TokenKind>> {
        self.fill()?;
        Ok(self.lookahead.as_ref().map(|t| t.kind))
    }

    /// The next token itself, without consuming it
    pub fn peek_token(&mut self) -> ParseResult<Option<&Token>> {
        self.fill()?;
        Ok(self.lookahead.as_ref())
    }

    /// Check if the next token has the given kind
    pub fn check(&mut self, kind: TokenKind) -> ParseResult<bool> {
        Ok(self.peek()? == Some(kind))
    }

    /// Consume the next token, which must be of kind `expected`
    ///
    /// On failure the cursor does not move.
    pub fn match_kind(&mut self, expected: TokenKind) -> ParseResult<Token> {
        self.fill()?;
        match self.lookahead.take() {
            Some(token) if token.kind == expected => {
                self.last_end = token.span.end;
                self.consumed += 1;
                Ok(token)
            }
            Some(token) => {
                let err = SyntaxError::UnexpectedToken {
                    expected,
                    found: token.kind,
                    span: token.span,
                };
                self.lookahead = Some(token);
                Err(err.into())
            }
            None => Err(SyntaxError::UnexpectedEof {
                expected,
                span: self.eof_span(),
            }
            .into()),
        }
    }

    /// Consume and discard each of `kinds`, in order
    pub fn skip(&mut self, kinds: &[TokenKind]) -> ParseResult<()> {
        for kind in kinds {
            self.match_kind(*kind)?;
        }
        Ok(())
    }

    /// Whether no non-ignorable token remains
    pub fn at_end(&mut self) -> ParseResult<bool> {
        Ok(self.peek()?.is_none())
    }

    /// Number of tokens consumed so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// End offset of the last consumed token
    pub fn last_end(&self) -> usize {
        self.last_end
    }

    /// Error for a look-ahead no production of `rule` accepts
    pub fn no_production(&mut self, rule: &'static str) -> PunyError {
        if let Err(err) = self.fill() {
            return err;
        }
        let (found, span) = match &self.lookahead {
            Some(token) => (Some(token.kind), token.span),
            None => (None, self.eof_span()),
        };
        SyntaxError::NoProduction { rule, found, span }.into()
    }

    /// Open one level of expression nesting
    ///
    /// Fails once more than [`MAX_NESTING`] levels are open. Every successful
    /// call must be paired with [`Parser::leave`].
    pub fn enter(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_NESTING {
            let span = match self.peek_token()? {
                Some(token) => token.span,
                None => self.eof_span(),
            };
            return Err(SyntaxError::NestingTooDeep {
                limit: MAX_NESTING,
                span,
            }
            .into());
        }
        self.depth += 1;
        Ok(())
    }

    /// Close the level opened by the matching [`Parser::enter`]
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Empty span just past the last consumed token
    fn eof_span(&self) -> Span {
        Span::new(self.last_end, self.last_end)
    }
}

/// A concrete grammar built on [`Parser`]
pub trait Grammar<'src> {
    /// Node produced by one application of the root rule
    type Root;

    fn parser(&mut self) -> &mut Parser<'src>;

    /// Parse one top-level construct
    fn root(&mut self) -> ParseResult<Self::Root>;

    /// Apply `root` until the token stream is exhausted
    fn parse(&mut self) -> ParseResult<Vec<Self::Root>> {
        let mut roots = Vec::new();
        while !self.parser().at_end()? {
            roots.push(self.root()?);
        }
        Ok(roots)
    }
}

/// Parse an INTEGER lexeme
pub(crate) fn integer_value(token: &Token) -> ParseResult<i64> {
    token.lexeme.parse::<i64>().map_err(|_| {
        SyntaxError::IntegerOutOfRange {
            text: token.lexeme.clone(),
            span: token.span,
        }
        .into()
    })
}
