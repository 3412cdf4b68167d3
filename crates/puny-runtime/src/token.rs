//! Token types for lexical analysis
//!
//! Defines every token kind produced by the two dialect scanners.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token produced by the scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The source text of this token
    pub lexeme: String,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Keywords
    /// `def` (funcs dialect)
    Def,
    /// `LET` (basic dialect)
    Let,
    /// `PRINT` (basic dialect)
    Print,

    // Literals
    /// Identifier
    Name,
    /// Digit sequence
    Integer,

    // Punctuation
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `=`
    Equal,

    // Operators
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Mult,
    /// `/`
    Div,

    // Ignorable
    /// Whitespace in the funcs dialect
    Indent,
    /// Whitespace in the basic dialect
    Space,
}

impl TokenKind {
    /// Whitespace kinds the scanner emits but the parser never sees
    pub fn is_ignorable(self) -> bool {
        matches!(self, TokenKind::Indent | TokenKind::Space)
    }

    /// Binary operators accepted by the basic `infix` production
    pub fn is_infix_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Mult | TokenKind::Div
        )
    }

    /// Get the upper-case name used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Def => "DEF",
            TokenKind::Let => "LET",
            TokenKind::Print => "PRINT",
            TokenKind::Name => "NAME",
            TokenKind::Integer => "INTEGER",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Equal => "EQUAL",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Mult => "MULT",
            TokenKind::Div => "DIV",
            TokenKind::Indent => "INDENT",
            TokenKind::Space => "SPACE",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
