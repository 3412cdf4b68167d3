//! The two built-in dialects and their token tables

use crate::scanner::{Scanner, TokenRules};
use crate::token::TokenKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

/// Token table of the function-definition dialect, in match order
pub const FUNCS_TOKENS: &[(&str, TokenKind)] = &[
    (r"def\b", TokenKind::Def),
    (r"[a-zA-Z_][a-zA-Z0-9_]*", TokenKind::Name),
    (r"[0-9]+", TokenKind::Integer),
    (r"\(", TokenKind::LParen),
    (r"\)", TokenKind::RParen),
    (r"\+", TokenKind::Plus),
    (r":", TokenKind::Colon),
    (r",", TokenKind::Comma),
    (r"\s+", TokenKind::Indent),
];

/// Token table of the BASIC-style dialect, in match order
pub const BASIC_TOKENS: &[(&str, TokenKind)] = &[
    (r"LET\b", TokenKind::Let),
    (r"PRINT\b", TokenKind::Print),
    (r"[A-Z_][A-Z0-9_]*", TokenKind::Name),
    (r"[0-9]+", TokenKind::Integer),
    (r"=", TokenKind::Equal),
    (r"\+", TokenKind::Plus),
    (r"-", TokenKind::Minus),
    (r"\*", TokenKind::Mult),
    (r"/", TokenKind::Div),
    (r"\s+", TokenKind::Space),
];

static FUNCS_RULES: OnceLock<TokenRules> = OnceLock::new();
static BASIC_RULES: OnceLock<TokenRules> = OnceLock::new();

/// Which grammar a source text is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `def name(params):` and `name(args)` lines
    #[default]
    Funcs,
    /// Numbered `LET` / `PRINT` lines
    Basic,
}

impl Dialect {
    /// Compiled token rules, built once per process
    pub fn rules(self) -> &'static TokenRules {
        let (cell, table) = match self {
            Dialect::Funcs => (&FUNCS_RULES, FUNCS_TOKENS),
            Dialect::Basic => (&BASIC_RULES, BASIC_TOKENS),
        };
        cell.get_or_init(|| {
            TokenRules::from_table(table).expect("built-in token table must compile")
        })
    }

    /// Scanner over `source` using this dialect's rules
    pub fn scanner(self, source: &str) -> Scanner<'_> {
        Scanner::new(self.rules(), source)
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Funcs => "funcs",
            Dialect::Basic => "basic",
        }
    }

    /// Parse a dialect name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "funcs" => Some(Dialect::Funcs),
            "basic" => Some(Dialect::Basic),
            _ => None,
        }
    }

    /// Guess the dialect from a file extension; `.bas` means basic
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "bas" => Some(Dialect::Basic),
            "py" | "puny" => Some(Dialect::Funcs),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
