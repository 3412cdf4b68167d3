//! Puny Runtime - scanner, parser framework and interpreter
//!
//! This library provides a small text-processing pipeline and two dialects
//! built on it:
//! - Rule-table scanning and a recursive-descent parser framework
//! - The `funcs` grammar (function definitions and calls)
//! - The `basic` grammar (numbered `LET` / `PRINT` lines)
//! - Semantic analysis and tree-walking interpretation over a [`World`]

/// Puny runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod analyzer;
pub mod ast;
pub mod diagnostic;
pub mod dialect;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod repl;
pub mod runtime;
pub mod scanner;
pub mod span;
pub mod token;

// Re-export commonly used types
pub use analyzer::{Analysis, Analyzer};
pub use ast::{Expr, ParseTree, Program, Statement, VersionedTree, AST_VERSION};
pub use diagnostic::formatter::{ColorMode, DiagnosticFormatter};
pub use diagnostic::{error_codes, sort_diagnostics, Diagnostic, DiagnosticLevel, DIAG_VERSION};
pub use dialect::Dialect;
pub use error::{LexError, PunyError, RuntimeError, SemanticError, SyntaxError};
pub use interpreter::{CaptureBuffer, ExecState, World};
pub use parser::{BasicParser, FuncParser, Grammar, ParseResult, Parser};
pub use repl::{ReplCore, ReplResult};
pub use runtime::{Puny, RuntimeResult};
pub use scanner::{Scanner, TokenRule, TokenRules};
pub use span::{LineIndex, Span};
pub use token::{Token, TokenKind};
