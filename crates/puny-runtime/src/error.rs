//! Error types for every pipeline phase
//!
//! All errors are fatal: the first one aborts the run and is propagated to
//! the entry point, where it is turned into a [`Diagnostic`].

use crate::diagnostic::{error_codes, Diagnostic};
use crate::span::Span;
use crate::token::TokenKind;
use thiserror::Error;

/// No token rule matches at the current offset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("No token rule matches at offset {offset} near {context:?}")]
    NoMatch {
        offset: usize,
        context: String,
        span: Span,
    },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::NoMatch { span, .. } => *span,
        }
    }
}

/// Token sequence does not match the grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("Expected {expected} but found {found}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        span: Span,
    },
    #[error("Expected {expected} but reached the end of input")]
    UnexpectedEof { expected: TokenKind, span: Span },
    #[error("Syntax error in {rule}: no production starts with {}", found.map_or("end of input", |k| k.as_str()))]
    NoProduction {
        rule: &'static str,
        found: Option<TokenKind>,
        span: Span,
    },
    #[error("Unexpected {found} after the end of the statement")]
    TrailingInput { found: TokenKind, span: Span },
    #[error("Integer literal '{text}' is out of range")]
    IntegerOutOfRange { text: String, span: Span },
    #[error("Expression nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize, span: Span },
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::UnexpectedToken { span, .. }
            | SyntaxError::UnexpectedEof { span, .. }
            | SyntaxError::NoProduction { span, .. }
            | SyntaxError::TrailingInput { span, .. }
            | SyntaxError::IntegerOutOfRange { span, .. }
            | SyntaxError::NestingTooDeep { span, .. } => *span,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SyntaxError::UnexpectedToken { .. } => error_codes::UNEXPECTED_TOKEN,
            SyntaxError::UnexpectedEof { .. } => error_codes::UNEXPECTED_EOF,
            SyntaxError::NoProduction { .. } => error_codes::NO_PRODUCTION,
            SyntaxError::TrailingInput { .. } => error_codes::TRAILING_INPUT,
            SyntaxError::IntegerOutOfRange { .. } => error_codes::INTEGER_OUT_OF_RANGE,
            SyntaxError::NestingTooDeep { .. } => error_codes::NESTING_TOO_DEEP,
        }
    }
}

/// Parse tree is well formed but not executable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("{kind} cannot be used as a statement")]
    NotAStatement { kind: &'static str, span: Span },
    #[error("{kind} is only allowed at the start of a statement")]
    MisplacedStatement { kind: &'static str, span: Span },
    #[error("Parameter of '{function}' must be a plain name")]
    InvalidParameter { function: String, span: Span },
    #[error("Parameter '{name}' of '{function}' is declared more than once")]
    DuplicateParameter {
        function: String,
        name: String,
        span: Span,
    },
}

impl SemanticError {
    pub fn span(&self) -> Span {
        match self {
            SemanticError::NotAStatement { span, .. }
            | SemanticError::MisplacedStatement { span, .. }
            | SemanticError::InvalidParameter { span, .. }
            | SemanticError::DuplicateParameter { span, .. } => *span,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SemanticError::NotAStatement { .. } => error_codes::NOT_A_STATEMENT,
            SemanticError::MisplacedStatement { .. } => error_codes::MISPLACED_STATEMENT,
            SemanticError::InvalidParameter { .. } => error_codes::INVALID_PARAMETER,
            SemanticError::DuplicateParameter { .. } => error_codes::DUPLICATE_PARAMETER,
        }
    }
}

/// Failure while interpreting a program against a World
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String, span: Span },
    #[error("Unknown function: {name}")]
    UnknownFunction { name: String, span: Span },
    #[error("Function '{name}' takes {expected} argument(s) but {found} were given")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },
    #[error("Expression produces no value")]
    MissingValue { span: Span },
    #[error("Division by zero")]
    DivideByZero { span: Span },
    #[error("Integer overflow")]
    Overflow { span: Span },
    #[error("Failed to write output: {message}")]
    Output { message: String, span: Span },
}

impl RuntimeError {
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::UndefinedVariable { span, .. }
            | RuntimeError::UnknownFunction { span, .. }
            | RuntimeError::ArityMismatch { span, .. }
            | RuntimeError::MissingValue { span }
            | RuntimeError::DivideByZero { span }
            | RuntimeError::Overflow { span }
            | RuntimeError::Output { span, .. } => *span,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RuntimeError::UndefinedVariable { .. } => error_codes::UNDEFINED_VARIABLE,
            RuntimeError::UnknownFunction { .. } => error_codes::UNKNOWN_FUNCTION,
            RuntimeError::ArityMismatch { .. } => error_codes::ARITY_MISMATCH,
            RuntimeError::MissingValue { .. } => error_codes::MISSING_VALUE,
            RuntimeError::DivideByZero { .. } => error_codes::DIVIDE_BY_ZERO,
            RuntimeError::Overflow { .. } => error_codes::INTEGER_OVERFLOW,
            RuntimeError::Output { .. } => error_codes::IO_ERROR,
        }
    }
}

/// Any fatal error of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PunyError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl PunyError {
    pub fn span(&self) -> Span {
        match self {
            PunyError::Lex(e) => e.span(),
            PunyError::Syntax(e) => e.span(),
            PunyError::Semantic(e) => e.span(),
            PunyError::Runtime(e) => e.span(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PunyError::Lex(_) => error_codes::NO_TOKEN_RULE,
            PunyError::Syntax(e) => e.code(),
            PunyError::Semantic(e) => e.code(),
            PunyError::Runtime(e) => e.code(),
        }
    }

    /// Convert to an (unlocated) diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (label, help) = match self {
            PunyError::Lex(_) => ("lexical error", Some("remove or replace this character")),
            PunyError::Syntax(_) => ("syntax error", None),
            PunyError::Semantic(_) => ("semantic error", None),
            PunyError::Runtime(RuntimeError::UndefinedVariable { .. }) => {
                ("not bound", Some("assign it with LET before using it"))
            }
            PunyError::Runtime(RuntimeError::UnknownFunction { .. }) => {
                ("not defined", Some("define the function with 'def' before calling it"))
            }
            PunyError::Runtime(_) => ("runtime error", None),
        };
        let diag = Diagnostic::error_with_code(self.code(), self.to_string(), self.span())
            .with_label(label);
        match help {
            Some(help) => diag.with_help(help),
            None => diag,
        }
    }
}
