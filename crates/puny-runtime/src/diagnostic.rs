//! Diagnostic system for errors and warnings
//!
//! Every failure of the pipeline, whatever the phase, is reported through the
//! unified [`Diagnostic`] type so the CLI, the REPL and embedders format them
//! the same way.

pub mod formatter;

use crate::span::{LineIndex, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic schema version
pub const DIAG_VERSION: u32 = 1;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Fatal error that stops the run
    Error,
    /// Warning that does not stop the run
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message (error or warning)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic schema version
    pub diag_version: u32,
    /// Severity level
    pub level: DiagnosticLevel,
    /// Error code (e.g., "PN0005")
    pub code: String,
    /// Main diagnostic message
    pub message: String,
    /// File path
    pub file: String,
    /// Absolute byte range in the source
    pub span: Span,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Length of error span
    pub length: usize,
    /// Source line string
    pub snippet: String,
    /// Short label for caret range
    pub label: String,
    /// Additional notes (optional)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
    /// Suggested fix (optional)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub help: Option<String>,
}

impl Diagnostic {
    fn with_level(
        level: DiagnosticLevel,
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            diag_version: DIAG_VERSION,
            level,
            code: code.into(),
            message: message.into(),
            file: "<unknown>".to_string(),
            span,
            line: 1,
            column: span.start + 1,
            length: span.len(),
            snippet: String::new(),
            label: String::new(),
            notes: Vec::new(),
            help: None,
        }
    }

    /// Create a new error diagnostic with code
    pub fn error_with_code(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::with_level(DiagnosticLevel::Error, code, message, span)
    }

    /// Create a new warning diagnostic with code
    pub fn warning_with_code(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::with_level(DiagnosticLevel::Warning, code, message, span)
    }

    /// Create a new error diagnostic (uses generic error code)
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::error_with_code(error_codes::GENERIC_ERROR, message, span)
    }

    /// Set the file path
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Set the label (caret description)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a help message
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Resolve line, column and snippet from the span against `source`
    pub fn locate(mut self, source: &str, index: &LineIndex) -> Self {
        let (line, column) = index.locate(self.span.start);
        self.line = line;
        self.column = column;
        self.snippet = index.line_text(source, line).to_string();
        // Never underline past the end of the snippet
        let start = (column - 1).min(self.snippet.len());
        let underlined = self.snippet.get(start..).unwrap_or("");
        let end = self.span.len().min(underlined.len());
        self.length = underlined.get(..end).map_or(end, |text| text.chars().count());
        self
    }

    /// Characters of the snippet before the first caret
    ///
    /// `column` counts bytes, so multi-byte text ahead of the span takes
    /// fewer cells than `column - 1`.
    pub fn caret_padding(&self) -> usize {
        let before = self.column.saturating_sub(1);
        self.snippet
            .get(..before)
            .map_or(before, |text| text.chars().count())
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }

    /// Format as human-readable string
    pub fn to_human_string(&self) -> String {
        let mut output = String::new();

        // Header: error[PN0005]: Divide by zero
        output.push_str(&format!("{}[{}]: {}\n", self.level, self.code, self.message));

        // Location: --> program.bas:2:10
        output.push_str(&format!("  --> {}:{}:{}\n", self.file, self.line, self.column));

        if !self.snippet.is_empty() {
            output.push_str("   |\n");
            output.push_str(&format!("{:>2} | {}\n", self.line, self.snippet));

            if self.length > 0 {
                let padding = " ".repeat(self.caret_padding());
                let carets = "^".repeat(self.length);
                output.push_str(&format!("   | {}{}", padding, carets));

                if !self.label.is_empty() {
                    output.push_str(&format!(" {}", self.label));
                }
                output.push('\n');
            }
        }

        for note in &self.notes {
            output.push_str(&format!("   = note: {}\n", note));
        }

        if let Some(help) = &self.help {
            output.push_str(&format!("   = help: {}\n", help));
        }

        output
    }

    /// Format as JSON string
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as compact JSON string
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_human_string())
    }
}

/// Sort diagnostics by level (errors first), then by location
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| match (a.level, b.level) {
        (DiagnosticLevel::Error, DiagnosticLevel::Warning) => std::cmp::Ordering::Less,
        (DiagnosticLevel::Warning, DiagnosticLevel::Error) => std::cmp::Ordering::Greater,
        _ => a
            .file
            .cmp(&b.file)
            .then(a.line.cmp(&b.line))
            .then(a.column.cmp(&b.column)),
    });
}

/// Error code registry
pub mod error_codes {
    // PN0xxx - Runtime errors
    pub const UNDEFINED_VARIABLE: &str = "PN0001";
    pub const UNKNOWN_FUNCTION: &str = "PN0002";
    pub const ARITY_MISMATCH: &str = "PN0003";
    pub const MISSING_VALUE: &str = "PN0004";
    pub const DIVIDE_BY_ZERO: &str = "PN0005";
    pub const INTEGER_OVERFLOW: &str = "PN0006";

    // PN1xxx - Lexical and syntax errors
    pub const UNEXPECTED_TOKEN: &str = "PN1000";
    pub const NO_TOKEN_RULE: &str = "PN1001";
    pub const UNEXPECTED_EOF: &str = "PN1002";
    pub const NO_PRODUCTION: &str = "PN1003";
    pub const TRAILING_INPUT: &str = "PN1004";
    pub const INTEGER_OUT_OF_RANGE: &str = "PN1005";
    pub const NESTING_TOO_DEEP: &str = "PN1006";

    // PN2xxx - Warnings
    pub const LINE_NUMBER_ORDER: &str = "PN2001";
    pub const FUNCTION_REDEFINED: &str = "PN2002";

    // PN3xxx - Semantic errors
    pub const NOT_A_STATEMENT: &str = "PN3001";
    pub const INVALID_PARAMETER: &str = "PN3002";
    pub const DUPLICATE_PARAMETER: &str = "PN3003";
    pub const MISPLACED_STATEMENT: &str = "PN3004";

    // PN9xxx - Host errors
    pub const IO_ERROR: &str = "PN9001";
    pub const GENERIC_ERROR: &str = "PN9999";
}
