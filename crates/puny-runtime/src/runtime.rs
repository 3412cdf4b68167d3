//! Puny runtime API for embedding
//!
//! [`Puny`] runs the whole pipeline for one dialect and reports every
//! failure as a located [`Diagnostic`].

use crate::analyzer::{Analysis, Analyzer};
use crate::ast::{ParseTree, Program};
use crate::diagnostic::Diagnostic;
use crate::dialect::Dialect;
use crate::error::PunyError;
use crate::interpreter::World;
use crate::parser::{BasicParser, FuncParser, Grammar};
use crate::span::LineIndex;
use crate::token::Token;
use std::io::Write;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, Vec<Diagnostic>>;

/// Puny runtime instance
///
/// # Examples
///
/// ```
/// use puny_runtime::{CaptureBuffer, Dialect, Puny};
///
/// let out = CaptureBuffer::new();
/// let runtime = Puny::new(Dialect::Basic);
/// runtime.run_with_writer("10 LET X = 5\n20 PRINT X\n", out.clone()).unwrap();
/// assert_eq!(out.contents(), "5\n");
/// ```
#[derive(Debug, Clone)]
pub struct Puny {
    dialect: Dialect,
    /// File name reported in diagnostics
    file: String,
}

impl Puny {
    /// Create a runtime for `dialect`
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            file: "<input>".to_string(),
        }
    }

    /// Set the file name used in diagnostics
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Scan `source`, keeping ignorable tokens
    pub fn tokenize(&self, source: &str) -> RuntimeResult<Vec<Token>> {
        self.dialect
            .scanner(source)
            .tokenize()
            .map_err(|e| self.report(source, e.into()))
    }

    /// Scan and parse `source` into a raw parse tree
    pub fn parse(&self, source: &str) -> RuntimeResult<ParseTree> {
        let tree = match self.dialect {
            Dialect::Funcs => FuncParser::new(source).parse().map(ParseTree::Funcs),
            Dialect::Basic => BasicParser::parse_source(source).map(ParseTree::Basic),
        };
        tree.map_err(|e| self.report(source, e))
    }

    /// Run semantic analysis over a parse tree of `source`
    ///
    /// Warnings in the returned [`Analysis`] are already located.
    pub fn analyze(&self, source: &str, tree: ParseTree) -> RuntimeResult<Analysis> {
        let index = LineIndex::new(source);
        let mut analysis = Analyzer::new(&index)
            .analyze(tree)
            .map_err(|e| self.report(source, e.into()))?;
        analysis.warnings = analysis
            .warnings
            .into_iter()
            .map(|w| w.with_file(&self.file).locate(source, &index))
            .collect();
        Ok(analysis)
    }

    /// Parse and analyze without running
    pub fn check(&self, source: &str) -> RuntimeResult<Analysis> {
        let tree = self.parse(source)?;
        self.analyze(source, tree)
    }

    /// Load `program` into `world` and run it to completion
    pub fn execute_program(
        &self,
        source: &str,
        program: Program,
        world: &mut World,
    ) -> RuntimeResult<()> {
        world.load(program);
        world.run().map_err(|e| {
            let line = world.current().map(|s| s.line);
            let mut diags = self.report(source, e.into());
            if let (Some(line), Some(diag)) = (line, diags.first_mut()) {
                diag.notes.push(format!("while running line {}", line));
            }
            diags
        })
    }

    /// Full pipeline against an existing world; returns the warnings
    pub fn execute(&self, source: &str, world: &mut World) -> RuntimeResult<Vec<Diagnostic>> {
        let analysis = self.check(source)?;
        self.execute_program(source, analysis.program, world)?;
        Ok(analysis.warnings)
    }

    /// Full pipeline printing to stdout
    pub fn run(&self, source: &str) -> RuntimeResult<Vec<Diagnostic>> {
        self.execute(source, &mut World::new())
    }

    /// Full pipeline printing to `writer`
    pub fn run_with_writer(
        &self,
        source: &str,
        writer: impl Write + 'static,
    ) -> RuntimeResult<Vec<Diagnostic>> {
        self.execute(source, &mut World::with_writer(writer))
    }

    fn report(&self, source: &str, error: PunyError) -> Vec<Diagnostic> {
        let index = LineIndex::new(source);
        vec![error
            .to_diagnostic()
            .with_file(&self.file)
            .locate(source, &index)]
    }
}

impl Default for Puny {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}
