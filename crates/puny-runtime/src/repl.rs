//! REPL core logic (UI-agnostic)

use crate::diagnostic::Diagnostic;
use crate::dialect::Dialect;
use crate::error::PunyError;
use crate::interpreter::{CaptureBuffer, World};
use crate::runtime::Puny;
use crate::span::LineIndex;

/// REPL result type
#[derive(Debug, Clone, Default)]
pub struct ReplResult {
    /// Value of the last statement, if it produced one
    pub value: Option<i64>,
    /// Errors and warnings from all phases
    pub diagnostics: Vec<Diagnostic>,
    /// Output printed during execution
    pub stdout: String,
}

/// REPL core state
///
/// Variables and functions persist across [`eval_line`](Self::eval_line)
/// calls. An error aborts the line but keeps what earlier lines bound.
pub struct ReplCore {
    runtime: Puny,
    world: World,
    output: CaptureBuffer,
}

impl ReplCore {
    /// Create a new REPL core
    pub fn new(dialect: Dialect) -> Self {
        let output = CaptureBuffer::new();
        Self {
            runtime: Puny::new(dialect).with_file("<repl>"),
            world: World::with_writer(output.clone()),
            output,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.runtime.dialect()
    }

    /// Evaluate a line of input against the persistent world
    pub fn eval_line(&mut self, input: &str) -> ReplResult {
        self.output.clear();
        let mut result = ReplResult::default();

        let analysis = match self.runtime.check(input) {
            Ok(analysis) => analysis,
            Err(diagnostics) => {
                result.diagnostics = diagnostics;
                return result;
            }
        };
        result.diagnostics = analysis.warnings;

        for statement in &analysis.program.statements {
            match self.world.interpret(&statement.node) {
                Ok(value) => result.value = value,
                Err(err) => {
                    result.value = None;
                    result.diagnostics.push(
                        PunyError::from(err)
                            .to_diagnostic()
                            .with_file("<repl>")
                            .locate(input, &LineIndex::new(input)),
                    );
                    break;
                }
            }
        }

        result.stdout = self.output.contents();
        result
    }

    /// The persistent world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Reset REPL state
    ///
    /// Clears all variables and functions.
    pub fn reset(&mut self) {
        self.output.clear();
        self.world = World::with_writer(self.output.clone());
    }
}

impl Default for ReplCore {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}
