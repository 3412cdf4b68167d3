//! Tree-walking interpreter and its execution environment
//!
//! A [`World`] holds variable bindings, the function table, the loaded
//! program with its instruction pointer, and the sink `PRINT` writes to.
//! Execution is a two-state machine: *ready* while a statement is pending at
//! `ip`, *halted* once `ip` moves past the last statement. There are no jumps.

mod expr;

use crate::ast::{FuncDef, Program, Statement};
use crate::error::RuntimeError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// Execution state of a [`World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    /// A statement is pending at `ip`
    Ready,
    /// `ip` is past the last statement
    Halted,
}

/// Shared output sink
pub type Output = Rc<RefCell<dyn Write>>;

/// In-memory output sink, cheap to clone, for tests and embedders
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer(Rc<RefCell<Vec<u8>>>);

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Mutable execution environment
///
/// `clone()` is a scope clone: variables are copied, while the function
/// table, the program and the output sink keep their identity.
pub struct World {
    variables: HashMap<String, i64>,
    functions: Rc<RefCell<HashMap<String, FuncDef>>>,
    code: Rc<Program>,
    ip: usize,
    output: Output,
}

impl World {
    /// Create an empty world printing to stdout
    pub fn new() -> Self {
        Self::with_output(Rc::new(RefCell::new(io::stdout())))
    }

    /// Create an empty world printing to `writer`
    pub fn with_writer(writer: impl Write + 'static) -> Self {
        Self::with_output(Rc::new(RefCell::new(writer)))
    }

    /// Create an empty world printing to an existing shared sink
    pub fn with_output(output: Output) -> Self {
        Self {
            variables: HashMap::new(),
            functions: Rc::new(RefCell::new(HashMap::new())),
            code: Rc::new(Program::default()),
            ip: 0,
            output,
        }
    }

    /// Install `program` as the code to run and rewind to its start
    pub fn load(&mut self, program: impl Into<Rc<Program>>) {
        self.code = program.into();
        self.ip = 0;
    }

    pub fn state(&self) -> ExecState {
        if self.ip < self.code.len() {
            ExecState::Ready
        } else {
            ExecState::Halted
        }
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Statement pending at `ip`, if any
    pub fn current(&self) -> Option<&Statement> {
        self.code.get(self.ip)
    }

    /// Interpret the statement at `ip` and advance by one
    ///
    /// On error `ip` stays on the failing statement.
    pub fn step(&mut self) -> Result<ExecState, RuntimeError> {
        let code = Rc::clone(&self.code);
        let Some(statement) = code.get(self.ip) else {
            return Ok(ExecState::Halted);
        };
        self.interpret(&statement.node)?;
        self.ip += 1;
        Ok(self.state())
    }

    /// Step until halted
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        while self.step()? == ExecState::Ready {}
        self.flush_output();
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Option<i64> {
        self.variables.get(name).copied()
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: i64) {
        self.variables.insert(name.into(), value);
    }

    /// Variable bindings sorted by name
    pub fn variables(&self) -> Vec<(String, i64)> {
        let mut vars: Vec<_> = self
            .variables
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        vars.sort();
        vars
    }

    pub fn function(&self, name: &str) -> Option<FuncDef> {
        self.functions.borrow().get(name).cloned()
    }

    /// Defined function names, sorted
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.functions.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn shares_code_with(&self, other: &World) -> bool {
        Rc::ptr_eq(&self.code, &other.code)
    }

    pub fn shares_functions_with(&self, other: &World) -> bool {
        Rc::ptr_eq(&self.functions, &other.functions)
    }

    fn flush_output(&self) {
        let _ = self.output.borrow_mut().flush();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for World {
    fn clone(&self) -> Self {
        Self {
            variables: self.variables.clone(),
            functions: Rc::clone(&self.functions),
            code: Rc::clone(&self.code),
            ip: self.ip,
            output: Rc::clone(&self.output),
        }
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("variables", &self.variables)
            .field("functions", &self.function_names())
            .field("statements", &self.code.len())
            .field("ip", &self.ip)
            .finish()
    }
}
