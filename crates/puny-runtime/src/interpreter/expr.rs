//! Expression interpretation

use super::World;
use crate::ast::{Expr, FuncCall, InfixExpr, InfixOp, NameExpr};
use crate::error::RuntimeError;
use crate::span::Span;

impl World {
    /// Interpret one node, yielding its value if it has one
    pub fn interpret(&mut self, expr: &Expr) -> Result<Option<i64>, RuntimeError> {
        match expr {
            Expr::Int(int) => Ok(Some(int.value)),
            Expr::Name(name) => self.lookup(name).map(Some),
            Expr::Add(add) => {
                let left = self.value_of(&add.left)?;
                let right = self.value_of(&add.right)?;
                left.checked_add(right)
                    .map(Some)
                    .ok_or(RuntimeError::Overflow { span: add.span })
            }
            Expr::Infix(infix) => self.eval_infix(infix).map(Some),
            Expr::Assign(assign) => {
                let value = self.value_of(&assign.value)?;
                self.variables
                    .insert(assign.target.identifier.clone(), value);
                Ok(None)
            }
            Expr::Print(print) => {
                let value = self.value_of(&print.value)?;
                self.write_value(value, print.span)?;
                Ok(None)
            }
            Expr::FuncDef(def) => {
                self.functions
                    .borrow_mut()
                    .insert(def.name.clone(), def.clone());
                Ok(None)
            }
            Expr::FuncCall(call) => {
                self.enter_call(call)?;
                Ok(None)
            }
        }
    }

    /// Interpret a node that must produce a value
    pub fn value_of(&mut self, expr: &Expr) -> Result<i64, RuntimeError> {
        self.interpret(expr)?
            .ok_or(RuntimeError::MissingValue { span: expr.span() })
    }

    /// Resolve `call` and build the callee scope
    ///
    /// Arguments are evaluated in the caller, then bound to the parameter
    /// names in a scope clone. Function bodies are not part of the language,
    /// so the returned scope is all a call produces.
    pub fn enter_call(&mut self, call: &FuncCall) -> Result<World, RuntimeError> {
        let def = self
            .function(&call.name)
            .ok_or_else(|| RuntimeError::UnknownFunction {
                name: call.name.clone(),
                span: call.span,
            })?;

        let expected = def.parameters.len();
        if call.arguments.len() != expected {
            return Err(RuntimeError::ArityMismatch {
                name: call.name.clone(),
                expected,
                found: call.arguments.len(),
                span: call.span,
            });
        }

        let mut values = Vec::with_capacity(expected);
        for arg in &call.arguments.items {
            values.push(self.value_of(arg)?);
        }

        let mut scope = self.clone();
        for (param, value) in def.parameter_names().zip(values) {
            scope.variables.insert(param.to_string(), value);
        }
        Ok(scope)
    }

    fn lookup(&self, name: &NameExpr) -> Result<i64, RuntimeError> {
        self.variable(&name.identifier)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.identifier.clone(),
                span: name.span,
            })
    }

    fn eval_infix(&mut self, infix: &InfixExpr) -> Result<i64, RuntimeError> {
        let left = self.value_of(&infix.left)?;
        let right = self.value_of(&infix.right)?;
        let overflow = RuntimeError::Overflow { span: infix.span };

        match infix.op {
            InfixOp::Add => left.checked_add(right).ok_or(overflow),
            InfixOp::Sub => left.checked_sub(right).ok_or(overflow),
            InfixOp::Mul => left.checked_mul(right).ok_or(overflow),
            InfixOp::Div => {
                if right == 0 {
                    return Err(RuntimeError::DivideByZero { span: infix.span });
                }
                // Truncates toward zero; i64::MIN / -1 overflows
                left.checked_div(right).ok_or(overflow)
            }
        }
    }

    fn write_value(&self, value: i64, span: Span) -> Result<(), RuntimeError> {
        writeln!(self.output.borrow_mut(), "{}", value).map_err(|e| RuntimeError::Output {
            message: e.to_string(),
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AssignExpr, FuncDef, IntExpr, Parameters, PrintExpr};
    use crate::interpreter::CaptureBuffer;
    use std::io;

    /// Sink that rejects every write
    struct BrokenPipe;

    impl io::Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn int(value: i64) -> Expr {
        Expr::Int(IntExpr {
            value,
            span: Span::dummy(),
        })
    }

    fn name(id: &str) -> Expr {
        Expr::Name(NameExpr {
            identifier: id.to_string(),
            span: Span::dummy(),
        })
    }

    fn infix(left: Expr, op: InfixOp, right: Expr) -> Expr {
        Expr::Infix(InfixExpr {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span: Span::dummy(),
        })
    }

    fn world() -> World {
        World::with_writer(std::io::sink())
    }

    #[test]
    fn test_integer_and_name() {
        let mut w = world();
        w.set_variable("X", 7);
        assert_eq!(w.interpret(&int(3)).unwrap(), Some(3));
        assert_eq!(w.interpret(&name("X")).unwrap(), Some(7));
    }

    #[test]
    fn test_undefined_variable() {
        let err = world().interpret(&name("Y")).unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedVariable { ref name, .. } if name == "Y"));
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        let mut w = world();
        assert_eq!(w.interpret(&infix(int(7), InfixOp::Div, int(2))).unwrap(), Some(3));
        assert_eq!(w.interpret(&infix(int(-7), InfixOp::Div, int(2))).unwrap(), Some(-3));
    }

    #[test]
    fn test_divide_by_zero() {
        let err = world()
            .interpret(&infix(int(1), InfixOp::Div, int(0)))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::DivideByZero { .. }));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let err = world()
            .interpret(&infix(int(i64::MAX), InfixOp::Add, int(1)))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Overflow { .. }));
        let err = world()
            .interpret(&infix(int(i64::MIN), InfixOp::Div, int(-1)))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Overflow { .. }));
    }

    #[test]
    fn test_assign_overwrites_and_yields_nothing() {
        let mut w = world();
        let assign = |v| {
            Expr::Assign(AssignExpr {
                target: NameExpr {
                    identifier: "X".into(),
                    span: Span::dummy(),
                },
                value: Box::new(int(v)),
                span: Span::dummy(),
            })
        };
        assert_eq!(w.interpret(&assign(1)).unwrap(), None);
        w.interpret(&assign(2)).unwrap();
        assert_eq!(w.variable("X"), Some(2));
    }

    #[test]
    fn test_missing_value() {
        let mut w = world();
        let print = Expr::Print(crate::ast::PrintExpr {
            value: Box::new(int(1)),
            span: Span::dummy(),
        });
        let err = w.value_of(&print).unwrap_err();
        assert!(matches!(err, RuntimeError::MissingValue { .. }));
    }

    fn define(w: &mut World, fname: &str, params: &[&str]) {
        let def = Expr::FuncDef(FuncDef {
            name: fname.to_string(),
            parameters: Parameters {
                items: params.iter().map(|p| name(p)).collect(),
            },
            span: Span::dummy(),
        });
        assert_eq!(w.interpret(&def).unwrap(), None);
    }

    fn call(fname: &str, args: Vec<Expr>) -> FuncCall {
        FuncCall {
            name: fname.to_string(),
            arguments: Parameters { items: args },
            span: Span::dummy(),
        }
    }

    #[test]
    fn test_call_binds_parameters_in_scope_clone() {
        let out = CaptureBuffer::new();
        let mut w = World::with_writer(out.clone());
        w.set_variable("X", 10);
        define(&mut w, "add", &["a", "b"]);
        let scope = w.enter_call(&call("add", vec![int(1), name("X")])).unwrap();
        assert_eq!(scope.variable("a"), Some(1));
        assert_eq!(scope.variable("b"), Some(10));
        assert_eq!(w.variable("a"), None);
        assert!(scope.shares_functions_with(&w));
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn test_print_writes_one_line() {
        let out = CaptureBuffer::new();
        let mut w = World::with_writer(out.clone());
        let print = Expr::Print(PrintExpr {
            value: Box::new(infix(int(6), InfixOp::Mul, int(7))),
            span: Span::dummy(),
        });
        assert_eq!(w.interpret(&print).unwrap(), None);
        assert_eq!(out.contents(), "42\n");
    }

    #[test]
    fn test_print_to_closed_sink() {
        let mut w = World::with_writer(BrokenPipe);
        let print = Expr::Print(PrintExpr {
            value: Box::new(int(1)),
            span: Span::new(3, 10),
        });
        let err = w.interpret(&print).unwrap_err();
        assert!(matches!(err, RuntimeError::Output { span, .. } if span == Span::new(3, 10)));
    }

    #[test]
    fn test_unknown_function() {
        let err = world().enter_call(&call("nope", vec![])).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownFunction { .. }));
    }

    #[test]
    fn test_arity_mismatch() {
        let mut w = world();
        define(&mut w, "add", &["a", "b"]);
        let err = w.enter_call(&call("add", vec![int(1)])).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::ArityMismatch {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }
}
