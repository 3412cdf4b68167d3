//! Semantic analysis (parse tree to executable program)
//!
//! The analyzer checks that every top-level node is a statement of its
//! dialect and that statement-only nodes do not appear inside expressions.
//! It keeps parse order; line numbers are carried as metadata only.
//! Suspicious but executable input produces warnings instead of errors.

use crate::ast::*;
use crate::diagnostic::{error_codes, Diagnostic};
use crate::error::SemanticError;
use crate::span::LineIndex;
use std::collections::HashSet;

/// Output of a successful analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub program: Program,
    pub warnings: Vec<Diagnostic>,
}

/// Semantic analyzer for both dialects
pub struct Analyzer<'a> {
    /// Used to turn funcs-dialect offsets into source lines
    index: &'a LineIndex,
    warnings: Vec<Diagnostic>,
}

impl<'a> Analyzer<'a> {
    pub fn new(index: &'a LineIndex) -> Self {
        Self {
            index,
            warnings: Vec::new(),
        }
    }

    /// Analyze a parse tree, stopping at the first semantic error
    pub fn analyze(mut self, tree: ParseTree) -> Result<Analysis, SemanticError> {
        let statements = match tree {
            ParseTree::Basic(lines) => self.analyze_basic(lines)?,
            ParseTree::Funcs(roots) => self.analyze_funcs(roots)?,
        };
        Ok(Analysis {
            program: Program { statements },
            warnings: self.warnings,
        })
    }

    fn analyze_basic(&mut self, lines: Vec<NumberedLine>) -> Result<Vec<Statement>, SemanticError> {
        let mut previous: Option<u32> = None;
        let mut statements = Vec::with_capacity(lines.len());

        for line in lines {
            match &line.statement {
                Expr::Assign(_) | Expr::Print(_) | Expr::Name(_) | Expr::Int(_) | Expr::Infix(_) => {}
                other => {
                    return Err(SemanticError::NotAStatement {
                        kind: other.kind_name(),
                        span: other.span(),
                    })
                }
            }
            check_nested(&line.statement, true)?;

            if let Some(prev) = previous {
                if line.number <= prev {
                    self.warnings.push(
                        Diagnostic::warning_with_code(
                            error_codes::LINE_NUMBER_ORDER,
                            format!("Line {} follows line {}", line.number, prev),
                            line.statement.span(),
                        )
                        .with_label("out of order")
                        .with_note("statements run in source order, not by line number"),
                    );
                }
            }
            previous = Some(line.number);

            statements.push(Statement {
                line: line.number,
                node: line.statement,
            });
        }

        Ok(statements)
    }

    fn analyze_funcs(&mut self, roots: Vec<Expr>) -> Result<Vec<Statement>, SemanticError> {
        let mut defined = HashSet::new();
        let mut statements = Vec::with_capacity(roots.len());

        for root in roots {
            match &root {
                Expr::FuncDef(def) => {
                    check_parameters(def)?;
                    if !defined.insert(def.name.clone()) {
                        self.warnings.push(
                            Diagnostic::warning_with_code(
                                error_codes::FUNCTION_REDEFINED,
                                format!("Function '{}' is defined more than once", def.name),
                                def.span,
                            )
                            .with_label("redefined here")
                            .with_note("the last definition wins"),
                        );
                    }
                }
                Expr::FuncCall(call) => {
                    for arg in &call.arguments.items {
                        check_nested(arg, false)?;
                    }
                }
                other => {
                    return Err(SemanticError::NotAStatement {
                        kind: other.kind_name(),
                        span: other.span(),
                    })
                }
            }

            let (line, _) = self.index.locate(root.span().start);
            statements.push(Statement {
                line: line as u32,
                node: root,
            });
        }

        Ok(statements)
    }
}

/// Parameters of a definition must be distinct plain names
fn check_parameters(def: &FuncDef) -> Result<(), SemanticError> {
    let mut seen = HashSet::new();
    for param in &def.parameters.items {
        let Expr::Name(name) = param else {
            return Err(SemanticError::InvalidParameter {
                function: def.name.clone(),
                span: param.span(),
            });
        };
        if !seen.insert(name.identifier.as_str()) {
            return Err(SemanticError::DuplicateParameter {
                function: def.name.clone(),
                name: name.identifier.clone(),
                span: name.span,
            });
        }
    }
    Ok(())
}

/// Reject LET / PRINT anywhere except at the top of a statement
fn check_nested(expr: &Expr, top_level: bool) -> Result<(), SemanticError> {
    match expr {
        Expr::Name(_) | Expr::Int(_) => Ok(()),
        Expr::Add(AddExpr { left, right, .. }) | Expr::Infix(InfixExpr { left, right, .. }) => {
            check_nested(left, false)?;
            check_nested(right, false)
        }
        Expr::Assign(assign) if top_level => check_nested(&assign.value, false),
        Expr::Print(print) if top_level => check_nested(&print.value, false),
        Expr::Assign(_) | Expr::Print(_) => Err(SemanticError::MisplacedStatement {
            kind: expr.kind_name(),
            span: expr.span(),
        }),
        Expr::FuncCall(call) => call
            .arguments
            .items
            .iter()
            .try_for_each(|arg| check_nested(arg, false)),
        Expr::FuncDef(def) => Err(SemanticError::NotAStatement {
            kind: expr.kind_name(),
            span: def.span,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{BasicParser, FuncParser, Grammar};

    fn analyze_basic(source: &str) -> Result<Analysis, SemanticError> {
        let lines = BasicParser::parse_source(source).unwrap();
        let index = LineIndex::new(source);
        Analyzer::new(&index).analyze(ParseTree::Basic(lines))
    }

    fn analyze_funcs(source: &str) -> Result<Analysis, SemanticError> {
        let roots = FuncParser::new(source).parse().unwrap();
        let index = LineIndex::new(source);
        Analyzer::new(&index).analyze(ParseTree::Funcs(roots))
    }

    #[test]
    fn test_basic_program_keeps_order() {
        let analysis = analyze_basic("10 LET X = 5\n20 PRINT X\n").unwrap();
        let lines: Vec<_> = analysis.program.statements.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![10, 20]);
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn test_out_of_order_lines_warn_but_keep_parse_order() {
        let analysis = analyze_basic("20 PRINT 1\n10 PRINT 2\n").unwrap();
        let lines: Vec<_> = analysis.program.statements.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![20, 10]);
        assert_eq!(analysis.warnings.len(), 1);
        assert_eq!(analysis.warnings[0].code, error_codes::LINE_NUMBER_ORDER);
    }

    #[test]
    fn test_nested_let_is_misplaced() {
        let err = analyze_basic("10 PRINT LET X = 1\n").unwrap_err();
        assert!(matches!(err, SemanticError::MisplacedStatement { kind: "LET", .. }));
    }

    #[test]
    fn test_let_value_may_not_print() {
        let err = analyze_basic("10 LET X = 1 + PRINT 2\n").unwrap_err();
        assert!(matches!(err, SemanticError::MisplacedStatement { kind: "PRINT", .. }));
    }

    #[test]
    fn test_funcs_lines_are_source_lines() {
        let analysis = analyze_funcs("def add(a, b):\n\nadd(1, 2)\n").unwrap();
        let lines: Vec<_> = analysis.program.statements.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_integer_parameter_rejected() {
        let err = analyze_funcs("def f(1):").unwrap_err();
        assert!(matches!(err, SemanticError::InvalidParameter { .. }));
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let err = analyze_funcs("def f(a, a):").unwrap_err();
        assert!(matches!(
            err,
            SemanticError::DuplicateParameter { ref name, .. } if name == "a"
        ));
    }

    #[test]
    fn test_redefinition_warns() {
        let analysis = analyze_funcs("def f(a):\ndef f(b):\n").unwrap();
        assert_eq!(analysis.warnings.len(), 1);
        assert_eq!(analysis.warnings[0].code, error_codes::FUNCTION_REDEFINED);
    }

    #[test]
    fn test_bare_expression_in_funcs_is_not_a_statement() {
        let index = LineIndex::new("1");
        let tree = ParseTree::Funcs(vec![Expr::Int(IntExpr {
            value: 1,
            span: crate::span::Span::new(0, 1),
        })]);
        let err = Analyzer::new(&index).analyze(tree).unwrap_err();
        assert!(matches!(err, SemanticError::NotAStatement { kind: "integer", .. }));
    }
}
