//! Abstract Syntax Tree (AST) definitions
//!
//! One closed [`Expr`] type covers both dialects. Nodes are built once by a
//! grammar parser and never mutated; children are exclusively owned.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// AST schema version
///
/// Included in JSON dumps so tooling can detect incompatible changes.
/// Increment when making breaking changes to the AST structure.
pub const AST_VERSION: u32 = 1;

/// Expression node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    Name(NameExpr),
    Int(IntExpr),
    /// `left + right` (funcs dialect)
    Add(AddExpr),
    /// `left op right` (basic dialect)
    Infix(InfixExpr),
    /// `LET target = value`
    Assign(AssignExpr),
    /// `PRINT value`
    Print(PrintExpr),
    /// `def name(params):`
    FuncDef(FuncDef),
    /// `name(args)`
    FuncCall(FuncCall),
}

impl Expr {
    /// Get the span of this expression
    pub fn span(&self) -> Span {
        match self {
            Expr::Name(e) => e.span,
            Expr::Int(e) => e.span,
            Expr::Add(e) => e.span,
            Expr::Infix(e) => e.span,
            Expr::Assign(e) => e.span,
            Expr::Print(e) => e.span,
            Expr::FuncDef(e) => e.span,
            Expr::FuncCall(e) => e.span,
        }
    }

    /// Human-readable node kind for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Name(_) => "name",
            Expr::Int(_) => "integer",
            Expr::Add(_) => "addition",
            Expr::Infix(_) => "infix expression",
            Expr::Assign(_) => "LET",
            Expr::Print(_) => "PRINT",
            Expr::FuncDef(_) => "function definition",
            Expr::FuncCall(_) => "function call",
        }
    }
}

/// Identifier reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameExpr {
    pub identifier: String,
    pub span: Span,
}

/// Integer literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntExpr {
    pub value: i64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddExpr {
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Basic-dialect binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl InfixOp {
    pub fn symbol(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
        }
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfixExpr {
    pub left: Box<Expr>,
    pub op: InfixOp,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignExpr {
    pub target: NameExpr,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintExpr {
    pub value: Box<Expr>,
    pub span: Span,
}

/// Function header; the body is not part of the language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncDef {
    pub name: String,
    pub parameters: Parameters,
    pub span: Span,
}

impl FuncDef {
    /// Parameter names, in declaration order
    ///
    /// Non-name parameters are rejected by the analyzer and skipped here.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.items.iter().filter_map(|p| match p {
            Expr::Name(name) => Some(name.identifier.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncCall {
    pub name: String,
    pub arguments: Parameters,
    pub span: Span,
}

/// Ordered, possibly empty, list of expressions
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Parameters {
    pub items: Vec<Expr>,
}

impl Parameters {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One line of a basic program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedLine {
    pub number: u32,
    pub statement: Expr,
}

/// Raw output of a grammar parser, before analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseTree {
    Funcs(Vec<Expr>),
    Basic(Vec<NumberedLine>),
}

impl ParseTree {
    /// Number of top-level statements
    pub fn len(&self) -> usize {
        match self {
            ParseTree::Funcs(items) => items.len(),
            ParseTree::Basic(lines) => lines.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Versioned parse tree wrapper for JSON serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedTree {
    /// AST schema version
    pub ast_version: u32,
    pub tree: ParseTree,
}

impl VersionedTree {
    pub fn new(tree: ParseTree) -> Self {
        Self {
            ast_version: AST_VERSION,
            tree,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<ParseTree> for VersionedTree {
    fn from(tree: ParseTree) -> Self {
        Self::new(tree)
    }
}

/// Executable statement tagged with its line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// BASIC line number, or 1-based source line in the funcs dialect
    pub line: u32,
    pub node: Expr,
}

/// Analyzed program, in execution order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }
}
