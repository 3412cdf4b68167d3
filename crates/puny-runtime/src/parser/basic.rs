//! Grammar of the BASIC-style dialect
//!
//! ```text
//! line       = INTEGER expression
//! expression = NAME [infix] | LET NAME EQUAL expression
//!            | PRINT expression | INTEGER [infix]
//! infix      = (PLUS | MINUS | MULT | DIV) expression
//! ```
//!
//! A program is a sequence of source lines, each scanned and parsed on its
//! own. Infix chains are right-recursive: `10 - 2 - 3` is `10 - (2 - 3)`.

use super::{integer_value, Grammar, ParseResult, Parser};
use crate::ast::{
    AssignExpr, Expr, InfixExpr, InfixOp, IntExpr, NameExpr, NumberedLine, PrintExpr,
};
use crate::dialect::Dialect;
use crate::error::SyntaxError;
use crate::scanner::Scanner;
use crate::token::TokenKind;

/// Parser for one line of a basic program
pub struct BasicParser<'src> {
    parser: Parser<'src>,
}

impl<'src> BasicParser<'src> {
    /// Parser for a line whose first byte sits at absolute offset `base`
    pub fn for_line(line: &'src str, base: usize) -> Self {
        Self {
            parser: Parser::new(Scanner::with_base(Dialect::Basic.rules(), line, base)),
        }
    }

    /// Parse a whole program, one line at a time
    ///
    /// Blank lines are skipped. Spans stay absolute within `source`.
    pub fn parse_source(source: &str) -> ParseResult<Vec<NumberedLine>> {
        let mut lines = Vec::new();
        let mut base = 0;
        for raw in source.split_inclusive('\n') {
            let text = raw.trim_end_matches(['\n', '\r']);
            if !text.trim().is_empty() {
                lines.push(BasicParser::for_line(text, base).line()?);
            }
            base += raw.len();
        }
        Ok(lines)
    }

    /// Parse exactly one numbered statement and require the line to end
    pub fn line(&mut self) -> ParseResult<NumberedLine> {
        let line = self.root()?;
        if let Some(token) = self.parser.peek_token()? {
            return Err(SyntaxError::TrailingInput {
                found: token.kind,
                span: token.span,
            }
            .into());
        }
        Ok(line)
    }

    pub fn expression(&mut self) -> ParseResult<Expr> {
        self.parser.enter()?;
        let expr = self.nested_expression();
        self.parser.leave();
        expr
    }

    fn nested_expression(&mut self) -> ParseResult<Expr> {
        match self.parser.peek()? {
            Some(TokenKind::Name) => {
                let name = Expr::Name(self.name()?);
                self.maybe_infix(name)
            }
            Some(TokenKind::Let) => self.assign(),
            Some(TokenKind::Print) => self.print(),
            Some(TokenKind::Integer) => {
                let number = self.integer()?;
                self.maybe_infix(number)
            }
            _ => Err(self.parser.no_production("expression")),
        }
    }

    pub fn name(&mut self) -> ParseResult<NameExpr> {
        let token = self.parser.match_kind(TokenKind::Name)?;
        Ok(NameExpr {
            identifier: token.lexeme,
            span: token.span,
        })
    }

    pub fn integer(&mut self) -> ParseResult<Expr> {
        let token = self.parser.match_kind(TokenKind::Integer)?;
        Ok(Expr::Int(IntExpr {
            value: integer_value(&token)?,
            span: token.span,
        }))
    }

    /// `LET NAME EQUAL expression`
    pub fn assign(&mut self) -> ParseResult<Expr> {
        let let_token = self.parser.match_kind(TokenKind::Let)?;
        let target = self.name()?;
        self.parser.skip(&[TokenKind::Equal])?;
        let value = self.expression()?;
        Ok(Expr::Assign(AssignExpr {
            span: let_token.span.merge(value.span()),
            target,
            value: Box::new(value),
        }))
    }

    /// `left op expression`, with `op` the look-ahead operator kind
    pub fn infix(&mut self, left: Expr, op: TokenKind) -> ParseResult<Expr> {
        self.parser.match_kind(op)?;
        let right = self.expression()?;
        let op = match op {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Mult => InfixOp::Mul,
            _ => InfixOp::Div,
        };
        Ok(Expr::Infix(InfixExpr {
            span: left.span().merge(right.span()),
            left: Box::new(left),
            op,
            right: Box::new(right),
        }))
    }

    /// `PRINT expression`
    pub fn print(&mut self) -> ParseResult<Expr> {
        let print = self.parser.match_kind(TokenKind::Print)?;
        let value = self.expression()?;
        Ok(Expr::Print(PrintExpr {
            span: print.span.merge(value.span()),
            value: Box::new(value),
        }))
    }

    fn maybe_infix(&mut self, left: Expr) -> ParseResult<Expr> {
        match self.parser.peek()? {
            Some(op) if op.is_infix_operator() => self.infix(left, op),
            _ => Ok(left),
        }
    }
}

impl<'src> Grammar<'src> for BasicParser<'src> {
    type Root = NumberedLine;

    fn parser(&mut self) -> &mut Parser<'src> {
        &mut self.parser
    }

    /// `INTEGER expression`
    fn root(&mut self) -> ParseResult<NumberedLine> {
        let token = self.parser.match_kind(TokenKind::Integer)?;
        let number = token
            .lexeme
            .parse::<u32>()
            .map_err(|_| SyntaxError::IntegerOutOfRange {
                text: token.lexeme.clone(),
                span: token.span,
            })?;
        let statement = self.expression()?;
        Ok(NumberedLine { number, statement })
    }
}
