//! Grammar of the function-definition dialect
//!
//! ```text
//! root       = funcdef | funccall
//! funcdef    = DEF NAME LPAREN params RPAREN COLON
//! funccall   = NAME LPAREN params RPAREN
//! params     = [expression (COMMA expression)*]
//! expression = (NAME | INTEGER) [PLUS expression]
//! ```
//!
//! `PLUS` chains are right-recursive, so `a + b + c` parses as `a + (b + c)`.

use super::{integer_value, Grammar, ParseResult, Parser};
use crate::ast::{AddExpr, Expr, FuncCall, FuncDef, IntExpr, NameExpr, Parameters};
use crate::dialect::Dialect;
use crate::span::Span;
use crate::token::{Token, TokenKind};

pub struct FuncParser<'src> {
    parser: Parser<'src>,
}

impl<'src> FuncParser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            parser: Parser::new(Dialect::Funcs.scanner(source)),
        }
    }

    /// `DEF NAME LPAREN params RPAREN COLON`; the body is not parsed
    pub fn function_definition(&mut self) -> ParseResult<Expr> {
        let def = self.parser.match_kind(TokenKind::Def)?;
        let name = self.parser.match_kind(TokenKind::Name)?;
        self.parser.match_kind(TokenKind::LParen)?;
        let parameters = self.parameters()?;
        self.parser.skip(&[TokenKind::RParen, TokenKind::Colon])?;
        Ok(Expr::FuncDef(FuncDef {
            name: name.lexeme,
            parameters,
            span: Span::new(def.span.start, self.parser.last_end()),
        }))
    }

    /// Comma-separated expressions up to (not including) RPAREN
    pub fn parameters(&mut self) -> ParseResult<Parameters> {
        let mut items = Vec::new();
        while !self.parser.check(TokenKind::RParen)? {
            items.push(self.expression()?);
            if !self.parser.check(TokenKind::RParen)? {
                self.parser.skip(&[TokenKind::Comma])?;
            }
        }
        Ok(Parameters { items })
    }

    /// Call of `name`, whose NAME token is already consumed
    pub fn function_call(&mut self, name: Token) -> ParseResult<Expr> {
        self.parser.match_kind(TokenKind::LParen)?;
        let arguments = self.parameters()?;
        let rparen = self.parser.match_kind(TokenKind::RParen)?;
        Ok(Expr::FuncCall(FuncCall {
            span: name.span.merge(rparen.span),
            name: name.lexeme,
            arguments,
        }))
    }

    pub fn expression(&mut self) -> ParseResult<Expr> {
        self.parser.enter()?;
        let expr = self.nested_expression();
        self.parser.leave();
        expr
    }

    fn nested_expression(&mut self) -> ParseResult<Expr> {
        let left = match self.parser.peek()? {
            Some(TokenKind::Name) => {
                let token = self.parser.match_kind(TokenKind::Name)?;
                Expr::Name(NameExpr {
                    identifier: token.lexeme,
                    span: token.span,
                })
            }
            Some(TokenKind::Integer) => {
                let token = self.parser.match_kind(TokenKind::Integer)?;
                Expr::Int(IntExpr {
                    value: integer_value(&token)?,
                    span: token.span,
                })
            }
            _ => return Err(self.parser.no_production("expression")),
        };

        if self.parser.check(TokenKind::Plus)? {
            self.plus(left)
        } else {
            Ok(left)
        }
    }

    /// `left PLUS expression`
    pub fn plus(&mut self, left: Expr) -> ParseResult<Expr> {
        self.parser.match_kind(TokenKind::Plus)?;
        let right = self.expression()?;
        Ok(Expr::Add(AddExpr {
            span: left.span().merge(right.span()),
            left: Box::new(left),
            right: Box::new(right),
        }))
    }
}

impl<'src> Grammar<'src> for FuncParser<'src> {
    type Root = Expr;

    fn parser(&mut self) -> &mut Parser<'src> {
        &mut self.parser
    }

    fn root(&mut self) -> ParseResult<Expr> {
        match self.parser.peek()? {
            Some(TokenKind::Def) => self.function_definition(),
            Some(TokenKind::Name) => {
                let name = self.parser.match_kind(TokenKind::Name)?;
                if self.parser.check(TokenKind::LParen)? {
                    self.function_call(name)
                } else {
                    Err(self.parser.no_production("root"))
                }
            }
            _ => Err(self.parser.no_production("root")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PunyError, SyntaxError};

    fn parse(source: &str) -> ParseResult<Vec<Expr>> {
        FuncParser::new(source).parse()
    }

    #[test]
    fn test_call_with_integer_arguments() {
        let roots = parse("add(1, 2)").unwrap();
        assert_eq!(roots.len(), 1);
        let Expr::FuncCall(call) = &roots[0] else {
            panic!("Expected a call, got {:?}", roots[0]);
        };
        assert_eq!(call.name, "add");
        assert_eq!(call.span, Span::new(0, 9));
        let values: Vec<_> = call
            .arguments
            .items
            .iter()
            .map(|e| match e {
                Expr::Int(i) => i.value,
                other => panic!("Expected integer, got {:?}", other),
            })
            .collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_definition_span_covers_colon() {
        let roots = parse("def f():").unwrap();
        let Expr::FuncDef(def) = &roots[0] else {
            panic!("Expected a definition");
        };
        assert_eq!(def.span, Span::new(0, 8));
        assert!(def.parameters.is_empty());
    }

    #[test]
    fn test_plus_is_right_recursive() {
        let roots = parse("f(1 + 2 + 3)").unwrap();
        let Expr::FuncCall(call) = &roots[0] else {
            panic!("Expected a call");
        };
        let Expr::Add(outer) = &call.arguments.items[0] else {
            panic!("Expected addition");
        };
        assert!(matches!(*outer.left, Expr::Int(IntExpr { value: 1, .. })));
        assert!(matches!(*outer.right, Expr::Add(_)));
    }

    #[test]
    fn test_bare_name_is_not_a_root() {
        let err = parse("add 1").unwrap_err();
        assert!(matches!(
            err,
            PunyError::Syntax(SyntaxError::NoProduction {
                rule: "root",
                found: Some(TokenKind::Integer),
                ..
            })
        ));
    }

    #[test]
    fn test_missing_comma() {
        let err = parse("add(1 2)").unwrap_err();
        assert!(matches!(
            err,
            PunyError::Syntax(SyntaxError::UnexpectedToken {
                expected: TokenKind::Comma,
                found: TokenKind::Integer,
                ..
            })
        ));
    }

    #[test]
    fn test_plus_chain_past_nesting_limit() {
        let source = format!("f(1{})", " + 1".repeat(1000));
        let err = parse(&source).unwrap_err();
        assert!(matches!(
            err,
            PunyError::Syntax(SyntaxError::NestingTooDeep { .. })
        ));
        assert_eq!(err.code(), "PN1006");
    }

    #[test]
    fn test_each_argument_starts_at_depth_zero() {
        let argument = format!("1{}", " + 1".repeat(200));
        let source = format!("f({}, {})", argument, argument);
        assert_eq!(parse(&source).unwrap().len(), 1);
    }

    #[test]
    fn test_multiple_roots_across_lines() {
        let roots = parse("def add(a, b):\nadd(1, 2)\n").unwrap();
        assert_eq!(roots.len(), 2);
        assert!(matches!(roots[0], Expr::FuncDef(_)));
        assert!(matches!(roots[1], Expr::FuncCall(_)));
    }
}
