// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::ast::{CmpOp, Expr, Literal, Scope};
use crate::error::EvalError;
use crate::lexer::Token;

pub(crate) fn parse(tokens: &[Token]) -> Result<Expr, EvalError> {
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    if parser.pos != parser.tokens.len() {
        return Err(EvalError::Syntax("trailing tokens after expression".into()));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn parse_or(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_and()?;
        while matches!(self.peek(), Some(Token::OrOr)) {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_unary()?;
        while matches!(self.peek(), Some(Token::AndAnd)) {
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        if matches!(self.peek(), Some(Token::Bang)) {
            self.advance();
            let inner = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, EvalError> {
        let lhs = self.parse_operand()?;
        let op = match self.peek() {
            Some(Token::EqEq) => Some(CmpOp::Eq),
            Some(Token::NotEq) => Some(CmpOp::Ne),
            Some(Token::Lt) => Some(CmpOp::Lt),
            Some(Token::LtEq) => Some(CmpOp::Le),
            Some(Token::Gt) => Some(CmpOp::Gt),
            Some(Token::GtEq) => Some(CmpOp::Ge),
            _ => None,
        };
        let Some(op) = op else {
            return Ok(lhs);
        };
        self.advance();
        let rhs = self.parse_operand()?;
        Ok(Expr::Compare(op, Box::new(lhs), Box::new(rhs)))
    }

    fn parse_operand(&mut self) -> Result<Expr, EvalError> {
        match self.advance().cloned() {
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(EvalError::Syntax("expected closing parenthesis".into())),
                }
            }
            Some(Token::True) => Ok(Expr::Literal(Literal::Bool(true))),
            Some(Token::False) => Ok(Expr::Literal(Literal::Bool(false))),
            Some(Token::Int(v)) => Ok(Expr::Literal(Literal::Int(v))),
            Some(Token::Float(v)) => Ok(Expr::Literal(Literal::Float(v))),
            Some(Token::Str(v)) => Ok(Expr::Literal(Literal::Str(v))),
            Some(Token::Ident(scope_name)) => {
                let scope = match scope_name.as_str() {
                    "subject" => Scope::Subject,
                    "object" => Scope::Object,
                    "env" => Scope::Env,
                    other => {
                        return Err(EvalError::Syntax(format!(
                            "unknown reference scope: {other}"
                        )));
                    }
                };
                match self.advance() {
                    Some(Token::Dot) => {}
                    _ => return Err(EvalError::Syntax("expected '.' after scope".into())),
                }
                match self.advance().cloned() {
                    Some(Token::Ident(name)) => Ok(Expr::Reference(scope, name)),
                    _ => Err(EvalError::Syntax("expected attribute name after '.'".into())),
                }
            }
            other => Err(EvalError::Syntax(format!("unexpected token: {other:?}"))),
        }
    }
}
