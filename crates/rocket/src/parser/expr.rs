use std::rc::Rc;

use super::{Expr, Parser};
use crate::error::RocketError;
use crate::token::{Pos, TokenKind};

impl Parser {
    /// `expr := postfix` — there is no operator precedence in this grammar;
    /// arithmetic, comparison, and logic are all ordinary calls.
    pub(super) fn parse_expr(&mut self) -> Result<Expr, RocketError> {
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, RocketError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    let pos = self.pos();
                    self.advance();
                    let (name, _) = self.eat_ident()?;
                    expr = Expr::Attr(Box::new(expr), name, pos);
                }
                TokenKind::LBracket => {
                    let pos = self.pos();
                    self.advance();
                    let key = self.parse_expr()?;
                    self.eat(&TokenKind::RBracket)?;
                    expr = Expr::Index(Box::new(expr), Box::new(key), pos);
                }
                TokenKind::LParen => {
                    let pos = self.pos();
                    self.advance();
                    let args = self.parse_args()?;
                    self.eat(&TokenKind::RParen)?;
                    expr = Expr::Call(Box::new(expr), args, pos);
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, RocketError> {
        let mut args = Vec::new();
        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }
        args.push(self.parse_expr()?);
        while self.check(&TokenKind::Comma) {
            self.advance();
            if self.check(&TokenKind::RParen) {
                break;
            }
            args.push(self.parse_expr()?);
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, RocketError> {
        let pos = self.pos();
        match self.peek_kind().clone() {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Expr::Int(n, pos))
            }
            TokenKind::Float(n) => {
                self.advance();
                Ok(Expr::Float(n, pos))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Str(Rc::from(s.as_str()), pos))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expr::Null(pos))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool(true, pos))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool(false, pos))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Name(Rc::from(name.as_str()), pos))
            }
            TokenKind::LBracket => self.parse_list_lit(pos),
            TokenKind::LBrace => self.parse_dict_lit(pos),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.eat(&TokenKind::RParen)?;
                Ok(inner)
            }
            other => Err(RocketError::parse(format!("unexpected token {}", other.describe()), pos)),
        }
    }

    fn parse_list_lit(&mut self, pos: Pos) -> Result<Expr, RocketError> {
        self.eat(&TokenKind::LBracket)?;
        let mut elems = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            elems.push(self.parse_expr()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.eat(&TokenKind::RBracket)?;
        Ok(Expr::List(elems, pos))
    }

    fn parse_dict_lit(&mut self, pos: Pos) -> Result<Expr, RocketError> {
        self.eat(&TokenKind::LBrace)?;
        let mut pairs = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let key = self.parse_expr()?;
            self.eat(&TokenKind::Colon)?;
            let value = self.parse_expr()?;
            pairs.push((key, value));
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.eat(&TokenKind::RBrace)?;
        Ok(Expr::Dict(pairs, pos))
    }
}
