use std::rc::Rc;

use super::{AssignTarget, Expr, Parser, Stmt};
use crate::error::RocketError;
use crate::token::TokenKind;

impl Parser {
    pub(super) fn parse_stmt(&mut self) -> Result<Stmt, RocketError> {
        match self.peek_kind() {
            TokenKind::Let => self.parse_let_stmt(),
            TokenKind::Fn => self.parse_fn_decl(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break => {
                let pos = self.pos();
                self.advance();
                self.eat(&TokenKind::Semi)?;
                Ok(Stmt::Break(pos))
            }
            TokenKind::Continue => {
                let pos = self.pos();
                self.advance();
                self.eat(&TokenKind::Semi)?;
                Ok(Stmt::Continue(pos))
            }
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            _ => self.parse_expr_or_assign_stmt(),
        }
    }

    fn parse_let_stmt(&mut self) -> Result<Stmt, RocketError> {
        let pos = self.pos();
        self.eat(&TokenKind::Let)?;
        let (name, _) = self.eat_ident()?;
        self.eat(&TokenKind::Assign)?;
        let value = self.parse_expr()?;
        self.eat(&TokenKind::Semi)?;
        Ok(Stmt::Let(name, value, pos))
    }

    fn parse_fn_decl(&mut self) -> Result<Stmt, RocketError> {
        let pos = self.pos();
        self.eat(&TokenKind::Fn)?;
        let (name, _) = self.eat_ident()?;
        self.eat(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            let (p, _) = self.eat_ident()?;
            params.push(p);
            while self.check(&TokenKind::Comma) {
                self.advance();
                let (p, _) = self.eat_ident()?;
                params.push(p);
            }
        }
        self.eat(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Stmt::FnDecl(name, params, Rc::from(body), pos))
    }

    fn parse_if_stmt(&mut self) -> Result<Stmt, RocketError> {
        self.eat(&TokenKind::If)?;
        self.eat(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.eat(&TokenKind::RParen)?;
        let then_block = self.parse_block()?;
        let else_branch = if self.check(&TokenKind::Else) {
            self.advance();
            if self.check(&TokenKind::If) {
                Some(Box::new(self.parse_if_stmt()?))
            } else {
                Some(Box::new(Stmt::Block(self.parse_block()?)))
            }
        } else {
            None
        };
        Ok(Stmt::If(cond, then_block, else_branch))
    }

    fn parse_while_stmt(&mut self) -> Result<Stmt, RocketError> {
        self.eat(&TokenKind::While)?;
        self.eat(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.eat(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Stmt::While(cond, body))
    }

    fn parse_for_stmt(&mut self) -> Result<Stmt, RocketError> {
        self.eat(&TokenKind::For)?;
        self.eat(&TokenKind::LParen)?;

        if self.check(&TokenKind::Let) && self.is_for_of() {
            let pos = self.pos();
            self.advance(); // let
            let (name, _) = self.eat_ident()?;
            self.eat(&TokenKind::Of)?;
            let iterable = self.parse_expr()?;
            self.eat(&TokenKind::RParen)?;
            let body = self.parse_block()?;
            return Ok(Stmt::ForOf(name, iterable, body, pos));
        }

        let init = if self.check(&TokenKind::Semi) {
            self.advance();
            None
        } else if self.check(&TokenKind::Let) {
            Some(Box::new(self.parse_let_stmt()?))
        } else {
            Some(Box::new(self.parse_expr_or_assign_stmt()?))
        };
        let cond = if self.check(&TokenKind::Semi) { None } else { Some(self.parse_expr()?) };
        self.eat(&TokenKind::Semi)?;
        let post = if self.check(&TokenKind::RParen) { None } else { Some(self.parse_expr()?) };
        self.eat(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Stmt::CFor(init, cond, post, body))
    }

    /// Lookahead to distinguish `for (let x of it)` from `for (let x = 0; ...)`
    /// without consuming tokens: `let IDENT of` vs. anything else.
    fn is_for_of(&self) -> bool {
        let mut i = self.idx + 1; // skip 'let'
        if !matches!(self.tokens.get(i).map(|t| &t.kind), Some(TokenKind::Ident(_))) {
            return false;
        }
        i += 1;
        matches!(self.tokens.get(i).map(|t| &t.kind), Some(TokenKind::Of))
    }

    fn parse_return_stmt(&mut self) -> Result<Stmt, RocketError> {
        let pos = self.pos();
        self.eat(&TokenKind::Return)?;
        let value = if self.check(&TokenKind::Semi) { None } else { Some(self.parse_expr()?) };
        self.eat(&TokenKind::Semi)?;
        Ok(Stmt::Return(value, pos))
    }

    pub(super) fn parse_block(&mut self) -> Result<Vec<Stmt>, RocketError> {
        self.eat(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            stmts.push(self.parse_stmt()?);
        }
        self.eat(&TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_expr_or_assign_stmt(&mut self) -> Result<Stmt, RocketError> {
        let pos = self.pos();
        let expr = self.parse_expr()?;
        if self.check(&TokenKind::Assign) {
            self.advance();
            let target = match expr {
                Expr::Index(target, key, _) => AssignTarget::Index(*target, *key),
                Expr::Attr(target, name, _) => AssignTarget::Attr(*target, name),
                _ => {
                    return Err(RocketError::parse(
                        "assignment target must be a subscript or attribute",
                        pos,
                    ));
                }
            };
            let value = self.parse_expr()?;
            self.eat(&TokenKind::Semi)?;
            Ok(Stmt::Assign(target, value, pos))
        } else {
            self.eat(&TokenKind::Semi)?;
            Ok(Stmt::ExprStmt(expr))
        }
    }
}
