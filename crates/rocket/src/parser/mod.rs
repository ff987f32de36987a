mod ast;
mod expr;
mod stmt;

pub use ast::{AssignTarget, Expr, Program, Stmt};

use std::rc::Rc;

use crate::error::RocketError;
use crate::token::{Pos, Token, TokenKind};

/// Recursive-descent parser with one token of lookahead.
pub struct Parser {
    tokens: Vec<Token>,
    idx: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, idx: 0 }
    }

    pub fn parse_program(mut self) -> Result<Program, RocketError> {
        let mut stmts = Vec::new();
        while !self.at_eof() {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.idx]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn pos(&self) -> Pos {
        self.peek().pos
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.idx].clone();
        if self.idx + 1 < self.tokens.len() {
            self.idx += 1;
        }
        tok
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> Result<Token, RocketError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(RocketError::parse(
                format!("expected {}, found {}", kind.describe(), self.peek_kind().describe()),
                self.pos(),
            ))
        }
    }

    fn eat_ident(&mut self) -> Result<(Rc<str>, Pos), RocketError> {
        let pos = self.pos();
        match self.advance().kind {
            TokenKind::Ident(name) => Ok((Rc::from(name.as_str()), pos)),
            other => Err(RocketError::parse(format!("expected identifier, found {}", other.describe()), pos)),
        }
    }
}

/// Scans top-level statements for function declarations, for the hoisting
/// pre-pass (spec §4.2). Nested declarations are intentionally not visited.
pub fn hoisted_functions(program: &Program) -> Vec<(Rc<str>, Vec<Rc<str>>, Rc<[Stmt]>, Pos)> {
    program
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::FnDecl(name, params, body, pos) => Some((name.clone(), params.clone(), body.clone(), *pos)),
            _ => None,
        })
        .collect()
}

/// Convenience wrapper mirroring `Parser::new(tokens).parse_program()`.
pub fn parse(tokens: Vec<Token>) -> Result<Program, RocketError> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn parse_src(src: &str) -> Program {
        parse(lex(src).unwrap()).unwrap()
    }

    #[test]
    fn let_and_call_statement() {
        let program = parse_src("let x = 1; print(x);");
        assert_eq!(program.len(), 2);
        assert!(matches!(program[0], Stmt::Let(..)));
        assert!(matches!(program[1], Stmt::ExprStmt(Expr::Call(..))));
    }

    #[test]
    fn if_else_chain() {
        let program = parse_src("if (x) { print(1); } else if (y) { print(2); } else { print(3); }");
        assert_eq!(program.len(), 1);
        assert!(matches!(program[0], Stmt::If(_, _, Some(_))));
    }

    #[test]
    fn for_of_vs_c_style_for() {
        let program = parse_src("for (let i of xs) { print(i); } for (let i = 0; lt(i, 3); i) {}");
        assert!(matches!(program[0], Stmt::ForOf(..)));
        assert!(matches!(program[1], Stmt::CFor(..)));
    }

    #[test]
    fn assignment_to_index_target() {
        let program = parse_src("a[0] = 1;");
        assert!(matches!(program[0], Stmt::Assign(AssignTarget::Index(..), ..)));
    }

    #[test]
    fn bare_name_assignment_is_parse_error() {
        assert!(parse(lex("x = 1;").unwrap()).is_err());
    }

    #[test]
    fn hoisting_collects_only_top_level_fn_decls() {
        let program = parse_src("fn a(){} let x = 1; fn b(n){ fn c(){} return n; }");
        let hoisted = hoisted_functions(&program);
        assert_eq!(hoisted.len(), 2);
        assert_eq!(&*hoisted[0].0, "a");
        assert_eq!(&*hoisted[1].0, "b");
    }
}
