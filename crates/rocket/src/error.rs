use std::fmt;

use strum::{Display, EnumString};

use crate::token::Pos;

/// The closed set of failure categories a Rocket program can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ErrorKind {
    LexError,
    ParseError,
    NameError,
    ArityError,
    TypeError,
    IndexError,
    KeyError,
    AttrError,
    ValueError,
    CtrlFlowError,
}

/// A position-carrying interpreter error.
#[derive(Debug, Clone)]
pub struct RocketError {
    pub kind: ErrorKind,
    pub message: String,
    pub pos: Pos,
}

impl RocketError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, pos: Pos) -> Self {
        Self { kind, message: message.into(), pos }
    }

    pub fn lex(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(ErrorKind::LexError, message, pos)
    }

    pub fn parse(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(ErrorKind::ParseError, message, pos)
    }

    pub fn name(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(ErrorKind::NameError, message, pos)
    }

    pub fn arity(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(ErrorKind::ArityError, message, pos)
    }

    pub fn type_error(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(ErrorKind::TypeError, message, pos)
    }

    pub fn index(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(ErrorKind::IndexError, message, pos)
    }

    pub fn key(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(ErrorKind::KeyError, message, pos)
    }

    pub fn attr(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(ErrorKind::AttrError, message, pos)
    }

    pub fn value(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(ErrorKind::ValueError, message, pos)
    }

    pub fn ctrl_flow(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(ErrorKind::CtrlFlowError, message, pos)
    }
}

impl fmt::Display for RocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({}:{})", self.kind, self.message, self.pos.line, self.pos.column)
    }
}

impl std::error::Error for RocketError {}

pub type RocketResult<T> = Result<T, RocketError>;
