use crate::error::RocketError;
use crate::token::{Pos, Token, TokenKind};

/// Converts Rocket source text into a token stream.
///
/// Single pass, one character of lookahead. Non-ASCII bytes are only valid
/// inside string literals; everywhere else they are a lex error.
pub struct Lexer {
    chars: Vec<char>,
    idx: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(src: &str) -> Self {
        Self { chars: src.chars().collect(), idx: 0, line: 1, column: 1 }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, RocketError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments()?;
            let pos = self.pos();
            let Some(c) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, pos));
                break;
            };

            let kind = if c.is_ascii_digit() {
                self.lex_number()?
            } else if c == '"' {
                self.lex_string()?
            } else if is_ident_start(c) {
                self.lex_ident_or_keyword()
            } else {
                self.lex_punct()?
            };
            tokens.push(Token::new(kind, pos));
        }
        Ok(tokens)
    }

    fn pos(&self) -> Pos {
        Pos::new(self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.idx + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.idx += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), RocketError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let start = self.pos();
                    self.advance();
                    self.advance();
                    let mut closed = false;
                    while let Some(c) = self.peek() {
                        if c == '*' && self.peek_at(1) == Some('/') {
                            self.advance();
                            self.advance();
                            closed = true;
                            break;
                        }
                        self.advance();
                    }
                    if !closed {
                        return Err(RocketError::lex("unterminated block comment", start));
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn lex_number(&mut self) -> Result<TokenKind, RocketError> {
        let start_pos = self.pos();
        let start = self.idx;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        let mut is_float = false;
        if self.peek() == Some('.') && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text: String = self.chars[start..self.idx].iter().collect();
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| RocketError::lex(format!("invalid float literal `{text}`"), start_pos))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| RocketError::lex(format!("invalid integer literal `{text}`"), start_pos))
        }
    }

    fn lex_string(&mut self) -> Result<TokenKind, RocketError> {
        let start_pos = self.pos();
        self.advance(); // opening quote
        let mut out = String::new();
        loop {
            match self.advance() {
                None => return Err(RocketError::lex("unterminated string literal", start_pos)),
                Some('"') => break,
                Some('\\') => {
                    let esc_pos = self.pos();
                    match self.advance() {
                        Some('n') => out.push('\n'),
                        Some('t') => out.push('\t'),
                        Some('r') => out.push('\r'),
                        Some('\\') => out.push('\\'),
                        Some('"') => out.push('"'),
                        Some('0') => out.push('\0'),
                        _ => return Err(RocketError::lex("invalid escape sequence", esc_pos)),
                    }
                }
                Some(c) => out.push(c),
            }
        }
        Ok(TokenKind::Str(out))
    }

    fn lex_ident_or_keyword(&mut self) -> TokenKind {
        let start = self.idx;
        while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
            self.advance();
        }
        let text: String = self.chars[start..self.idx].iter().collect();
        TokenKind::keyword(&text).unwrap_or(TokenKind::Ident(text))
    }

    fn lex_punct(&mut self) -> Result<TokenKind, RocketError> {
        let pos = self.pos();
        let c = self.advance().expect("peeked Some above");
        Ok(match c {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semi,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            '=' => TokenKind::Assign,
            other => return Err(RocketError::lex(format!("unexpected character `{other}`"), pos)),
        })
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience wrapper mirroring `Lexer::new(src).tokenize()`.
pub fn lex(src: &str) -> Result<Vec<Token>, RocketError> {
    Lexer::new(src).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn integer_and_float_literals() {
        assert_eq!(kinds("42 3.5"), vec![TokenKind::Int(42), TokenKind::Float(3.5), TokenKind::Eof]);
    }

    #[test]
    fn keywords_vs_identifiers() {
        assert_eq!(kinds("let x"), vec![TokenKind::Let, TokenKind::Ident("x".into()), TokenKind::Eof]);
    }

    #[test]
    fn string_with_escapes() {
        assert_eq!(kinds(r#""a\nb""#), vec![TokenKind::Str("a\nb".into()), TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string_is_lex_error() {
        assert!(lex("\"abc").is_err());
    }

    #[test]
    fn line_comment_is_skipped() {
        assert_eq!(kinds("1 // comment\n2"), vec![TokenKind::Int(1), TokenKind::Int(2), TokenKind::Eof]);
    }

    #[test]
    fn block_comment_is_skipped() {
        assert_eq!(kinds("1 /* c */ 2"), vec![TokenKind::Int(1), TokenKind::Int(2), TokenKind::Eof]);
    }

    #[test]
    fn unterminated_block_comment_is_lex_error() {
        assert!(lex("1 /* oops").is_err());
    }

    #[test]
    fn positions_are_monotonic() {
        let tokens = lex("let x = 1;\nlet y = 2;").unwrap();
        let mut last = (0u32, 0u32);
        for tok in &tokens {
            let cur = (tok.pos.line, tok.pos.column);
            assert!(cur >= last, "positions must be non-decreasing: {last:?} -> {cur:?}");
            last = cur;
        }
    }

    #[test]
    fn unknown_character_is_lex_error() {
        assert!(lex("let x = 1 $ 2;").is_err());
    }
}
