//! Core lexer implementation.
//!
//! Converts Tascal source text into a finite stream of [`Token`]s, recording
//! lexical diagnostics along the way instead of aborting.

use tascal_util::{Diagnostics, Line};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    diagnostics: &'a mut Diagnostics,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            cursor: Cursor::new(source),
            diagnostics,
        }
    }

    /// Scans the whole input to completion, returning every token it could
    /// produce including a trailing [`TokenKind::Eof`]. Errors are recorded
    /// on the shared [`Diagnostics`], never surfaced as a `Result`: a lexer
    /// never aborts a scan.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return tokens;
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current() {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.cursor.advance();
                }
                b'{' => {
                    let start_line = Line(self.cursor.line());
                    self.cursor.advance();
                    while !self.cursor.is_at_end() && self.cursor.current() != b'}' {
                        self.cursor.advance();
                    }
                    if self.cursor.current() == b'}' {
                        self.cursor.advance();
                    }
                    self.diagnostics.lexical(format_args!(
                        "comments not allowed (line {start_line})"
                    ));
                }
                _ => return,
            }
        }
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.scan_one() {
                return token;
            }
        }
    }

    /// Scans one token, or `None` if it only consumed an illegal character
    /// and reported a diagnostic — the caller loops to try again.
    fn scan_one(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();

        let line = Line(self.cursor.line());
        if self.cursor.is_at_end() {
            return Some(Token::eof(line));
        }

        let c = self.cursor.current();
        Some(match c {
            b'(' => self.single(TokenKind::LParen, line),
            b')' => self.single(TokenKind::RParen, line),
            b';' => self.single(TokenKind::Semicolon, line),
            b'=' => self.single(TokenKind::Eq, line),
            b'+' => self.single(TokenKind::Plus, line),
            b'-' => self.single(TokenKind::Minus, line),
            b'*' => self.single(TokenKind::Star, line),
            b',' => self.single(TokenKind::Comma, line),
            b'.' => self.single(TokenKind::Dot, line),
            b'<' => {
                self.cursor.advance();
                match self.cursor.current() {
                    b'>' => {
                        self.cursor.advance();
                        Token::new(TokenKind::NotEq, "<>", line)
                    }
                    b'=' => {
                        self.cursor.advance();
                        Token::new(TokenKind::LessEq, "<=", line)
                    }
                    _ => Token::new(TokenKind::Less, "<", line),
                }
            }
            b'>' => {
                self.cursor.advance();
                if self.cursor.current() == b'=' {
                    self.cursor.advance();
                    Token::new(TokenKind::GreaterEq, ">=", line)
                } else {
                    Token::new(TokenKind::Greater, ">", line)
                }
            }
            b':' => {
                self.cursor.advance();
                if self.cursor.current() == b'=' {
                    self.cursor.advance();
                    Token::new(TokenKind::Assign, ":=", line)
                } else {
                    Token::new(TokenKind::Colon, ":", line)
                }
            }
            c if is_ident_start(c) => self.lex_identifier(line),
            c if c.is_ascii_digit() => self.lex_number(line),
            c => {
                self.cursor.advance();
                self.diagnostics
                    .lexical(format_args!("illegal symbol '{}' at line {line}", c as char));
                return None;
            }
        })
    }

    fn single(&mut self, kind: TokenKind, line: Line) -> Token {
        let c = self.cursor.advance();
        Token::new(kind, (c as char).to_string(), line)
    }

    fn lex_identifier(&mut self, line: Line) -> Token {
        let start = self.cursor.position();
        while is_ident_continue(self.cursor.current()) {
            self.cursor.advance();
        }
        let text = self.slice_from(start);
        match TokenKind::keyword(&text) {
            Some(kind) => Token::new(kind, text, line),
            None => Token::new(TokenKind::Ident, text, line),
        }
    }

    fn lex_number(&mut self, line: Line) -> Token {
        let start = self.cursor.position();
        while self.cursor.current().is_ascii_digit() {
            self.cursor.advance();
        }
        let text = self.slice_from(start);
        match text.parse::<i64>() {
            Ok(value) => Token::number(value, text, line),
            Err(_) => {
                self.diagnostics.lexical(format_args!(
                    "integer literal '{text}' out of range at line {line}"
                ));
                Token::number(0, text, line)
            }
        }
    }

    fn slice_from(&self, start: usize) -> String {
        self.cursor.slice(start, self.cursor.position()).to_string()
    }
}
