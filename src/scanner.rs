use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::Diagnostics;
use crate::literal::TokenLiteral;
use crate::token::{Location, Token, TokenKind};

/// Converts source text into a flat token stream. Scanning never stops
/// at the first bad character; it records the problem in `Diagnostics`
/// and keeps going, so a single run can report several lexical errors.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    start_column: usize,
    current_column: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: Vec::new(),
            start_column: 0,
            current_column: 0,
            line: 1,
        }
    }

    pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        while !self.is_at_end() {
            self.start_column = self.current_column;
            self.scan_token(diagnostics);
        }

        self.tokens.push(Token::new(TokenKind::Eof, String::new(), None, Location::new(self.line, self.current_column)));
        self.tokens
    }

    fn advance(&mut self) -> char {
        let c = self.source.next().expect("advance is only called when a character is known to be available");
        self.current_column += 1;
        c
    }

    fn peek(&mut self) -> char {
        self.source.peek().copied().unwrap_or('\0')
    }

    fn peek_next(&mut self) -> char {
        self.source.peek_next().copied().unwrap_or('\0')
    }

    fn match_next(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.start_column)
    }

    fn add_token(&mut self, kind: TokenKind, lexeme: String, literal: Option<TokenLiteral>) {
        let location = self.location();
        self.tokens.push(Token::new(kind, lexeme, literal, location));
    }

    /// `scan_token` has already consumed the opening quote.
    fn string(&mut self, diagnostics: &mut Diagnostics) {
        let start = self.location();

        let mut value = String::new();
        while self.peek() != '"' && !self.is_at_end() {
            let c = self.advance();
            if c == '\n' {
                self.line += 1;
                self.current_column = 0;
            }
            value.push(c);
        }

        if self.is_at_end() {
            diagnostics.scan_error(start, "Unterminated string.");
            return;
        }

        self.advance(); // closing quote
        self.add_token(TokenKind::String, value.clone(), Some(TokenLiteral::String(value)));
    }

    /// `scan_token` has already consumed `first`.
    fn number_from(&mut self, first: char) {
        let mut value = String::from(first);

        while self.peek().is_ascii_digit() {
            value.push(self.advance());
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            value.push(self.advance()); // the dot
            while self.peek().is_ascii_digit() {
                value.push(self.advance());
            }
        }

        let parsed: f64 = value.parse().expect("value is built only from digits and at most one dot");
        self.add_token(TokenKind::Number, value, Some(TokenLiteral::Number(parsed)));
    }

    /// `scan_token` has already consumed `first`.
    fn identifier_from(&mut self, first: char) {
        let mut value = String::from(first);

        while self.peek().is_alphanumeric() || self.peek() == '_' {
            value.push(self.advance());
        }

        let kind = match value.as_str() {
            "and" => TokenKind::And,
            "class" => TokenKind::Class,
            "else" => TokenKind::Else,
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "fun" => TokenKind::Fun,
            "if" => TokenKind::If,
            "nil" => TokenKind::Nil,
            "or" => TokenKind::Or,
            "print" => TokenKind::Print,
            "return" => TokenKind::Return,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "super" => TokenKind::Super,
            "this" => TokenKind::This,
            "true" => TokenKind::True,
            "var" => TokenKind::Var,
            "while" => TokenKind::While,
            _ => TokenKind::Identifier,
        };

        self.add_token(kind, value, None);
    }

    /// Consumes a `/* ... */` block comment. Nesting is not supported;
    /// the first `*/` closes the comment regardless of how many `/*`
    /// preceded it, but newlines inside it still advance the line
    /// counter so later error locations stay accurate.
    fn block_comment(&mut self, diagnostics: &mut Diagnostics) {
        let start = self.location();

        loop {
            if self.is_at_end() {
                diagnostics.scan_error(start, "Unterminated block comment.");
                return;
            }

            let c = self.advance();
            if c == '\n' {
                self.line += 1;
                self.current_column = 0;
            } else if c == '*' && self.peek() == '/' {
                self.advance();
                return;
            }
        }
    }

    fn scan_token(&mut self, diagnostics: &mut Diagnostics) {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenKind::LeftParen, c.to_string(), None),
            ')' => self.add_token(TokenKind::RightParen, c.to_string(), None),
            '{' => self.add_token(TokenKind::LeftBrace, c.to_string(), None),
            '}' => self.add_token(TokenKind::RightBrace, c.to_string(), None),
            ',' => self.add_token(TokenKind::Comma, c.to_string(), None),
            '.' => self.add_token(TokenKind::Dot, c.to_string(), None),
            '-' => self.add_token(TokenKind::Minus, c.to_string(), None),
            '+' => self.add_token(TokenKind::Plus, c.to_string(), None),
            ';' => self.add_token(TokenKind::Semicolon, c.to_string(), None),
            '*' => self.add_token(TokenKind::Star, c.to_string(), None),
            '%' => self.add_token(TokenKind::Percent, c.to_string(), None),
            '?' => self.add_token(TokenKind::Question, c.to_string(), None),
            ':' => self.add_token(TokenKind::Colon, c.to_string(), None),

            '!' => {
                if self.match_next('=') {
                    self.add_token(TokenKind::BangEqual, "!=".to_string(), None);
                } else {
                    self.add_token(TokenKind::Bang, c.to_string(), None);
                }
            }
            '=' => {
                if self.match_next('=') {
                    self.add_token(TokenKind::EqualEqual, "==".to_string(), None);
                } else {
                    self.add_token(TokenKind::Equal, c.to_string(), None);
                }
            }
            '<' => {
                if self.match_next('=') {
                    self.add_token(TokenKind::LessEqual, "<=".to_string(), None);
                } else {
                    self.add_token(TokenKind::Less, c.to_string(), None);
                }
            }
            '>' => {
                if self.match_next('=') {
                    self.add_token(TokenKind::GreaterEqual, ">=".to_string(), None);
                } else {
                    self.add_token(TokenKind::Greater, c.to_string(), None);
                }
            }
            '/' => {
                if self.match_next('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.match_next('*') {
                    self.block_comment(diagnostics);
                } else {
                    self.add_token(TokenKind::Slash, c.to_string(), None);
                }
            }

            ' ' | '\r' | '\t' => {}

            '\n' => {
                self.line += 1;
                self.current_column = 0;
            }

            '"' => self.string(diagnostics),

            c if c.is_ascii_digit() => self.number_from(c),

            c if c.is_alphabetic() || c == '_' => self.identifier_from(c),

            _ => diagnostics.scan_error(self.location(), format!("Unexpected character '{c}'.")),
        }
    }
}
