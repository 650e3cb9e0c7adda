/**
 * Expression Lexer
 *
 * Tokenizes template expressions for the recursive descent parser
 */

use serde::{Deserialize, Serialize};

use crate::chars;

/// Token types in template expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TokenType {
    Character = 0,
    Identifier = 1,
    Keyword = 2,
    String = 3,
    Operator = 4,
    Number = 5,
    Error = 6,
}

/// Token representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub index: usize,
    pub end: usize,
    pub token_type: TokenType,
    pub num_value: f64,
    pub str_value: String,
}

impl Token {
    pub fn new(
        index: usize,
        end: usize,
        token_type: TokenType,
        num_value: f64,
        str_value: String,
    ) -> Self {
        Token {
            index,
            end,
            token_type,
            num_value,
            str_value,
        }
    }

    pub fn operator(index: usize, end: usize, str_value: &str) -> Self {
        Token::new(index, end, TokenType::Operator, 0.0, str_value.to_string())
    }

    pub fn is_character(&self, code: char) -> bool {
        self.token_type == TokenType::Character && self.str_value.chars().next() == Some(code)
    }

    pub fn is_number(&self) -> bool {
        self.token_type == TokenType::Number
    }

    pub fn is_string(&self) -> bool {
        self.token_type == TokenType::String
    }

    pub fn is_identifier(&self) -> bool {
        self.token_type == TokenType::Identifier
    }

    pub fn is_keyword(&self) -> bool {
        self.token_type == TokenType::Keyword
    }

    pub fn is_keyword_named(&self, name: &str) -> bool {
        self.token_type == TokenType::Keyword && self.str_value == name
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.token_type == TokenType::Operator && self.str_value == operator
    }

    pub fn is_error(&self) -> bool {
        self.token_type == TokenType::Error
    }
}

/// Reserved words. The four scope roles are keywords so they can never be
/// shadowed or mistaken for free identifiers.
const KEYWORDS: &[&str] = &[
    "null", "undefined", "true", "false", "in", "this", "self", "parent", "root",
];

/// Expression lexer
#[derive(Debug, Default, Clone, Copy)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Lexer
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        Scanner::new(text).scan()
    }
}

/// Scanner for tokenizing input
struct Scanner<'a> {
    input: &'a str,
    length: usize,
    index: usize,
    peek: char,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        let peek = input.chars().next().unwrap_or(chars::EOF);
        Scanner {
            input,
            length: input.len(),
            index: 0,
            peek,
        }
    }

    fn scan(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.scan_token() {
            let is_error = token.is_error();
            tokens.push(token);
            if is_error {
                break;
            }
        }
        tokens
    }

    fn advance(&mut self) {
        self.index += self.peek.len_utf8();
        self.peek = if self.index < self.length {
            self.input[self.index..].chars().next().unwrap_or(chars::EOF)
        } else {
            chars::EOF
        };
    }

    fn scan_token(&mut self) -> Option<Token> {
        while self.index < self.length && chars::is_whitespace(self.peek) {
            self.advance();
        }

        if self.index >= self.length {
            return None;
        }

        let start = self.index;
        let ch = self.peek;

        if chars::is_identifier_start(ch) {
            return Some(self.scan_identifier());
        }

        if chars::is_digit(ch) {
            return Some(self.scan_number(start));
        }

        let token = match ch {
            chars::PERIOD => {
                self.advance();
                if chars::is_digit(self.peek) {
                    return Some(self.scan_number(start));
                }
                Token::new(
                    start,
                    self.index,
                    TokenType::Character,
                    chars::PERIOD as u32 as f64,
                    chars::PERIOD.to_string(),
                )
            }
            chars::LPAREN
            | chars::RPAREN
            | chars::LBRACKET
            | chars::RBRACKET
            | chars::LBRACE
            | chars::RBRACE
            | chars::COMMA
            | chars::COLON
            | chars::SEMICOLON => self.scan_character(start, ch),
            chars::SQ | chars::DQ => self.scan_string(ch),
            chars::PLUS | chars::MINUS | chars::STAR | chars::SLASH | chars::PERCENT => {
                self.advance();
                Token::operator(start, self.index, &ch.to_string())
            }
            chars::LT | chars::GT => {
                self.advance();
                if self.peek == chars::EQ {
                    self.advance();
                    return Some(Token::operator(start, self.index, &format!("{}=", ch)));
                }
                Token::operator(start, self.index, &ch.to_string())
            }
            chars::BANG | chars::EQ => {
                self.advance();
                if self.peek == chars::EQ {
                    self.advance();
                    if self.peek == chars::EQ {
                        self.advance();
                        return Some(Token::operator(start, self.index, &format!("{}==", ch)));
                    }
                    return Some(Token::operator(start, self.index, &format!("{}=", ch)));
                }
                Token::operator(start, self.index, &ch.to_string())
            }
            chars::AMPERSAND => self.scan_double_operator(start, chars::AMPERSAND, "&&"),
            chars::BAR => self.scan_double_operator(start, chars::BAR, "||"),
            chars::QUESTION => {
                self.advance();
                if self.peek == chars::QUESTION {
                    self.advance();
                    return Some(Token::operator(start, self.index, "??"));
                }
                Token::operator(start, self.index, "?")
            }
            _ => {
                self.advance();
                self.error(
                    start,
                    format!("Unexpected character [{}] at column {}", ch, start),
                )
            }
        };
        Some(token)
    }

    fn error(&self, start: usize, message: String) -> Token {
        Token::new(start, self.index, TokenType::Error, 0.0, message)
    }

    fn scan_character(&mut self, start: usize, ch: char) -> Token {
        self.advance();
        Token::new(
            start,
            self.index,
            TokenType::Character,
            ch as u32 as f64,
            ch.to_string(),
        )
    }

    /// `&&` and `||`; the single-character forms are not part of the language.
    fn scan_double_operator(&mut self, start: usize, ch: char, operator: &str) -> Token {
        self.advance();
        if self.peek == ch {
            self.advance();
            return Token::operator(start, self.index, operator);
        }
        self.error(
            start,
            format!("Unexpected character [{}] at column {}", ch, start),
        )
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.index;
        self.advance();

        while self.index < self.length && chars::is_identifier_part(self.peek) {
            self.advance();
        }

        let str_value = self.input[start..self.index].to_string();
        let token_type = if KEYWORDS.contains(&str_value.as_str()) {
            TokenType::Keyword
        } else {
            TokenType::Identifier
        };

        Token::new(start, self.index, token_type, 0.0, str_value)
    }

    fn scan_number(&mut self, start: usize) -> Token {
        // A leading period was already consumed by the caller
        let mut simple = self.index == start;
        self.advance();
        loop {
            if chars::is_digit(self.peek) {
                // keep going
            } else if self.peek == chars::PERIOD {
                simple = false;
            } else if self.peek == 'e' || self.peek == 'E' {
                self.advance();
                if self.peek == chars::PLUS || self.peek == chars::MINUS {
                    self.advance();
                }
                if !chars::is_digit(self.peek) {
                    return self.error(start, "Invalid exponent".to_string());
                }
                simple = false;
            } else {
                break;
            }
            self.advance();
        }

        let text = &self.input[start..self.index];
        let value = if simple {
            text.parse::<i64>().map(|n| n as f64).ok()
        } else {
            text.parse::<f64>().ok()
        };
        match value {
            Some(n) => Token::new(start, self.index, TokenType::Number, n, String::new()),
            None => self.error(start, format!("Invalid number [{}]", text)),
        }
    }

    fn scan_string(&mut self, quote: char) -> Token {
        let start = self.index;
        self.advance(); // opening quote

        let mut buffer = String::new();
        loop {
            if self.index >= self.length {
                return self.error(start, "Unterminated quote".to_string());
            }
            let ch = self.peek;
            if ch == quote {
                self.advance();
                break;
            }
            if ch == chars::BACKSLASH {
                self.advance();
                let escaped = match self.peek {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    'u' => {
                        let hex_start = self.index + 1;
                        let hex_end = hex_start + 4;
                        let code = self
                            .input
                            .get(hex_start..hex_end)
                            .filter(|hex| hex.chars().all(chars::is_ascii_hex_digit))
                            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                            .and_then(char::from_u32);
                        match code {
                            Some(c) => {
                                for _ in 0..4 {
                                    self.advance();
                                }
                                c
                            }
                            None => {
                                return self.error(start, "Invalid unicode escape".to_string())
                            }
                        }
                    }
                    other => other,
                };
                buffer.push(escaped);
                self.advance();
                continue;
            }
            buffer.push(ch);
            self.advance();
        }

        Token::new(start, self.index, TokenType::String, 0.0, buffer)
    }
}
