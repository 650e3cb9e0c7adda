//! Markup Lexer
//!
//! Splits markup into tag, attribute and text tokens. Text between a pair
//! of `EXPR_MARKER`s is copied verbatim: no tags, quotes or entities are
//! recognized inside it.

use crate::chars;
use crate::error::{CompileError, Result};
use crate::parse_util::{ParseLocation, ParseSourceSpan};

use super::tags::{get_tag_definition, TagContentType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<name`
    TagOpenStart,
    AttrName,
    AttrValue,
    /// `>`
    TagOpenEnd,
    /// `/>`
    TagOpenEndVoid,
    /// `</name>`
    TagClose,
    Text,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkupToken {
    pub kind: TokenKind,
    /// Tag name, attribute name, decoded attribute value or decoded text.
    pub value: String,
    pub source_span: ParseSourceSpan,
}

/// Tokenize a markup document.
pub fn tokenize(source: &str) -> Result<Vec<MarkupToken>> {
    let mut lexer = Lexer::new(source);
    lexer.run()?;
    Ok(lexer.tokens)
}

struct Lexer<'a> {
    input: &'a str,
    index: usize,
    tokens: Vec<MarkupToken>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            index: 0,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> char {
        self.input[self.index..].chars().next().unwrap_or(chars::EOF)
    }

    fn at_end(&self) -> bool {
        self.index >= self.input.len()
    }

    fn advance(&mut self) {
        self.index += self.peek().len_utf8();
    }

    fn starts_with(&self, text: &str) -> bool {
        self.input[self.index..].starts_with(text)
    }

    fn location(&self, offset: usize) -> ParseLocation {
        ParseLocation::from_offset(self.input, offset)
    }

    fn error(&self, message: impl Into<String>, offset: usize) -> CompileError {
        CompileError::Markup {
            message: message.into(),
            location: self.location(offset).to_string(),
        }
    }

    fn push(&mut self, kind: TokenKind, value: String, start: usize) {
        let source_span = ParseSourceSpan::new(self.location(start), self.location(self.index));
        self.tokens.push(MarkupToken {
            kind,
            value,
            source_span,
        });
    }

    fn run(&mut self) -> Result<()> {
        while !self.at_end() {
            if self.starts_with("<!--") {
                self.consume_comment()?;
            } else if self.starts_with("<!") || self.starts_with("<?") {
                self.consume_declaration()?;
            } else if self.starts_with("</") {
                self.consume_tag_close()?;
            } else if self.peek() == chars::LT {
                self.consume_tag_open()?;
            } else {
                self.consume_text()?;
            }
        }
        self.push(TokenKind::Eof, String::new(), self.index);
        Ok(())
    }

    fn consume_comment(&mut self) -> Result<()> {
        let start = self.index;
        match self.input[self.index..].find("-->") {
            Some(end) => {
                self.index += end + 3;
                Ok(())
            }
            None => Err(self.error("Unterminated comment", start)),
        }
    }

    /// `<!DOCTYPE ...>` and processing instructions are skipped.
    fn consume_declaration(&mut self) -> Result<()> {
        let start = self.index;
        match self.input[self.index..].find('>') {
            Some(end) => {
                self.index += end + 1;
                Ok(())
            }
            None => Err(self.error("Unterminated declaration", start)),
        }
    }

    fn consume_name(&mut self) -> String {
        let start = self.index;
        while !self.at_end() && chars::is_name_part(self.peek()) {
            self.advance();
        }
        self.input[start..self.index].to_string()
    }

    fn skip_whitespace(&mut self) {
        while !self.at_end() && chars::is_whitespace(self.peek()) {
            self.advance();
        }
    }

    fn consume_tag_close(&mut self) -> Result<()> {
        let start = self.index;
        self.index += 2;
        let name = self.consume_name();
        if name.is_empty() {
            return Err(self.error("Expected a tag name after '</'", start));
        }
        self.skip_whitespace();
        if self.peek() != chars::GT {
            return Err(self.error(format!("Expected '>' to close </{}", name), self.index));
        }
        self.advance();
        self.push(TokenKind::TagClose, name, start);
        Ok(())
    }

    fn consume_tag_open(&mut self) -> Result<()> {
        let start = self.index;
        self.advance();
        let name = self.consume_name();
        if name.is_empty() {
            // A lone '<' is ordinary text
            self.push(TokenKind::Text, "<".to_string(), start);
            return Ok(());
        }
        self.push(TokenKind::TagOpenStart, name.clone(), start);

        loop {
            self.skip_whitespace();
            if self.at_end() {
                return Err(self.error(format!("Unterminated tag <{}", name), start));
            }
            if self.starts_with("/>") {
                let end_start = self.index;
                self.index += 2;
                self.push(TokenKind::TagOpenEndVoid, String::new(), end_start);
                return Ok(());
            }
            if self.peek() == chars::GT {
                let end_start = self.index;
                self.advance();
                self.push(TokenKind::TagOpenEnd, String::new(), end_start);
                if get_tag_definition(&name).content_type == TagContentType::RawText {
                    self.consume_raw_text(&name)?;
                }
                return Ok(());
            }
            self.consume_attribute()?;
        }
    }

    fn consume_attribute(&mut self) -> Result<()> {
        let start = self.index;
        while !self.at_end() && is_attr_name_part(self.peek()) {
            self.advance();
        }
        if self.index == start {
            return Err(self.error(
                format!("Unexpected character '{}' in tag", self.peek()),
                start,
            ));
        }
        let name = self.input[start..self.index].to_string();
        self.push(TokenKind::AttrName, name, start);

        self.skip_whitespace();
        if self.peek() != chars::EQ {
            return Ok(());
        }
        self.advance();
        self.skip_whitespace();

        let value_start = self.index;
        let quote = self.peek();
        let value = if chars::is_quote(quote) {
            self.advance();
            let value = self.consume_until(|lexer| lexer.peek() == quote)?;
            if self.at_end() {
                return Err(self.error("Unterminated attribute value", value_start));
            }
            self.advance();
            value
        } else {
            self.consume_until(|lexer| {
                let ch = lexer.peek();
                chars::is_whitespace(ch) || ch == chars::GT || lexer.starts_with("/>")
            })?
        };
        self.push(TokenKind::AttrValue, value, value_start);
        Ok(())
    }

    fn consume_text(&mut self) -> Result<()> {
        let start = self.index;
        let value = self.consume_until(|lexer| lexer.peek() == chars::LT)?;
        self.push(TokenKind::Text, value, start);
        Ok(())
    }

    /// Everything up to `</name`, undecoded.
    fn consume_raw_text(&mut self, name: &str) -> Result<()> {
        let start = self.index;
        let closing = format!("</{}", name.to_ascii_lowercase());
        let rest = self.input[self.index..].to_ascii_lowercase();
        match rest.find(&closing) {
            Some(end) => {
                self.index += end;
                if end > 0 {
                    let text = self.input[start..self.index].to_string();
                    self.push(TokenKind::Text, text, start);
                }
                Ok(())
            }
            None => Err(self.error(format!("Unclosed <{}>", name), start)),
        }
    }

    /// Consume decoded characters until `stop` holds outside an expression
    /// or the input ends.
    fn consume_until(&mut self, stop: impl Fn(&Self) -> bool) -> Result<String> {
        let mut value = String::new();
        while !self.at_end() && !stop(self) {
            let ch = self.peek();
            if ch == chars::EXPR_MARKER {
                self.consume_expression(&mut value)?;
            } else if ch == chars::AMPERSAND {
                self.consume_entity(&mut value);
            } else {
                value.push(ch);
                self.advance();
            }
        }
        Ok(value)
    }

    fn consume_expression(&mut self, into: &mut String) -> Result<()> {
        let start = self.index;
        self.advance();
        match self.input[self.index..].find(chars::EXPR_MARKER) {
            Some(end) => {
                let close = self.index + end + chars::EXPR_MARKER.len_utf8();
                into.push_str(&self.input[start..close]);
                self.index = close;
                Ok(())
            }
            None => Err(self.error("Unterminated expression", start)),
        }
    }

    fn consume_entity(&mut self, into: &mut String) {
        let rest = &self.input[self.index..];
        let end = rest.find(';').filter(|end| *end <= 10);
        let decoded = end.and_then(|end| decode_entity(&rest[1..end]).map(|ch| (ch, end)));
        match decoded {
            Some((ch, end)) => {
                into.push(ch);
                self.index += end + 1;
            }
            None => {
                into.push(chars::AMPERSAND);
                self.advance();
            }
        }
    }
}

fn is_attr_name_part(ch: char) -> bool {
    !(chars::is_whitespace(ch)
        || chars::is_quote(ch)
        || ch == chars::EQ
        || ch == chars::GT
        || ch == chars::LT
        || ch == chars::SLASH
        || ch == chars::EXPR_MARKER)
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(chars::NBSP),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}
