//! Markup Parser
//!
//! Builds an element tree from lexer tokens. Void elements never take a
//! close tag; every other element must be closed explicitly.

use crate::error::{CompileError, Result};
use crate::parse_util::ParseSourceSpan;

use super::ast::{Attribute, Element, Node, Text};
use super::lexer::{tokenize, MarkupToken, TokenKind};
use super::tags::is_void_element;

/// Parse markup into its root nodes.
pub fn parse(source: &str) -> Result<Vec<Node>> {
    Parser::new().parse(source)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Parser
    }

    pub fn parse(&self, source: &str) -> Result<Vec<Node>> {
        let tokens = tokenize(source)?;
        TreeBuilder::new(tokens).build()
    }
}

struct TreeBuilder {
    tokens: Vec<MarkupToken>,
    index: usize,
    root_nodes: Vec<Node>,
    element_stack: Vec<Element>,
}

impl TreeBuilder {
    fn new(tokens: Vec<MarkupToken>) -> Self {
        TreeBuilder {
            tokens,
            index: 0,
            root_nodes: Vec::new(),
            element_stack: Vec::new(),
        }
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.index)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn next_token(&mut self) -> Option<MarkupToken> {
        let token = self.tokens.get(self.index).cloned();
        self.index += 1;
        token
    }

    fn build(mut self) -> Result<Vec<Node>> {
        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::TagOpenStart => self.consume_start_tag(token)?,
                TokenKind::TagClose => self.consume_end_tag(token)?,
                TokenKind::Text => self.add_text(token),
                TokenKind::Eof => break,
                TokenKind::AttrName
                | TokenKind::AttrValue
                | TokenKind::TagOpenEnd
                | TokenKind::TagOpenEndVoid => {
                    return Err(markup_error("Unexpected token", &token.source_span));
                }
            }
        }

        if let Some(open) = self.element_stack.last() {
            return Err(markup_error(
                format!("Unclosed element <{}>", open.name),
                &open.source_span,
            ));
        }
        Ok(self.root_nodes)
    }

    fn consume_start_tag(&mut self, start: MarkupToken) -> Result<()> {
        let mut attrs: Vec<Attribute> = Vec::new();
        while self.peek_kind() == TokenKind::AttrName {
            let Some(name) = self.next_token() else {
                break;
            };
            let mut attr = Attribute {
                name: name.value,
                value: String::new(),
                source_span: name.source_span,
            };
            if self.peek_kind() == TokenKind::AttrValue {
                if let Some(value) = self.next_token() {
                    attr.value = value.value;
                    attr.source_span.end = value.source_span.end;
                }
            }
            attrs.push(attr);
        }

        let Some(end) = self.next_token() else {
            return Err(markup_error("Unterminated tag", &start.source_span));
        };
        let self_closing = match end.kind {
            TokenKind::TagOpenEnd => false,
            TokenKind::TagOpenEndVoid => true,
            _ => return Err(markup_error("Malformed start tag", &start.source_span)),
        };

        let element = Element {
            name: start.value,
            attrs,
            children: Vec::new(),
            source_span: ParseSourceSpan::new(start.source_span.start, end.source_span.end),
        };

        if self_closing || is_void_element(&element.name) {
            self.add_node(Node::Element(element));
        } else {
            self.element_stack.push(element);
        }
        Ok(())
    }

    fn consume_end_tag(&mut self, end: MarkupToken) -> Result<()> {
        if is_void_element(&end.value) {
            return Err(markup_error(
                format!("Void element <{}> does not have a close tag", end.value),
                &end.source_span,
            ));
        }
        match self.element_stack.pop() {
            Some(mut element) if element.name.eq_ignore_ascii_case(&end.value) => {
                element.source_span.end = end.source_span.end;
                self.add_node(Node::Element(element));
                Ok(())
            }
            Some(element) => Err(markup_error(
                format!(
                    "Unexpected closing tag </{}>; expected </{}>",
                    end.value, element.name
                ),
                &end.source_span,
            )),
            None => Err(markup_error(
                format!("Unexpected closing tag </{}>", end.value),
                &end.source_span,
            )),
        }
    }

    fn add_text(&mut self, token: MarkupToken) {
        // Adjacent text tokens (split by a stray '<') become one node
        if let Some(Node::Text(last)) = self.current_children().last_mut() {
            last.value.push_str(&token.value);
            last.source_span.end = token.source_span.end;
            return;
        }
        self.add_node(Node::Text(Text {
            value: token.value,
            source_span: token.source_span,
        }));
    }

    fn current_children(&mut self) -> &mut Vec<Node> {
        match self.element_stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root_nodes,
        }
    }

    fn add_node(&mut self, node: Node) {
        self.current_children().push(node);
    }
}

fn markup_error(message: impl Into<String>, span: &ParseSourceSpan) -> CompileError {
    CompileError::Markup {
        message: message.into(),
        location: span.start.to_string(),
    }
}
