//! ML (Markup Language) Parser Module
//!
//! Parses template and page markup into an element tree

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod tags;

pub use ast::{Attribute, Element, Node, Text};
pub use lexer::{tokenize, MarkupToken, TokenKind};
pub use parser::{parse, Parser};
pub use tags::{get_tag_definition, is_void_element, TagContentType, TagDefinition};
