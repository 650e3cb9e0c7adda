//! Template compiler
//!
//! Turns template markup into an instruction tree. The template's single
//! root element stands for the component itself; its children become the
//! top-level instructions.

use crate::chars;
use crate::config::CompilerOptions;
use crate::error::{CompileError, Result};
use crate::expression_parser::{CompiledExpr, Fragment};
use crate::ml_parser::{self, Element, Node};
use crate::parse_util::ParseLocation;

use super::instruction::{
    AttributeInstruction, DynamicText, ElementInstruction, Instruction, InstructionTree,
    TextInstruction,
};

/// Attribute names bound as interaction events rather than values.
pub const DOM_EVENTS: &[&str] = &[
    "onclick",
    "oncontextmenu",
    "ondblclick",
    "onmousedown",
    "onmouseenter",
    "onmouseleave",
    "onmousemove",
    "onmouseover",
    "onmouseout",
    "onmouseup",
    "onkeydown",
    "onkeypress",
    "onkeyup",
];

pub fn is_dom_event(name: &str) -> bool {
    DOM_EVENTS.iter().any(|event| event.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Default)]
pub struct TemplateCompiler {
    options: CompilerOptions,
}

impl TemplateCompiler {
    pub fn new(options: CompilerOptions) -> Self {
        TemplateCompiler { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile a component template. An empty template yields an empty tree.
    pub fn compile(&self, markup: &str) -> Result<InstructionTree> {
        let nodes = ml_parser::parse(&mark_expressions(markup)?)?;
        let mut roots = nodes.iter().filter(|node| !is_blank_text(node));

        let root = match (roots.next(), roots.next()) {
            (None, _) => return Ok(InstructionTree::default()),
            (Some(Node::Element(root)), None) => root,
            (Some(Node::Text(_)), _) => {
                return Err(CompileError::Template {
                    message: "template text must be wrapped in a root element".to_string(),
                })
            }
            (Some(_), Some(extra)) => {
                return Err(CompileError::Template {
                    message: format!(
                        "template must have a single root element (second root at {})",
                        extra.source_span().start
                    ),
                })
            }
        };

        Ok(InstructionTree::new(self.compile_nodes(&root.children)?))
    }

    /// Compile markup whose root nodes are themselves the instructions.
    pub fn compile_fragment(&self, markup: &str) -> Result<InstructionTree> {
        let nodes = ml_parser::parse(&mark_expressions(markup)?)?;
        Ok(InstructionTree::new(self.compile_nodes(&nodes)?))
    }

    fn compile_nodes(&self, nodes: &[Node]) -> Result<Vec<Instruction>> {
        let mut instructions = Vec::new();
        for node in nodes {
            match node {
                Node::Text(text) => self.compile_text(&text.value, &mut instructions)?,
                Node::Element(element) => {
                    instructions.push(Instruction::Element(self.compile_element(element)?))
                }
            }
        }
        Ok(instructions)
    }

    fn compile_text(&self, value: &str, instructions: &mut Vec<Instruction>) -> Result<()> {
        for fragment in split_fragments(value) {
            match fragment {
                Fragment::Text(text) => {
                    if text.is_empty()
                        || (!self.options.preserve_whitespace && text.trim().is_empty())
                    {
                        continue;
                    }
                    instructions.push(Instruction::Text(TextInstruction {
                        text: text.to_string(),
                    }));
                }
                Fragment::Expression(source) => {
                    instructions.push(Instruction::Dynamic(DynamicText {
                        expr: CompiledExpr::binding(source.trim())?,
                    }));
                }
            }
        }
        Ok(())
    }

    fn compile_element(&self, element: &Element) -> Result<ElementInstruction> {
        let mut attributes = Vec::with_capacity(element.attrs.len());
        for attr in &element.attrs {
            attributes.push(compile_attribute(&attr.name, &attr.value)?);
        }
        Ok(ElementInstruction {
            tag: element.name.to_ascii_uppercase(),
            attributes,
            children: self.compile_nodes(&element.children)?,
        })
    }
}

fn compile_attribute(name: &str, value: &str) -> Result<AttributeInstruction> {
    if !value.contains(chars::EXPR_MARKER) {
        return Ok(AttributeInstruction::Static {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    let fragments: Vec<Fragment<'_>> = split_fragments(value)
        .into_iter()
        .filter(|fragment| !matches!(fragment, Fragment::Text(text) if text.trim().is_empty()))
        .collect();
    let single = match fragments.as_slice() {
        [Fragment::Expression(source)] => Some(source.trim()),
        _ => None,
    };

    if is_dom_event(name) {
        let Some(source) = single else {
            return Err(CompileError::Template {
                message: format!(
                    "event attribute '{}' must hold exactly one expression",
                    name
                ),
            });
        };
        return Ok(AttributeInstruction::Event {
            name: name.to_ascii_lowercase(),
            source: source.to_string(),
            handler: CompiledExpr::action(source)?,
        });
    }

    let expr = match single {
        Some(source) => CompiledExpr::binding(source)?,
        None => CompiledExpr::interpolation(&restore_braces(value), &split_fragments(value))?,
    };
    Ok(AttributeInstruction::Dynamic {
        name: name.to_string(),
        expr,
    })
}

fn is_blank_text(node: &Node) -> bool {
    matches!(node, Node::Text(text) if text.value.trim().is_empty())
}

/// Split marked text into alternating literal and expression fragments.
fn split_fragments(value: &str) -> Vec<Fragment<'_>> {
    value
        .split(chars::EXPR_MARKER)
        .enumerate()
        .map(|(i, piece)| {
            if i % 2 == 0 {
                Fragment::Text(piece)
            } else {
                Fragment::Expression(piece)
            }
        })
        .collect()
}

fn restore_braces(value: &str) -> String {
    split_fragments(value)
        .into_iter()
        .map(|fragment| match fragment {
            Fragment::Text(text) => text.to_string(),
            Fragment::Expression(source) => format!("{{{}}}", source),
        })
        .collect()
}

/// Replace every `{expression}` with the expression wrapped in
/// `EXPR_MARKER`s so it survives markup parsing. Braces nest, and quotes
/// inside an expression protect braces. Comments and raw-text elements
/// are copied unchanged.
pub fn mark_expressions(markup: &str) -> Result<String> {
    let mut out = String::with_capacity(markup.len() + 16);
    let mut index = 0;

    while index < markup.len() {
        let rest = &markup[index..];

        if rest.starts_with("<!--") {
            let end = rest.find("-->").map(|end| end + 3).unwrap_or(rest.len());
            out.push_str(&rest[..end]);
            index += end;
            continue;
        }

        if let Some(tag) = raw_text_tag(rest) {
            let lower = rest.to_ascii_lowercase();
            let closing = format!("</{}", tag);
            let end = lower[1..]
                .find(&closing)
                .map(|end| end + 1)
                .unwrap_or(rest.len());
            out.push_str(&rest[..end]);
            index += end;
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };

        if ch == chars::EXPR_MARKER {
            return Err(CompileError::Markup {
                message: "reserved control character in template".to_string(),
                location: ParseLocation::from_offset(markup, index).to_string(),
            });
        }

        if ch == chars::LBRACE {
            let end = find_expression_end(rest).ok_or_else(|| CompileError::Markup {
                message: "unterminated '{' expression".to_string(),
                location: ParseLocation::from_offset(markup, index).to_string(),
            })?;
            out.push(chars::EXPR_MARKER);
            out.push_str(&rest[1..end]);
            out.push(chars::EXPR_MARKER);
            index += end + 1;
            continue;
        }

        out.push(ch);
        index += ch.len_utf8();
    }

    Ok(out)
}

fn raw_text_tag(rest: &str) -> Option<&'static str> {
    if !rest.starts_with('<') {
        return None;
    }
    ["style", "script"].into_iter().find(|tag| {
        let Some(name) = rest.get(1..tag.len() + 1) else {
            return false;
        };
        name.eq_ignore_ascii_case(tag)
            && rest[tag.len() + 1..]
                .chars()
                .next()
                .map(|c| c == chars::GT || chars::is_whitespace(c))
                .unwrap_or(false)
    })
}

/// Byte index of the `}` closing the `{` at the start of `text`.
fn find_expression_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == chars::BACKSLASH {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            chars::LBRACE => depth += 1,
            chars::RBRACE => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            // Attribute-level quotes wrap the braces, so only quotes
            // after the first brace belong to the expression
            chars::SQ | chars::DQ if depth > 0 => quote = Some(ch),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_nested_braces() {
        let marked = mark_expressions("<a>{ {k: 1}.k }</a>").unwrap();
        let m = chars::EXPR_MARKER;
        assert_eq!(marked, format!("<a>{m} {{k: 1}}.k {m}</a>"));
    }

    #[test]
    fn style_content_is_untouched() {
        let marked = mark_expressions("<style>a { color: red }</style>").unwrap();
        assert_eq!(marked, "<style>a { color: red }</style>");
    }

    #[test]
    fn unterminated_expression_is_an_error() {
        assert!(mark_expressions("<a>{self.a</a>").is_err());
    }

    #[test]
    fn event_names_are_case_insensitive() {
        assert!(is_dom_event("onClick"));
        assert!(!is_dom_event("onchange"));
    }
}
