//! Tag definitions
//!
//! Parsing rules for the handful of HTML tags the markup parser treats
//! specially.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// How the content of an element is tokenized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagContentType {
    /// Markup, text and expressions
    ParsableData,
    /// Everything up to the matching close tag is one text node
    RawText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDefinition {
    pub is_void: bool,
    pub content_type: TagContentType,
}

impl TagDefinition {
    pub const fn new() -> Self {
        TagDefinition {
            is_void: false,
            content_type: TagContentType::ParsableData,
        }
    }

    pub const fn with_void(mut self, is_void: bool) -> Self {
        self.is_void = is_void;
        self
    }

    pub const fn with_content_type(mut self, content_type: TagContentType) -> Self {
        self.content_type = content_type;
        self
    }
}

impl Default for TagDefinition {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_TAG_DEFINITION: TagDefinition = TagDefinition::new();

static TAG_DEFINITIONS: Lazy<HashMap<&'static str, TagDefinition>> = Lazy::new(|| {
    let mut defs = HashMap::new();

    // Void elements (never have a close tag)
    for name in [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ] {
        defs.insert(name, TagDefinition::new().with_void(true));
    }

    defs.insert(
        "script",
        TagDefinition::new().with_content_type(TagContentType::RawText),
    );
    defs.insert(
        "style",
        TagDefinition::new().with_content_type(TagContentType::RawText),
    );

    defs
});

/// Look up the parsing rules for `tag_name` (case-insensitive).
pub fn get_tag_definition(tag_name: &str) -> &'static TagDefinition {
    TAG_DEFINITIONS
        .get(tag_name.to_ascii_lowercase().as_str())
        .unwrap_or(&DEFAULT_TAG_DEFINITION)
}

pub fn is_void_element(tag_name: &str) -> bool {
    get_tag_definition(tag_name).is_void
}
