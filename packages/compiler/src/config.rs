//! Compiler options

use serde::{Deserialize, Serialize};

/// Options that change how markup is turned into instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    /// Keep whitespace-only text fragments as literal text instructions.
    pub preserve_whitespace: bool,
}

impl CompilerOptions {
    pub fn with_preserve_whitespace(mut self, preserve: bool) -> Self {
        self.preserve_whitespace = preserve;
        self
    }
}
