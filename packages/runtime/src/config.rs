//! Runtime configuration

use serde::{Deserialize, Serialize};
use trellis_compiler::CompilerOptions;

/// Attribute set on a component element once it is mounted.
pub const DEFAULT_RENDERED_MARKER: &str = "rd";

/// How node insertions reach the live tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scheduling {
    /// Insert inline, as part of the mutation that caused it.
    #[default]
    Immediate,
    /// Queue until the next frame flush.
    Deferred,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeConfig {
    /// Log every compiled instruction tree.
    pub debug: bool,
    pub rendered_marker: String,
    pub scheduling: Scheduling,
    pub compiler: CompilerOptions,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            debug: false,
            rendered_marker: DEFAULT_RENDERED_MARKER.to_string(),
            scheduling: Scheduling::Immediate,
            compiler: CompilerOptions::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn deferred() -> Self {
        RuntimeConfig {
            scheduling: Scheduling::Deferred,
            ..RuntimeConfig::default()
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
