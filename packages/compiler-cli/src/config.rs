//! Project configuration
//!
//! A project file is JSON:
//!
//! ```json
//! {
//!   "components": [
//!     { "name": "Counter", "template": "<Counter><b>{self.count}</b></Counter>",
//!       "properties": { "count": 0 } }
//!   ],
//!   "compiler": { "preserveWhitespace": false },
//!   "runtime": { "scheduling": "immediate" },
//!   "page": "index.html"
//! }
//! ```
//!
//! Templates may live next to the project file (`templateFile`); relative
//! paths resolve against the project file's directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use trellis_compiler::CompilerOptions;
use trellis_runtime::{ComponentClass, RuntimeConfig, Value};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid project file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("component '{name}' has both template and templateFile")]
    AmbiguousTemplate { name: String },

    #[error("tag '{tag}' is declared twice")]
    DuplicateTag { tag: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    pub components: Vec<ComponentDeclaration>,
    pub compiler: CompilerOptions,
    pub runtime: RuntimeConfig,
    /// Host page rendered by `trellis render` when no `--page` is given.
    pub page: Option<PathBuf>,
    /// Register the built-in components (`FilteredList`).
    pub builtins: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentDeclaration {
    pub name: String,
    pub tag: Option<String>,
    pub render_tag: Option<String>,
    pub template: String,
    pub template_file: Option<PathBuf>,
    pub style: String,
    /// Declared properties and their defaults, in declaration order.
    pub properties: IndexMap<String, serde_json::Value>,
}

impl ComponentDeclaration {
    /// Upper-cased tag, as the runtime registers it.
    pub fn tag(&self) -> String {
        self.tag.as_deref().unwrap_or(&self.name).to_ascii_uppercase()
    }

    /// Build a runtime class. Declared classes carry no behaviour.
    pub fn to_class(&self) -> Rc<ComponentClass> {
        let mut builder = ComponentClass::builder(self.name.clone())
            .template(self.template.clone())
            .style(self.style.clone());
        if let Some(tag) = &self.tag {
            builder = builder.tag(tag.clone());
        }
        if let Some(render_tag) = &self.render_tag {
            builder = builder.render_tag(render_tag.clone());
        }
        for (name, default) in &self.properties {
            builder = builder.property(name.clone(), Value::from(default.clone()));
        }
        builder.build()
    }
}

impl ProjectConfig {
    /// Read a project file and inline every `templateFile`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = ProjectConfig::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_templates(base)?;
        if let Some(page) = &config.page {
            config.page = Some(base.join(page));
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn use_builtins(&self) -> bool {
        self.builtins.unwrap_or(true)
    }

    /// Runtime config with the project's compiler options folded in.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            compiler: self.compiler.clone(),
            ..self.runtime.clone()
        }
    }

    pub fn classes(&self) -> Vec<Rc<ComponentClass>> {
        self.components.iter().map(ComponentDeclaration::to_class).collect()
    }

    fn resolve_templates(&mut self, base: &Path) -> Result<(), ConfigError> {
        for component in &mut self.components {
            let Some(file) = component.template_file.take() else {
                continue;
            };
            if !component.template.is_empty() {
                return Err(ConfigError::AmbiguousTemplate {
                    name: component.name.clone(),
                });
            }
            let path = base.join(&file);
            component.template = fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for component in &self.components {
            let tag = component.tag();
            if !seen.insert(tag.clone()) {
                return Err(ConfigError::DuplicateTag { tag });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_defaults_to_name() {
        let declaration = ComponentDeclaration {
            name: "Counter".into(),
            ..ComponentDeclaration::default()
        };
        assert_eq!(declaration.tag(), "COUNTER");
    }

    #[test]
    fn compiler_options_reach_the_runtime() {
        let config = ProjectConfig::from_json(r#"{"compiler": {"preserveWhitespace": true}}"#).unwrap();
        assert!(config.runtime_config().compiler.preserve_whitespace);
        assert!(config.use_builtins());
    }
}
