//! Perform Compile
//!
//! Compiles every declared template of a project. Templates are
//! independent, so they are compiled in parallel on the rayon pool.

use std::time::Instant;

use rayon::prelude::*;
use serde_json::json;
use tracing::{debug, info, warn};
use trellis_compiler::{CompileError, InstructionTree, TemplateCompiler};

use crate::config::{ComponentDeclaration, ProjectConfig};

/// Compile outcome for one declared component.
#[derive(Debug, Clone)]
pub struct CompiledComponent {
    pub name: String,
    pub tag: String,
    pub result: Result<InstructionTree, CompileError>,
}

impl CompiledComponent {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompilationResult {
    /// In declaration order.
    pub components: Vec<CompiledComponent>,
}

impl CompilationResult {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &CompileError)> {
        self.components
            .iter()
            .filter_map(|component| component.result.as_ref().err().map(|err| (component.name.as_str(), err)))
    }

    pub fn has_errors(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn get(&self, name: &str) -> Option<&CompiledComponent> {
        self.components.iter().find(|component| component.name == name)
    }

    /// `{ name: instructions }`, or `{ name: { "error": message } }` for
    /// a template that failed.
    pub fn to_json(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        for component in &self.components {
            let entry = match &component.result {
                Ok(tree) => serde_json::to_value(tree).unwrap_or_else(|err| json!({ "error": err.to_string() })),
                Err(err) => json!({ "error": err.to_string() }),
            };
            out.insert(component.name.clone(), entry);
        }
        serde_json::Value::Object(out)
    }
}

fn compile_one(compiler: &TemplateCompiler, declaration: &ComponentDeclaration) -> CompiledComponent {
    let result = compiler.compile(&declaration.template);
    match &result {
        Ok(tree) => debug!(component = %declaration.name, instructions = tree.len(), "compiled"),
        Err(err) => warn!(component = %declaration.name, error = %err, "template failed to compile"),
    }
    CompiledComponent {
        name: declaration.name.clone(),
        tag: declaration.tag(),
        result,
    }
}

/// Compile all templates of `project`. Failures are collected, not
/// returned early.
pub fn perform_compilation(project: &ProjectConfig) -> CompilationResult {
    let start = Instant::now();
    let compiler = TemplateCompiler::new(project.compiler.clone());
    let components: Vec<CompiledComponent> = project
        .components
        .par_iter()
        .map(|declaration| compile_one(&compiler, declaration))
        .collect();

    let result = CompilationResult { components };
    info!(
        components = result.components.len(),
        failed = result.failures().count(),
        elapsed = ?start.elapsed(),
        "compilation finished"
    );
    result
}
