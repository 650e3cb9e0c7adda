//! Perform Render
//!
//! Loads a host page into an in-memory document, registers the project's
//! classes and mounts every matching element, then serializes the page.

use anyhow::{anyhow, Context};
use serde::Serialize;
use tracing::{debug, info};
use trellis_runtime::components::builtin_classes;
use trellis_runtime::{CompileReport, MemoryDocument, Runtime};

use crate::config::ProjectConfig;

#[derive(Debug, Clone, Serialize)]
pub struct RenderOutput {
    /// Inner HTML of the page body after mounting.
    pub html: String,
    pub roots: usize,
    pub report: CompileReport,
}

/// Runtime over `page` with the project's classes registered and compiled.
pub fn prepare_runtime(project: &ProjectConfig, page: &str) -> anyhow::Result<(Runtime, CompileReport)> {
    let document = MemoryDocument::load(page).context("cannot parse host page")?;
    let runtime = Runtime::from_backend(project.runtime_config(), Box::new(document));

    if project.use_builtins() {
        for class in builtin_classes() {
            runtime.register(class);
        }
    }
    for class in project.classes() {
        if let Some(replaced) = runtime.register(class) {
            debug!(class = replaced.name(), "built-in class replaced");
        }
    }

    let report = runtime.compile_all_registered();
    Ok((runtime, report))
}

pub fn perform_render(project: &ProjectConfig, page: &str) -> anyhow::Result<RenderOutput> {
    let (runtime, report) = prepare_runtime(project, page)?;
    let roots = runtime.scan_and_mount()?;
    let flushed = runtime.flush_frame();
    if flushed > 0 {
        debug!(insertions = flushed, "flushed deferred insertions");
    }

    let html = runtime
        .with_document(|document| document.inner_html(document.body()))
        .ok_or_else(|| anyhow!("render backend is not an in-memory document"))?;
    info!(roots = roots.len(), "page rendered");
    Ok(RenderOutput {
        html,
        roots: roots.len(),
        report,
    })
}
