//! Structured observability hooks for the compile/render/evaluate pipeline.
//!
//! This module provides:
//! - A compile-scoped tracing span via the `CompileSpan` RAII guard
//! - Emission functions for the key pipeline events
//!
//! Events are emitted at `info!` level; filter with `RUST_LOG`.

use std::path::Path;

use tracing::{info, warn};

/// RAII guard that enters a span tagged with the spec file being compiled.
///
/// # Example
///
/// ```ignore
/// let _span = CompileSpan::enter(Path::new("prompts/summarize.spec.md"));
/// // every tracing call below is associated with source = prompts/summarize.spec.md
/// ```
pub struct CompileSpan {
    _span: tracing::span::EnteredSpan,
}

impl CompileSpan {
    pub fn enter(source: &Path) -> Self {
        let span = tracing::info_span!("specform.compile", source = %source.display());
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a spec file compiled successfully.
pub fn emit_spec_compiled(id: &str, inputs: usize, assertions: usize) {
    info!(
        event = "spec.compiled",
        id = %id,
        inputs = inputs,
        assertions = assertions,
    );
}

/// Emit event: frontmatter has no scenario title, so the prompt id is empty.
pub fn emit_missing_scenario(source: &Path) {
    warn!(event = "spec.missing_scenario", source = %source.display());
}

/// Emit event: a prompt was rendered.
pub fn emit_render_completed(id: &str, strict: bool, bytes: usize) {
    info!(event = "render.completed", id = %id, strict = strict, bytes = bytes);
}

/// Emit event: a batch of assertions was evaluated.
pub fn emit_assertions_evaluated(total: usize, passed: usize) {
    info!(
        event = "assertions.evaluated",
        total = total,
        passed = passed,
        success = total == passed,
    );
}

/// Emit event: a snapshot was written.
pub fn emit_snapshot_saved(id: &str, path: &Path) {
    info!(event = "snapshot.saved", id = %id, path = %path.display());
}

/// Emit event: snapshot recording skipped because some assertion failed.
pub fn emit_snapshot_skipped(id: &str, failed: usize) {
    info!(event = "snapshot.skipped", id = %id, failed = failed);
}
