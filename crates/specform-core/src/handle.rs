//! `Prompt`: a compiled prompt bound to the registry that judges its outputs.

use std::collections::BTreeMap;

use crate::assertions::{AssertionRegistry, AssertionReport};
use crate::domain::{AssertionContext, AssertionResult, CompiledPrompt};
use crate::error::{Result, SpecformError};
use crate::render::{effective_bindings, render_prompt, RenderOptions};
use crate::snapshot::Snapshot;

/// A compiled prompt plus the registry its assertions are evaluated with.
#[derive(Debug, Clone)]
pub struct Prompt<'r> {
    compiled: CompiledPrompt,
    registry: &'r AssertionRegistry,
}

impl<'r> Prompt<'r> {
    pub fn new(compiled: CompiledPrompt, registry: &'r AssertionRegistry) -> Self {
        Self { compiled, registry }
    }

    pub fn compiled(&self) -> &CompiledPrompt {
        &self.compiled
    }

    pub fn into_compiled(self) -> CompiledPrompt {
        self.compiled
    }

    pub fn id(&self) -> &str {
        &self.compiled.id
    }

    /// Declared input names, in declaration order.
    pub fn inputs(&self) -> &[String] {
        &self.compiled.inputs
    }

    /// Declared default values.
    pub fn defaults(&self) -> &BTreeMap<String, String> {
        &self.compiled.values
    }

    pub fn render(&self, bindings: &BTreeMap<String, String>, strict: bool) -> Result<String> {
        let options = if strict {
            RenderOptions::strict()
        } else {
            RenderOptions::lenient()
        };
        render_prompt(&self.compiled, bindings, options)
    }

    /// Run every declared assertion against `output`.
    pub fn assert_all(&self, output: &str, ctx: Option<&AssertionContext>) -> AssertionReport {
        self.registry
            .evaluate(output, &self.compiled.assertions, ctx)
    }

    /// Run the first declared assertion of `kind`.
    ///
    /// Fails with `UnknownAssertionKind` when the prompt declares no such
    /// assertion or the registry has no evaluator for it.
    pub fn assert_one(
        &self,
        kind: &str,
        output: &str,
        ctx: Option<&AssertionContext>,
    ) -> Result<AssertionResult> {
        let assertion = self
            .compiled
            .assertions
            .iter()
            .find(|a| a.kind == kind)
            .ok_or_else(|| SpecformError::UnknownAssertionKind {
                kind: kind.to_string(),
            })?;
        self.registry.run(&assertion.kind, &assertion.expected, output, ctx)
    }

    /// Evaluate `output` and build an in-memory snapshot of the run.
    ///
    /// Recorded inputs are the declared defaults overlaid with `bindings`.
    pub fn snapshot(
        &self,
        output: &str,
        bindings: &BTreeMap<String, String>,
        ctx: Option<&AssertionContext>,
    ) -> Snapshot {
        let report = self.assert_all(output, ctx);
        let inputs = effective_bindings(&self.compiled, bindings);
        Snapshot::new(&self.compiled, output, report.into_results(), inputs)
    }
}
