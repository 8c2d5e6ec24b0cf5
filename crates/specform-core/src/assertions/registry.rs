//! Registry of assertion kinds.
//!
//! A registry is an owned value: construct one (usually with the built-ins),
//! register custom kinds once, then share it by reference across evaluations.
//! Registration takes an exclusive lock; evaluation only reads.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::builtin::{
    Contains, Equals, Matches, SemanticSimilarity, CONTAINS, EQUALS, MATCHES, SEMANTIC_SIMILARITY,
};
use super::report::AssertionReport;
use super::Evaluator;
use crate::domain::{Assertion, AssertionContext, AssertionResult};
use crate::error::{Result, SpecformError};
use crate::obs::emit_assertions_evaluated;

/// Maps assertion kind names to evaluators.
pub struct AssertionRegistry {
    evaluators: RwLock<BTreeMap<String, Arc<dyn Evaluator>>>,
}

impl AssertionRegistry {
    /// A registry with no kinds registered.
    pub fn empty() -> Self {
        Self {
            evaluators: RwLock::new(BTreeMap::new()),
        }
    }

    /// A registry holding `contains`, `equals`, `matches` and `semantic-similarity`.
    pub fn with_builtins() -> Self {
        let mut evaluators: BTreeMap<String, Arc<dyn Evaluator>> = BTreeMap::new();
        evaluators.insert(CONTAINS.to_string(), Arc::new(Contains));
        evaluators.insert(EQUALS.to_string(), Arc::new(Equals));
        evaluators.insert(MATCHES.to_string(), Arc::new(Matches));
        evaluators.insert(SEMANTIC_SIMILARITY.to_string(), Arc::new(SemanticSimilarity));
        Self {
            evaluators: RwLock::new(evaluators),
        }
    }

    /// Register a new kind. Existing kinds are never overwritten.
    pub fn register(&self, kind: impl Into<String>, evaluator: impl Evaluator + 'static) -> Result<()> {
        let kind = kind.into();
        let mut evaluators = self
            .evaluators
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if evaluators.contains_key(&kind) {
            return Err(SpecformError::DuplicateAssertion { kind });
        }
        debug!(kind = %kind, "registered assertion kind");
        evaluators.insert(kind, Arc::new(evaluator));
        Ok(())
    }

    pub fn has(&self, kind: &str) -> bool {
        self.read().contains_key(kind)
    }

    /// Registered kind names, sorted.
    pub fn kinds(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, Arc<dyn Evaluator>>> {
        self.evaluators.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn get(&self, kind: &str) -> Result<Arc<dyn Evaluator>> {
        self.read()
            .get(kind)
            .cloned()
            .ok_or_else(|| SpecformError::UnknownAssertionKind {
                kind: kind.to_string(),
            })
    }

    /// Evaluate a single assertion kind.
    ///
    /// Unknown kinds are an error here; batch evaluation downgrades them to a
    /// failing result instead.
    pub fn run(
        &self,
        kind: &str,
        expected: &str,
        output: &str,
        ctx: Option<&AssertionContext>,
    ) -> Result<AssertionResult> {
        // Lock released before the evaluator runs, so evaluators may register kinds.
        let evaluator = self.get(kind)?;
        Ok(evaluator.evaluate(expected, output, ctx))
    }

    /// Evaluate every assertion against `output`, in declaration order.
    pub fn run_all(
        &self,
        output: &str,
        assertions: &[Assertion],
        ctx: Option<&AssertionContext>,
    ) -> Vec<AssertionResult> {
        let results: Vec<AssertionResult> = assertions
            .iter()
            .map(|a| {
                self.run(&a.kind, &a.expected, output, ctx)
                    .unwrap_or_else(|e| AssertionResult::fail(&a.kind, &a.expected, e.to_string()))
            })
            .collect();

        let passed = results.iter().filter(|r| r.passed).count();
        emit_assertions_evaluated(results.len(), passed);
        results
    }

    /// [`run_all`](Self::run_all) wrapped in an [`AssertionReport`].
    pub fn evaluate(
        &self,
        output: &str,
        assertions: &[Assertion],
        ctx: Option<&AssertionContext>,
    ) -> AssertionReport {
        AssertionReport::new(self.run_all(output, assertions, ctx))
    }
}

impl Default for AssertionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for AssertionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssertionRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
