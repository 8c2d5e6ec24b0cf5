//! Assertion engine: pluggable evaluators judged against a produced output.
//!
//! # Modules
//!
//! - [`builtin`]:  `contains`, `equals`, `matches`, `semantic-similarity`
//! - [`registry`]: `AssertionRegistry` (kind name → evaluator) and batch runs
//! - [`report`]:   `AssertionReport` aggregation over ordered results

pub mod builtin;
pub mod registry;
pub mod report;

use crate::domain::{AssertionContext, AssertionResult};

pub use builtin::{normalize_text, parse_regex_literal, Contains, Equals, Matches, SemanticSimilarity};
pub use registry::AssertionRegistry;
pub use report::AssertionReport;

/// One assertion kind.
///
/// Built-ins and user-registered kinds share this contract. Evaluators never
/// fail: problems with `expected` itself are reported as a failing result.
pub trait Evaluator: Send + Sync {
    fn evaluate(
        &self,
        expected: &str,
        output: &str,
        ctx: Option<&AssertionContext>,
    ) -> AssertionResult;
}

impl<F> Evaluator for F
where
    F: Fn(&str, &str, Option<&AssertionContext>) -> AssertionResult + Send + Sync,
{
    fn evaluate(
        &self,
        expected: &str,
        output: &str,
        ctx: Option<&AssertionContext>,
    ) -> AssertionResult {
        self(expected, output, ctx)
    }
}
