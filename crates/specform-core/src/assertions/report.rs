//! Aggregation over one batch of assertion results.

use serde::{Deserialize, Serialize};

use crate::domain::AssertionResult;

/// Ordered results of one batch; passes only if every result passed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AssertionReport {
    pub results: Vec<AssertionResult>,
}

impl AssertionReport {
    pub fn new(results: Vec<AssertionResult>) -> Self {
        Self { results }
    }

    /// Logical AND over every result. An empty batch passes.
    pub fn passed(&self) -> bool {
        all_passed(&self.results)
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.message.as_str())
    }

    pub fn into_results(self) -> Vec<AssertionResult> {
        self.results
    }
}

/// Logical AND of `passed` over `results`.
pub fn all_passed(results: &[AssertionResult]) -> bool {
    results.iter().all(|r| r.passed)
}
