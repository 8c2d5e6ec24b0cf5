//! Assertion declarations, results and evaluation context.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Pass threshold for `semantic-similarity` when the context does not override it.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// A declared check: `kind` selects the evaluator, `expected` is evaluator-specific.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assertion {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "value")]
    pub expected: String,
}

impl Assertion {
    pub fn new(kind: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            expected: expected.into(),
        }
    }
}

/// Outcome of evaluating one assertion against an output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionResult {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "value")]
    pub expected: String,
    pub passed: bool,
    /// Human-readable explanation, prefixed with a pass/fail marker.
    pub message: String,
}

impl AssertionResult {
    pub const PASS_MARKER: &'static str = "✔";
    pub const FAIL_MARKER: &'static str = "✘";

    /// Build a result whose message is prefixed with the matching marker.
    pub fn new(
        kind: impl Into<String>,
        expected: impl Into<String>,
        passed: bool,
        message: impl AsRef<str>,
    ) -> Self {
        let marker = if passed {
            Self::PASS_MARKER
        } else {
            Self::FAIL_MARKER
        };
        Self {
            kind: kind.into(),
            expected: expected.into(),
            passed,
            message: format!("{} {}", marker, message.as_ref()),
        }
    }

    /// A failing result.
    pub fn fail(
        kind: impl Into<String>,
        expected: impl Into<String>,
        message: impl AsRef<str>,
    ) -> Self {
        Self::new(kind, expected, false, message)
    }
}

/// Side-data for evaluators that cannot judge from the output text alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssertionContext {
    /// Precomputed similarity score in [0, 1], keyed by expected text.
    pub semantic_scores: HashMap<String, f64>,
    /// Overrides [`DEFAULT_SIMILARITY_THRESHOLD`] when positive.
    pub threshold: Option<f64>,
}

impl AssertionContext {
    pub fn with_scores(mut self, scores: impl IntoIterator<Item = (String, f64)>) -> Self {
        self.semantic_scores.extend(scores);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Score for `expected`, 0.0 when absent.
    pub fn score_for(&self, expected: &str) -> f64 {
        self.semantic_scores.get(expected).copied().unwrap_or(0.0)
    }

    pub fn effective_threshold(&self) -> f64 {
        self.threshold
            .filter(|t| *t > 0.0)
            .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD)
    }
}
