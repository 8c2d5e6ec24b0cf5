//! Built-in assertion kinds.

use regex::RegexBuilder;

use super::Evaluator;
use crate::domain::{AssertionContext, AssertionResult};
use crate::error::SpecformError;

pub const CONTAINS: &str = "contains";
pub const EQUALS: &str = "equals";
pub const MATCHES: &str = "matches";
pub const SEMANTIC_SIMILARITY: &str = "semantic-similarity";

/// Lowercase, treat `-` as a space, and drop everything that is not a
/// letter, digit or whitespace.
pub fn normalize_text(s: &str) -> String {
    s.to_lowercase()
        .replace('-', " ")
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Split `/pattern/flags` into its parts. Anything else is a bare pattern.
pub fn parse_regex_literal(expected: &str) -> (&str, &str) {
    if let Some(body) = expected.strip_prefix('/') {
        if let Some(last) = body.rfind('/') {
            return (&body[..last], &body[last + 1..]);
        }
    }
    (expected, "")
}

/// Normalized `expected` is a substring of normalized output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Contains;

impl Evaluator for Contains {
    fn evaluate(&self, expected: &str, output: &str, _: Option<&AssertionContext>) -> AssertionResult {
        let passed = normalize_text(output).contains(&normalize_text(expected));
        let message = if passed {
            format!("Output contains '{}'", expected)
        } else {
            format!("Output missing '{}'", expected)
        };
        AssertionResult::new(CONTAINS, expected, passed, message)
    }
}

/// Normalized, trimmed forms are identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct Equals;

impl Evaluator for Equals {
    fn evaluate(&self, expected: &str, output: &str, _: Option<&AssertionContext>) -> AssertionResult {
        let passed = normalize_text(output).trim() == normalize_text(expected).trim();
        let message = if passed {
            "Output exactly matches expected value"
        } else {
            "Output does not match expected value"
        };
        AssertionResult::new(EQUALS, expected, passed, message)
    }
}

/// Regex search over the raw output. Supports `/pattern/i`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matches;

impl Evaluator for Matches {
    fn evaluate(&self, expected: &str, output: &str, _: Option<&AssertionContext>) -> AssertionResult {
        let (pattern, flags) = parse_regex_literal(expected);
        let re = match RegexBuilder::new(pattern)
            .case_insensitive(flags.contains('i'))
            .build()
        {
            Ok(re) => re,
            Err(e) => {
                let err = SpecformError::InvalidRegex {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                };
                return AssertionResult::fail(MATCHES, expected, err.to_string());
            }
        };

        let passed = re.is_match(output);
        let message = if passed {
            format!("Output matches regex {}", expected)
        } else {
            format!("Output does not match regex {}", expected)
        };
        AssertionResult::new(MATCHES, expected, passed, message)
    }
}

/// Looks `expected` up in the context's precomputed similarity scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticSimilarity;

impl Evaluator for SemanticSimilarity {
    fn evaluate(&self, expected: &str, _: &str, ctx: Option<&AssertionContext>) -> AssertionResult {
        let default_ctx = AssertionContext::default();
        let ctx = ctx.unwrap_or(&default_ctx);
        let score = ctx.score_for(expected);
        let threshold = ctx.effective_threshold();
        let passed = score >= threshold;
        AssertionResult::new(
            SEMANTIC_SIMILARITY,
            expected,
            passed,
            format!("semantic similarity {:.2} vs threshold {:.2}", score, threshold),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "Webhooks allow real-time HTTP communication between systems.";

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Real-Time, HTTP!"), "real time http");
        assert_eq!(normalize_text("Ça-va? 42"), "ça va 42");
    }

    #[test]
    fn test_contains_normalizes_hyphen_and_case() {
        assert!(Contains.evaluate("real time", OUTPUT, None).passed);
        assert!(Contains.evaluate("REAL-TIME http", OUTPUT, None).passed);
        assert!(!Contains.evaluate("real time", "processed in batch", None).passed);
        assert!(!Contains.evaluate("websocket", OUTPUT, None).passed);
    }

    #[test]
    fn test_contains_message() {
        let r = Contains.evaluate("websocket", OUTPUT, None);
        assert_eq!(r.message, "✘ Output missing 'websocket'");
        assert_eq!(r.kind, CONTAINS);
        assert_eq!(r.expected, "websocket");
    }

    #[test]
    fn test_equals() {
        assert!(Equals.evaluate(OUTPUT, OUTPUT, None).passed);
        assert!(Equals
            .evaluate("webhooks allow real time http communication between systems", OUTPUT, None)
            .passed);
        assert!(Equals.evaluate("  Hello.  ", "hello", None).passed);
        assert!(!Equals.evaluate("something else", OUTPUT, None).passed);
    }

    #[test]
    fn test_parse_regex_literal() {
        assert_eq!(parse_regex_literal("/HTTP/i"), ("HTTP", "i"));
        assert_eq!(parse_regex_literal("/a/b/"), ("a/b", ""));
        assert_eq!(parse_regex_literal("HTTP"), ("HTTP", ""));
        assert_eq!(parse_regex_literal("/unterminated"), ("/unterminated", ""));
    }

    #[test]
    fn test_matches_flags() {
        assert!(Matches.evaluate("/http/i", OUTPUT, None).passed);
        assert!(!Matches.evaluate("/http/", OUTPUT, None).passed);
        assert!(!Matches.evaluate("/WebSocket/", OUTPUT, None).passed);
        assert!(Matches.evaluate(r"^Webhooks\b", OUTPUT, None).passed);
    }

    #[test]
    fn test_matches_uses_raw_output() {
        assert!(Matches.evaluate("real-time", OUTPUT, None).passed);
        assert!(!Matches.evaluate("real time", OUTPUT, None).passed);
    }

    #[test]
    fn test_matches_invalid_regex_fails_with_message() {
        let r = Matches.evaluate("[[invalid", OUTPUT, None);
        assert!(!r.passed);
        assert!(r.message.starts_with("✘ invalid regex"));
    }

    #[test]
    fn test_semantic_similarity_thresholds() {
        let ctx = AssertionContext::default()
            .with_scores([("event-driven communication".to_string(), 0.92)]);
        assert!(SemanticSimilarity.evaluate("event-driven communication", OUTPUT, Some(&ctx)).passed);

        let low = AssertionContext::default()
            .with_scores([("event-driven communication".to_string(), 0.6)]);
        assert!(!SemanticSimilarity.evaluate("event-driven communication", OUTPUT, Some(&low)).passed);

        let lowered = low.with_threshold(0.5);
        assert!(SemanticSimilarity.evaluate("event-driven communication", OUTPUT, Some(&lowered)).passed);
    }

    #[test]
    fn test_semantic_similarity_missing_score() {
        let r = SemanticSimilarity.evaluate("anything", OUTPUT, None);
        assert!(!r.passed);
        assert_eq!(r.message, "✘ semantic similarity 0.00 vs threshold 0.85");
    }
}
