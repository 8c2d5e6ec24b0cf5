//! Parser for the `assertions` block.
//!
//! Each qualifying line has the form `- kind: value`. Lines that do not start
//! with `-` or carry no `:` are skipped.

use crate::domain::Assertion;

/// Parse the raw text of an `assertions` block, preserving declaration order.
pub fn parse_assertions_block(content: &str) -> Vec<Assertion> {
    content
        .lines()
        .filter_map(|raw| {
            let item = raw.trim().strip_prefix('-')?;
            let (kind, value) = item.split_once(':')?;
            Some(Assertion::new(kind.trim(), value.trim().trim_matches('"')))
        })
        .collect()
}
