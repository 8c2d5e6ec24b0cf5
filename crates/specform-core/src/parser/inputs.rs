//! Parser for the `inputs` block.
//!
//! Line-oriented grammar, each line trimmed before matching:
//!
//! ```text
//! article = """
//! Multiline default text,
//! joined with newlines.
//! """
//! tone = "casual"
//! audience
//! ```
//!
//! `name = """` opens a multiline value that runs until a line that is, or
//! ends with, `"""`. `name = value` sets a single-line default with surrounding
//! quotes stripped. A bare name declares an input without a default.

use std::collections::BTreeMap;

use crate::error::{Result, SpecformError};

const TRIPLE_QUOTE: &str = "\"\"\"";

/// Declared input names in order, plus their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInputs {
    /// Names in declaration order; repeated declarations repeat here.
    pub names: Vec<String>,
    /// Default values; the last declaration of a name wins.
    pub defaults: BTreeMap<String, String>,
}

impl ParsedInputs {
    fn declare(&mut self, name: &str) {
        self.names.push(name.to_string());
    }

    fn set_default(&mut self, name: &str, value: String) {
        self.defaults.insert(name.to_string(), value);
    }
}

enum State {
    Normal,
    Multiline { key: String, value: String },
}

/// Parse the raw text of an `inputs` block.
pub fn parse_inputs_block(content: &str) -> Result<ParsedInputs> {
    let mut parsed = ParsedInputs::default();
    let mut state = State::Normal;

    for raw in content.lines() {
        let line = raw.trim();

        state = match state {
            State::Normal => parse_normal_line(line, &mut parsed),
            State::Multiline { key, mut value } => {
                if let Some(tail) = line.strip_suffix(TRIPLE_QUOTE) {
                    value.push_str(tail);
                    let value = value.strip_suffix('\n').unwrap_or(&value).to_string();
                    parsed.set_default(&key, value);
                    State::Normal
                } else {
                    value.push_str(line);
                    value.push('\n');
                    State::Multiline { key, value }
                }
            }
        };
    }

    match state {
        State::Normal => Ok(parsed),
        State::Multiline { key, .. } => Err(SpecformError::UnclosedMultilineInput { key }),
    }
}

fn parse_normal_line(line: &str, parsed: &mut ParsedInputs) -> State {
    if line.is_empty() {
        return State::Normal;
    }

    let Some((key, value)) = line.split_once('=') else {
        parsed.declare(line);
        return State::Normal;
    };

    let key = key.trim();
    let value = value.trim();
    parsed.declare(key);

    let Some(opened) = value.strip_prefix(TRIPLE_QUOTE) else {
        parsed.set_default(key, value.trim_matches('"').to_string());
        return State::Normal;
    };

    // `name = """text"""` closes on the same line.
    if let Some(single) = opened.strip_suffix(TRIPLE_QUOTE) {
        parsed.set_default(key, single.to_string());
        return State::Normal;
    }

    let mut value = String::new();
    if !opened.is_empty() {
        value.push_str(opened);
        value.push('\n');
    }
    State::Multiline {
        key: key.to_string(),
        value,
    }
}
