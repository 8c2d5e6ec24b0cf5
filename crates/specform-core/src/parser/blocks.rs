//! Frontmatter header and fenced-block extraction.
//!
//! A spec file is a metadata header followed by a markdown body. Only the
//! fenced code blocks of the body are consumed; everything else is prose.
//!
//! ~~~text
//! ---
//! scenario: "Summarize a technical article"
//! model: gpt-4
//! ---
//!
//! ```prompt
//! Summarize {{article}} in a {{tone}} tone.
//! ```
//! ~~~

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::SpecMeta;
use crate::error::{Result, SpecformError};

pub const PROMPT_BLOCK: &str = "prompt";
pub const INPUTS_BLOCK: &str = "inputs";
pub const ASSERTIONS_BLOCK: &str = "assertions";
pub const OUTPUT_BLOCK: &str = "output";

const YAML_DELIMITER: &str = "---";
const TOML_DELIMITER: &str = "+++";

/// A spec document split into its metadata and named block bodies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDocument {
    pub meta: SpecMeta,
    /// Raw block text keyed by info-string name; later blocks overwrite earlier ones.
    pub blocks: BTreeMap<String, String>,
}

impl ExtractedDocument {
    pub fn block(&self, name: &str) -> Option<&str> {
        self.blocks.get(name).map(String::as_str)
    }
}

/// Split `document` into frontmatter metadata and fenced blocks.
pub fn extract(document: &str) -> Result<ExtractedDocument> {
    let (meta, body) = split_frontmatter(document)?;
    let blocks = extract_blocks(body);
    debug!(blocks = blocks.len(), "extracted fenced blocks");
    Ok(ExtractedDocument { meta, blocks })
}

/// Parse the leading header, if any, and return the remaining body.
///
/// YAML headers are delimited by `---` lines, TOML headers by `+++` lines.
/// A document without a header yields default metadata and the whole text.
pub fn split_frontmatter(document: &str) -> Result<(SpecMeta, &str)> {
    let document = document.strip_prefix('\u{feff}').unwrap_or(document);

    let first_line_end = document.find('\n').map_or(document.len(), |i| i + 1);
    let delimiter = match document[..first_line_end].trim_end() {
        YAML_DELIMITER => YAML_DELIMITER,
        TOML_DELIMITER => TOML_DELIMITER,
        _ => return Ok((SpecMeta::default(), document)),
    };

    let rest = &document[first_line_end..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let header = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((parse_header(delimiter, header)?, body));
        }
        offset += line.len();
    }

    Err(SpecformError::Frontmatter(format!(
        "missing closing {} delimiter",
        delimiter
    )))
}

fn parse_header(delimiter: &str, header: &str) -> Result<SpecMeta> {
    if header.trim().is_empty() {
        return Ok(SpecMeta::default());
    }
    if delimiter == TOML_DELIMITER {
        toml::from_str(header).map_err(|e| SpecformError::Frontmatter(e.to_string()))
    } else {
        serde_yaml::from_str(header).map_err(|e| SpecformError::Frontmatter(e.to_string()))
    }
}

/// An opening fence that has not been closed yet.
struct OpenFence {
    marker: char,
    width: usize,
    indent: usize,
    name: String,
    content: String,
}

/// Collect every fenced code block in `body`, keyed by the first word of its info string.
///
/// An unclosed fence runs to the end of the body.
pub fn extract_blocks(body: &str) -> BTreeMap<String, String> {
    let mut blocks = BTreeMap::new();
    let mut open: Option<OpenFence> = None;

    for line in body.split_inclusive('\n') {
        match open.take() {
            None => open = parse_opening_fence(line),
            Some(mut fence) => {
                if is_closing_fence(line, fence.marker, fence.width) {
                    blocks.insert(fence.name, fence.content);
                } else {
                    fence.content.push_str(strip_indent(line, fence.indent));
                    open = Some(fence);
                }
            }
        }
    }

    if let Some(fence) = open {
        blocks.insert(fence.name, fence.content);
    }
    blocks
}

fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ').count()
}

fn parse_opening_fence(line: &str) -> Option<OpenFence> {
    let indent = leading_spaces(line);
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let marker = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let width = rest.chars().take_while(|c| *c == marker).count();
    if width < 3 {
        return None;
    }

    let info = rest[width..].trim();
    if marker == '`' && info.contains('`') {
        return None;
    }

    Some(OpenFence {
        marker,
        width,
        indent,
        name: info.split_whitespace().next().unwrap_or_default().to_string(),
        content: String::new(),
    })
}

fn is_closing_fence(line: &str, marker: char, width: usize) -> bool {
    let indent = leading_spaces(line);
    if indent > 3 {
        return false;
    }
    let rest = &line[indent..];
    let run = rest.chars().take_while(|c| *c == marker).count();
    run >= width && rest[run..].trim().is_empty()
}

fn strip_indent(line: &str, indent: usize) -> &str {
    let strip = leading_spaces(line).min(indent);
    &line[strip..]
}
