//! Spec file micro-language: frontmatter, fenced blocks and the block grammars.
//!
//! - [`blocks`]:     frontmatter header + fenced-block extraction
//! - [`inputs`]:     `inputs` block grammar (names, defaults, multiline values)
//! - [`assertions`]: `assertions` block grammar (`- kind: value` items)

pub mod assertions;
pub mod blocks;
pub mod inputs;

pub use assertions::parse_assertions_block;
pub use blocks::{
    extract, extract_blocks, split_frontmatter, ExtractedDocument, ASSERTIONS_BLOCK,
    INPUTS_BLOCK, OUTPUT_BLOCK, PROMPT_BLOCK,
};
pub use inputs::{parse_inputs_block, ParsedInputs};
