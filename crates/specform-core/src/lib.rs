//! Specform Core Library
//!
//! Compiles prompt scenario spec files into structured prompts, renders them
//! with input bindings and evaluates assertions against produced outputs.

pub mod assertions;
pub mod bindings;
pub mod compiler;
pub mod domain;
pub mod error;
pub mod handle;
pub mod obs;
pub mod parser;
pub mod persist;
pub mod render;
pub mod similarity;
pub mod snapshot;
pub mod store;
pub mod telemetry;

pub use assertions::{AssertionRegistry, AssertionReport, Evaluator};
pub use bindings::{load_bindings, load_similarity_scores, parse_inline_binding};
pub use compiler::{
    compile_file, compile_source, compile_to_dir, compiled_output_path, load_compiled_prompt,
    to_json_pretty, write_compiled_prompt, COMPILED_SUFFIX, SPEC_SUFFIX,
};
pub use domain::{
    Assertion, AssertionContext, AssertionResult, CompiledPrompt, SpecMeta,
    DEFAULT_SIMILARITY_THRESHOLD,
};
pub use error::{Result, SpecformError};
pub use handle::Prompt;
pub use render::{render_prompt, RenderOptions};
pub use similarity::cosine_similarity;
pub use snapshot::{
    load_snapshot, record_snapshot, save_snapshot, snapshot_path, Snapshot, SNAPSHOT_SUFFIX,
};
pub use store::{
    from_snapshot, load_prompt_by_id, store_prompt, stored_prompt_path, use_prompt,
    STORED_PROMPT_SUFFIX,
};

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
