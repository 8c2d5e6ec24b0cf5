//! Spec compiler: document text → [`CompiledPrompt`].

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::domain::{prompt_hash, slugify, CompiledPrompt};
use crate::error::{Result, SpecformError};
use crate::obs::{emit_missing_scenario, emit_spec_compiled, CompileSpan};
use crate::parser::{
    extract, parse_assertions_block, parse_inputs_block, ParsedInputs, ASSERTIONS_BLOCK,
    INPUTS_BLOCK, OUTPUT_BLOCK, PROMPT_BLOCK,
};
use crate::persist::{read_json, write_json_atomic};

/// File suffix recognised as a spec source.
pub const SPEC_SUFFIX: &str = ".spec.md";

/// File suffix of compiled prompt artifacts.
pub const COMPILED_SUFFIX: &str = ".prompt.json";

/// Compile spec `source` text read from `path`.
///
/// Any failure is returned as [`SpecformError::Parse`] carrying `path`; no
/// partial record is produced.
pub fn compile_source(source: &str, path: &Path) -> Result<CompiledPrompt> {
    let _span = CompileSpan::enter(path);
    build(source, path).map_err(|e| e.in_file(path))
}

fn build(source: &str, path: &Path) -> Result<CompiledPrompt> {
    let doc = extract(source)?;
    let prompt = doc
        .block(PROMPT_BLOCK)
        .filter(|body| !body.trim().is_empty())
        .ok_or(SpecformError::MissingPrompt)?
        .to_string();

    let ParsedInputs { names, defaults } = match doc.block(INPUTS_BLOCK) {
        Some(block) => parse_inputs_block(block)?,
        None => ParsedInputs::default(),
    };
    let assertions = doc
        .block(ASSERTIONS_BLOCK)
        .map(parse_assertions_block)
        .unwrap_or_default();

    let meta = doc.meta.clone();
    if meta.scenario.trim().is_empty() {
        emit_missing_scenario(path);
    }

    let id = slugify(&meta.scenario);
    let now = Utc::now();
    let compiled = CompiledPrompt {
        hash: prompt_hash(&id),
        id,
        feature: meta.feature,
        scenario: meta.scenario,
        prompt,
        inputs: names,
        values: defaults,
        assertions,
        snapshot_ref: doc.block(OUTPUT_BLOCK).map(str::to_string),
        tags: meta.tags,
        model: meta.model,
        temperature: meta.temperature,
        created_at: now,
        updated_at: now,
        source_path: Some(path.display().to_string()),
    };

    emit_spec_compiled(
        &compiled.id,
        compiled.inputs.len(),
        compiled.assertions.len(),
    );
    Ok(compiled)
}

/// Read and compile the spec file at `path`.
pub fn compile_file(path: &Path) -> Result<CompiledPrompt> {
    let source =
        std::fs::read_to_string(path).map_err(|e| SpecformError::from(e).in_file(path))?;
    compile_source(&source, path)
}

/// Output path for a compiled spec: `<out_dir>/<file stem>.prompt.json`.
///
/// Only the last extension is removed, so `summarize.spec.md` becomes
/// `summarize.spec.prompt.json`.
pub fn compiled_output_path(source: &Path, out_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{}{}", stem, COMPILED_SUFFIX))
}

/// Compile `source` and write the artifact into `out_dir`, returning its path.
pub fn compile_to_dir(source: &Path, out_dir: &Path) -> Result<PathBuf> {
    let compiled = compile_file(source)?;
    let out = compiled_output_path(source, out_dir);
    write_compiled_prompt(&out, &compiled)?;
    debug!(source = %source.display(), output = %out.display(), "wrote compiled prompt");
    Ok(out)
}

/// Write a compiled prompt in its `.prompt.json` form.
pub fn write_compiled_prompt(path: &Path, prompt: &CompiledPrompt) -> Result<()> {
    write_json_atomic(path, prompt)
}

/// Load a `.prompt.json` artifact.
pub fn load_compiled_prompt(path: &Path) -> Result<CompiledPrompt> {
    read_json(path)
}

/// Serialize a compiled prompt to its pretty JSON form.
pub fn to_json_pretty(prompt: &CompiledPrompt) -> Result<String> {
    Ok(serde_json::to_string_pretty(prompt)?)
}
