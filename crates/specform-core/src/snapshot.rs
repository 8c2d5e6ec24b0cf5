//! Snapshot codec: persisted record of one assertion run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assertions::report::all_passed;
use crate::domain::{AssertionResult, CompiledPrompt};
use crate::error::Result;
use crate::obs::{emit_snapshot_saved, emit_snapshot_skipped};
use crate::persist::{read_json, write_json_atomic};

/// File suffix of persisted snapshots.
pub const SNAPSHOT_SUFFIX: &str = ".snap.json";

/// Outcome of one evaluation run, kept for later comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub id: String,
    pub hash: String,
    pub output: String,
    /// Bindings the output was produced with.
    pub inputs: BTreeMap<String, String>,
    pub assertions: Vec<AssertionResult>,
    /// AND of every assertion result.
    pub passed: bool,
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    /// Build a snapshot stamped with the current time.
    pub fn new(
        prompt: &CompiledPrompt,
        output: impl Into<String>,
        results: Vec<AssertionResult>,
        inputs: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id: prompt.id.clone(),
            hash: prompt.hash.clone(),
            output: output.into(),
            inputs,
            passed: all_passed(&results),
            assertions: results,
            timestamp: Utc::now(),
        }
    }
}

/// `<dir>/<id>.snap.json`
pub fn snapshot_path(dir: &Path, prompt: &CompiledPrompt) -> PathBuf {
    dir.join(format!("{}{}", prompt.id, SNAPSHOT_SUFFIX))
}

/// Build a snapshot and write it to `path`.
///
/// Nothing is written unless serialization succeeds; the write itself is a
/// temp-file-and-rename.
pub fn save_snapshot(
    path: &Path,
    prompt: &CompiledPrompt,
    output: &str,
    results: &[AssertionResult],
    inputs: &BTreeMap<String, String>,
) -> Result<Snapshot> {
    let snapshot = Snapshot::new(prompt, output, results.to_vec(), inputs.clone());
    write_snapshot(path, &snapshot)?;
    Ok(snapshot)
}

/// Write an already-built snapshot.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    write_json_atomic(path, snapshot)?;
    emit_snapshot_saved(&snapshot.id, path);
    Ok(())
}

/// Read a snapshot back.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    read_json(path)
}

/// Persist a snapshot under `dir` only if every result passed.
///
/// Returns the written path, or `None` when the batch failed and nothing was
/// recorded. Callers wanting to keep failing runs use [`save_snapshot`].
pub fn record_snapshot(
    dir: &Path,
    prompt: &CompiledPrompt,
    output: &str,
    results: &[AssertionResult],
    inputs: &BTreeMap<String, String>,
) -> Result<Option<PathBuf>> {
    let failed = results.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        emit_snapshot_skipped(&prompt.id, failed);
        return Ok(None);
    }

    let path = snapshot_path(dir, prompt);
    save_snapshot(&path, prompt, output, results, inputs)?;
    Ok(Some(path))
}
