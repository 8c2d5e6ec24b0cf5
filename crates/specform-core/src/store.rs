//! Id-keyed prompt and snapshot directory.
//!
//! A store directory holds `<id>.spec.json` compiled prompts next to the
//! `<id>.snap.json` snapshots recorded for them. Every call reads from disk.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::assertions::AssertionRegistry;
use crate::domain::CompiledPrompt;
use crate::error::Result;
use crate::handle::Prompt;
use crate::persist::{read_json, write_json_atomic};
use crate::snapshot::{load_snapshot, snapshot_path, Snapshot};

/// File suffix of id-keyed compiled prompts in a store directory.
pub const STORED_PROMPT_SUFFIX: &str = ".spec.json";

/// `<dir>/<id>.spec.json`
pub fn stored_prompt_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{}{}", id, STORED_PROMPT_SUFFIX))
}

/// Write `prompt` under its id so [`load_prompt_by_id`] can find it.
pub fn store_prompt(dir: &Path, prompt: &CompiledPrompt) -> Result<PathBuf> {
    let path = stored_prompt_path(dir, &prompt.id);
    write_json_atomic(&path, prompt)?;
    Ok(path)
}

/// Load the compiled prompt stored under `id`.
pub fn load_prompt_by_id(dir: &Path, id: &str) -> Result<CompiledPrompt> {
    let path = stored_prompt_path(dir, id);
    read_json(&path).map_err(|e| {
        warn!(id = %id, path = %path.display(), error = %e, "failed to load prompt");
        e
    })
}

/// Load the prompt stored under `id` together with its recorded snapshot.
pub fn from_snapshot(dir: &Path, id: &str) -> Result<(CompiledPrompt, Snapshot)> {
    let prompt = load_prompt_by_id(dir, id)?;
    let path = snapshot_path(dir, &prompt);
    let snapshot = load_snapshot(&path).map_err(|e| {
        warn!(id = %id, path = %path.display(), error = %e, "failed to load snapshot");
        e
    })?;
    Ok((prompt, snapshot))
}

/// [`load_prompt_by_id`] bound to `registry`.
pub fn use_prompt<'r>(dir: &Path, id: &str, registry: &'r AssertionRegistry) -> Result<Prompt<'r>> {
    Ok(Prompt::new(load_prompt_by_id(dir, id)?, registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_source;
    use crate::error::SpecformError;
    use crate::snapshot::record_snapshot;
    use std::collections::BTreeMap;

    const SPEC: &str = "---\nscenario: \"Greet user\"\n---\n\n```prompt\nHello {{name}}!\n```\n\n```inputs\nname = \"world\"\n```\n\n```assertions\n- contains: \"hello\"\n```\n";

    fn compiled() -> CompiledPrompt {
        compile_source(SPEC, Path::new("greet.spec.md")).unwrap()
    }

    #[test]
    fn test_store_and_load_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_prompt(dir.path(), &compiled()).unwrap();
        assert!(path.ends_with("greet-user.spec.json"));

        let loaded = load_prompt_by_id(dir.path(), "greet-user").unwrap();
        assert_eq!(loaded.id, "greet-user");
        assert_eq!(loaded.prompt, "Hello {{name}}!\n");
    }

    #[test]
    fn test_unknown_id_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_prompt_by_id(dir.path(), "nope").unwrap_err();
        assert!(matches!(err, SpecformError::Io(_)));
    }

    #[test]
    fn test_use_prompt_evaluates_with_registry() {
        let dir = tempfile::tempdir().unwrap();
        store_prompt(dir.path(), &compiled()).unwrap();
        let registry = AssertionRegistry::default();

        let prompt = use_prompt(dir.path(), "greet-user", &registry).unwrap();
        assert!(prompt.assert_all("Hello there", None).passed());
    }

    #[test]
    fn test_from_snapshot_pairs_prompt_and_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = compiled();
        store_prompt(dir.path(), &prompt).unwrap();

        // no snapshot recorded yet
        assert!(matches!(
            from_snapshot(dir.path(), "greet-user").unwrap_err(),
            SpecformError::Io(_)
        ));

        let registry = AssertionRegistry::default();
        let results = registry.run_all("Hello there", &prompt.assertions, None);
        record_snapshot(dir.path(), &prompt, "Hello there", &results, &BTreeMap::new())
            .unwrap()
            .expect("recorded");

        let (loaded, snapshot) = from_snapshot(dir.path(), "greet-user").unwrap();
        assert_eq!(loaded.id, snapshot.id);
        assert_eq!(snapshot.output, "Hello there");
        assert!(snapshot.passed);
    }
}
