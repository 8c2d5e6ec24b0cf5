use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use specform_core::{
    compile_file, compile_source, compile_to_dir, load_compiled_prompt, render_prompt, Assertion,
    AssertionContext, AssertionRegistry, Prompt, RenderOptions, SpecformError,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

const ARTICLE: &str = "Webhooks let one system notify another in real time.\n\
                       They deliver events over HTTP as they happen.";

// ── Compilation ─────────────────────────────────────────────────────────

#[test]
fn summarize_fixture_compiles() {
    let p = compile_file(&fixture("summarize.spec.md")).expect("compile");
    assert_eq!(p.id, "summarize-a-technical-article");
    assert_eq!(p.inputs, vec!["article", "tone"]);
    assert_eq!(p.values["tone"], "casual");
    assert_eq!(p.values["article"], ARTICLE);
    assert_eq!(p.assertions, vec![Assertion::new("contains", "real time")]);
    assert_eq!(p.tags, vec!["summarization", "smoke"]);
    assert_eq!(p.temperature, Some(0.2));
}

#[test]
fn toml_frontmatter_fixture_compiles() {
    let p = compile_file(&fixture("webhooks.spec.md")).expect("compile");
    assert_eq!(p.id, "explain-webhooks");
    assert_eq!(p.model, "gpt-4o");
    assert_eq!(p.tags, vec!["docs"]);
    assert_eq!(p.assertions.len(), 4);
    assert_eq!(
        p.snapshot_ref.as_deref(),
        Some("Webhooks allow real-time HTTP communication between systems.\n")
    );
}

#[test]
fn compiling_twice_yields_identical_content() {
    let text = std::fs::read_to_string(fixture("summarize.spec.md")).unwrap();
    let a = compile_source(&text, Path::new("summarize.spec.md")).unwrap();
    let b = compile_source(&text, Path::new("summarize.spec.md")).unwrap();
    assert_eq!(a.id, b.id);
    assert_eq!(a.hash, b.hash);
    assert_eq!(a.prompt, b.prompt);
    assert_eq!(a.inputs, b.inputs);
    assert_eq!(a.values, b.values);
    assert_eq!(a.assertions, b.assertions);
}

#[test]
fn missing_prompt_fixture_fails() {
    let err = compile_file(&fixture("missing_prompt.spec.md")).unwrap_err();
    assert!(matches!(err.root(), SpecformError::MissingPrompt));
    assert!(err.to_string().contains("missing_prompt.spec.md"));
}

#[test]
fn invalid_frontmatter_fixture_fails() {
    let err = compile_file(&fixture("invalid_frontmatter.spec.md")).unwrap_err();
    assert!(matches!(err.root(), SpecformError::Frontmatter(_)));
}

#[test]
fn unclosed_inputs_fixture_names_key() {
    let err = compile_file(&fixture("unclosed_inputs.spec.md")).unwrap_err();
    assert!(matches!(
        err.root(),
        SpecformError::UnclosedMultilineInput { key } if key == "article"
    ));
}

#[test]
fn compiled_artifact_uses_external_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let out = compile_to_dir(&fixture("summarize.spec.md"), dir.path()).unwrap();
    assert_eq!(out.file_name().unwrap(), "summarize.spec.prompt.json");

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    for key in &[
        "id",
        "hash",
        "feature",
        "scenario",
        "compiledPrompt",
        "inputs",
        "defaultInputs",
        "assertions",
        "tags",
        "model",
        "temperature",
        "createdAt",
        "updatedAt",
        "sourcePath",
    ] {
        assert!(v.get(*key).is_some(), "missing key: {}", key);
    }
    // no output block in this fixture
    assert!(v.get("snapshot").is_none());
    assert_eq!(v["assertions"][0]["type"], "contains");
    assert_eq!(v["assertions"][0]["value"], "real time");

    let loaded = load_compiled_prompt(&out).unwrap();
    assert_eq!(loaded.values["article"], ARTICLE);
}

// ── Rendering ───────────────────────────────────────────────────────────

#[test]
fn render_with_no_overrides_uses_defaults() {
    let p = compile_file(&fixture("summarize.spec.md")).unwrap();
    let rendered = render_prompt(&p, &BTreeMap::new(), RenderOptions::strict()).unwrap();
    assert_eq!(
        rendered,
        format!("Summarize the following article in a casual tone.\n\n{}\n", ARTICLE)
    );
}

#[test]
fn strict_render_lists_every_missing_name() {
    let mut p = compile_file(&fixture("summarize.spec.md")).unwrap();
    p.values.clear();
    let bindings = BTreeMap::from([("article".to_string(), "text".to_string())]);

    let err = render_prompt(&p, &bindings, RenderOptions::strict()).unwrap_err();
    match err {
        SpecformError::MissingInputs { missing } => assert_eq!(missing, vec!["tone"]),
        other => panic!("expected MissingInputs, got {other:?}"),
    }

    let lenient = render_prompt(&p, &bindings, RenderOptions::lenient()).unwrap();
    assert!(lenient.contains("{{ tone }}"));
    assert!(lenient.contains("text"));
}

// ── Evaluation ──────────────────────────────────────────────────────────

#[test]
fn webhooks_scenario_evaluates_in_declaration_order() {
    let registry = AssertionRegistry::default();
    let prompt = Prompt::new(compile_file(&fixture("webhooks.spec.md")).unwrap(), &registry);
    let output = "Webhooks allow real-time HTTP communication between systems.";
    let ctx = AssertionContext::default()
        .with_scores([("event-driven communication".to_string(), 0.92)]);

    let report = prompt.assert_all(output, Some(&ctx));
    let kinds: Vec<&str> = report.results.iter().map(|r| r.kind.as_str()).collect();
    assert_eq!(kinds, vec!["contains", "matches", "semantic-similarity", "equals"]);
    let passed: Vec<bool> = report.results.iter().map(|r| r.passed).collect();
    assert_eq!(passed, vec![true, true, true, false]);
    assert!(!report.passed());
    assert!(report.results.iter().all(|r| r.message.starts_with('✔') || r.message.starts_with('✘')));
}

#[test]
fn semantic_similarity_without_scores_fails() {
    let registry = AssertionRegistry::default();
    let prompt = Prompt::new(compile_file(&fixture("webhooks.spec.md")).unwrap(), &registry);
    let r = prompt
        .assert_one("semantic-similarity", "anything", None)
        .unwrap();
    assert!(!r.passed);
}
