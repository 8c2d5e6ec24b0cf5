//! Specform CLI
//!
//! The `specform` command compiles prompt scenario specs and checks model
//! outputs against their assertions.
//!
//! ## Commands
//!
//! - `compile`: Compile `.spec.md` files into `.prompt.json` artifacts
//! - `render`: Render a prompt with its inputs bound
//! - `test`: Evaluate a produced output against a prompt's assertions
//! - `snapshot`: Evaluate an output and record a snapshot if every assertion passed

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use specform_core::{
    compile_file, compile_to_dir, load_bindings, load_compiled_prompt, load_similarity_scores,
    record_snapshot, to_json_pretty, AssertionContext, AssertionRegistry, CompiledPrompt, Prompt,
    SPEC_SUFFIX,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "specform")]
#[command(version = specform_core::VERSION)]
#[command(about = "Compile, render and test prompt scenario specs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile spec files (or directories of them) into prompt artifacts
    Compile {
        /// Spec files or directories to search for `*.spec.md`
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output directory for `.prompt.json` artifacts
        #[arg(short, long, env = "SPECFORM_OUT_DIR", default_value = "build")]
        out_dir: PathBuf,

        /// Print compiled JSON instead of writing files
        #[arg(long)]
        stdout: bool,
    },

    /// Render a prompt with inputs bound
    Render {
        #[command(flatten)]
        source: PromptArgs,

        /// Leave unbound placeholders in place instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Evaluate an output against a prompt's assertions
    Test {
        #[command(flatten)]
        eval: EvalArgs,
    },

    /// Evaluate an output and record a snapshot when every assertion passes
    Snapshot {
        #[command(flatten)]
        eval: EvalArgs,

        /// Directory snapshots are written to
        #[arg(long = "out", env = "SPECFORM_SNAPSHOT_DIR", default_value = "snapshots")]
        out_dir: PathBuf,
    },
}

#[derive(Args)]
struct PromptArgs {
    /// Spec file (`.spec.md`) or compiled prompt (`.prompt.json`)
    #[arg(short, long)]
    prompt: PathBuf,

    /// JSON object file of input bindings
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Inline binding as key=value (repeatable, wins over --inputs)
    #[arg(long = "input", value_name = "KEY=VALUE")]
    input: Vec<String>,
}

#[derive(Args)]
struct EvalArgs {
    #[command(flatten)]
    source: PromptArgs,

    /// File holding the model output to evaluate
    #[arg(short, long)]
    output: PathBuf,

    /// JSON object file mapping expected text to a similarity score
    #[arg(long)]
    similarity: Option<PathBuf>,

    /// Pass threshold for semantic-similarity assertions
    #[arg(long, env = "SPECFORM_SIMILARITY_THRESHOLD")]
    threshold: Option<f64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    specform_core::telemetry::init_tracing(cli.json, level);

    let registry = AssertionRegistry::with_builtins();

    let passed = match cli.command {
        Commands::Compile {
            paths,
            out_dir,
            stdout,
        } => cmd_compile(&paths, &out_dir, stdout).map(|()| true)?,
        Commands::Render { source, lenient } => cmd_render(&source, lenient).map(|()| true)?,
        Commands::Test { eval } => cmd_test(&registry, &eval)?,
        Commands::Snapshot { eval, out_dir } => cmd_snapshot(&registry, &eval, &out_dir)?,
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}

/// Expand directories into the `*.spec.md` files beneath them, sorted.
fn collect_spec_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_dir(path, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {:?}", dir))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list directory {:?}", dir))?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(SPEC_SUFFIX))
        {
            files.push(path);
        }
    }
    Ok(())
}

/// Compile every spec under `paths`; individual failures are reported and skipped.
fn cmd_compile(paths: &[PathBuf], out_dir: &Path, stdout: bool) -> Result<()> {
    if stdout {
        if let Some(dir) = paths.iter().find(|p| p.is_dir()) {
            anyhow::bail!("--stdout takes spec files, not directories: {:?}", dir);
        }
    }

    let files = collect_spec_files(paths)?;
    if files.is_empty() {
        anyhow::bail!("No {} files found", SPEC_SUFFIX);
    }

    let mut failed = 0usize;
    for file in &files {
        let result = if stdout {
            compile_file(file)
                .and_then(|p| to_json_pretty(&p))
                .map(|json| println!("{}", json))
        } else {
            compile_to_dir(file, out_dir).map(|out| println!("✓ {} → {}", file.display(), out.display()))
        };

        if let Err(e) = result {
            eprintln!("✘ {}", e);
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} spec files failed to compile", failed, files.len());
    }
    Ok(())
}

/// Load a prompt from a spec file or a compiled artifact.
fn load_prompt(path: &Path) -> Result<CompiledPrompt> {
    let is_spec = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(SPEC_SUFFIX));

    if is_spec {
        compile_file(path).with_context(|| format!("Failed to compile {:?}", path))
    } else {
        load_compiled_prompt(path).with_context(|| format!("Failed to load prompt {:?}", path))
    }
}

fn load_prompt_bindings(args: &PromptArgs) -> Result<BTreeMap<String, String>> {
    load_bindings(args.inputs.as_deref(), &args.input).context("Failed to load input bindings")
}

fn cmd_render(args: &PromptArgs, lenient: bool) -> Result<()> {
    let compiled = load_prompt(&args.prompt)?;
    let bindings = load_prompt_bindings(args)?;
    let registry = AssertionRegistry::empty();
    let rendered = Prompt::new(compiled, &registry)
        .render(&bindings, !lenient)
        .context("Failed to render prompt")?;
    print!("{}", rendered);
    Ok(())
}

fn build_context(args: &EvalArgs) -> Result<AssertionContext> {
    let mut ctx = AssertionContext::default();
    if let Some(path) = &args.similarity {
        let scores = load_similarity_scores(path)
            .with_context(|| format!("Failed to load similarity scores {:?}", path))?;
        ctx = ctx.with_scores(scores);
    }
    if let Some(threshold) = args.threshold {
        ctx = ctx.with_threshold(threshold);
    }
    Ok(ctx)
}

/// Evaluated run shared by `test` and `snapshot`.
struct Evaluation {
    compiled: CompiledPrompt,
    output: String,
    bindings: BTreeMap<String, String>,
    results: Vec<specform_core::AssertionResult>,
    passed: bool,
}

fn evaluate(registry: &AssertionRegistry, args: &EvalArgs) -> Result<Evaluation> {
    let compiled = load_prompt(&args.source.prompt)?;
    let bindings = load_prompt_bindings(&args.source)?;
    let output = fs::read_to_string(&args.output)
        .with_context(|| format!("Failed to read output {:?}", args.output))?;
    let ctx = build_context(args)?;

    let prompt = Prompt::new(compiled, registry);
    let report = prompt.assert_all(&output, Some(&ctx));
    for message in report.messages() {
        println!("{}", message);
    }
    println!(
        "{}/{} assertions passed",
        report.passed_count(),
        report.results.len()
    );

    let passed = report.passed();
    Ok(Evaluation {
        compiled: prompt.into_compiled(),
        output,
        bindings,
        results: report.into_results(),
        passed,
    })
}

fn cmd_test(registry: &AssertionRegistry, args: &EvalArgs) -> Result<bool> {
    Ok(evaluate(registry, args)?.passed)
}

fn cmd_snapshot(registry: &AssertionRegistry, args: &EvalArgs, out_dir: &Path) -> Result<bool> {
    let run = evaluate(registry, args)?;
    let written = record_snapshot(
        out_dir,
        &run.compiled,
        &run.output,
        &run.results,
        &run.bindings,
    )
    .context("Failed to save snapshot")?;

    match written {
        Some(path) => {
            println!("Snapshot saved to {}", path.display());
            Ok(true)
        }
        None => {
            debug!(id = %run.compiled.id, "snapshot not recorded");
            println!("Assertions failed; snapshot not saved");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = "---\nscenario: \"Greet user\"\n---\n\n```prompt\nHello {{name}}!\n```\n\n```inputs\nname = \"world\"\n```\n\n```assertions\n- contains: \"hello\"\n```\n";

    fn eval_args(prompt: PathBuf, output: PathBuf) -> EvalArgs {
        EvalArgs {
            source: PromptArgs {
                prompt,
                inputs: None,
                input: vec!["name=there".to_string()],
            },
            output,
            similarity: None,
            threshold: None,
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_collect_spec_files_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("b.spec.md"), SPEC).unwrap();
        fs::write(nested.join("a.spec.md"), SPEC).unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let files = collect_spec_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files, vec![dir.path().join("b.spec.md"), nested.join("a.spec.md")]);
    }

    #[test]
    fn test_compile_writes_artifacts_and_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let specs = dir.path().join("specs");
        fs::create_dir_all(&specs).unwrap();
        fs::write(specs.join("greet.spec.md"), SPEC).unwrap();

        let out = dir.path().join("build");
        cmd_compile(&[specs.clone()], &out, false).unwrap();
        assert!(out.join("greet.spec.prompt.json").exists());

        fs::write(specs.join("broken.spec.md"), "no prompt").unwrap();
        let err = cmd_compile(&[specs.clone()], &out, false).unwrap_err();
        assert!(err.to_string().contains("1 of 2"));

        assert!(cmd_compile(&[specs], &out, true).is_err());
    }

    #[test]
    fn test_load_prompt_accepts_spec_or_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("greet.spec.md");
        fs::write(&spec, SPEC).unwrap();
        let from_spec = load_prompt(&spec).unwrap();

        let artifact = compile_to_dir(&spec, dir.path()).unwrap();
        let from_artifact = load_prompt(&artifact).unwrap();
        assert_eq!(from_spec.id, "greet-user");
        assert_eq!(from_artifact.id, from_spec.id);
        assert_eq!(from_artifact.prompt, from_spec.prompt);
    }

    #[test]
    fn test_snapshot_recorded_only_when_passing() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("greet.spec.md");
        fs::write(&spec, SPEC).unwrap();
        let registry = AssertionRegistry::with_builtins();
        let snapshots = dir.path().join("snapshots");

        let good = dir.path().join("good.txt");
        fs::write(&good, "Hello there!").unwrap();
        assert!(cmd_snapshot(&registry, &eval_args(spec.clone(), good), &snapshots).unwrap());
        let snap = specform_core::load_snapshot(&snapshots.join("greet-user.snap.json")).unwrap();
        assert_eq!(snap.inputs["name"], "there");

        let bad = dir.path().join("bad.txt");
        fs::write(&bad, "Goodbye").unwrap();
        let args = eval_args(spec, bad);
        assert!(!cmd_test(&registry, &args).unwrap());
        assert!(!cmd_snapshot(&registry, &args, &dir.path().join("other")).unwrap());
        assert!(!dir.path().join("other").exists());
    }

    #[test]
    fn test_build_context_applies_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let scores = dir.path().join("scores.json");
        fs::write(&scores, r#"{"greeting": 0.7}"#).unwrap();

        let mut args = eval_args(PathBuf::from("x.spec.md"), PathBuf::from("out.txt"));
        args.similarity = Some(scores);
        args.threshold = Some(0.6);
        let ctx = build_context(&args).unwrap();
        assert_eq!(ctx.score_for("greeting"), 0.7);
        assert_eq!(ctx.effective_threshold(), 0.6);
    }
}
