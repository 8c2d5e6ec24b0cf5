//! Template renderer: substitutes `{{name}}` placeholders with input bindings.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::domain::CompiledPrompt;
use crate::error::{Result, SpecformError};
use crate::obs::emit_render_completed;

/// Rendering policy for unresolved inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Every declared input must be bound (by default or override), and every
    /// placeholder must resolve. When false, unresolved placeholders are left
    /// in the output verbatim.
    pub strict: bool,
}

impl RenderOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("valid regex"))
}

/// Declared defaults overlaid with caller bindings (caller wins).
pub fn effective_bindings(
    prompt: &CompiledPrompt,
    bindings: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = prompt.values.clone();
    merged.extend(bindings.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Declared inputs with no effective binding, in declaration order.
pub fn missing_inputs(prompt: &CompiledPrompt, effective: &BTreeMap<String, String>) -> Vec<String> {
    prompt
        .unique_inputs()
        .into_iter()
        .filter(|name| !effective.contains_key(*name))
        .map(str::to_string)
        .collect()
}

/// Reject `{{` sequences that are not a single bare identifier.
pub fn validate_template(template: &str) -> Result<()> {
    let stripped = placeholder_pattern().replace_all(template, "");
    if let Some(pos) = stripped.find("{{") {
        let snippet: String = stripped[pos..].chars().take(24).collect();
        return Err(SpecformError::TemplateSyntax(format!(
            "unsupported placeholder near `{}`",
            snippet.trim_end()
        )));
    }
    Ok(())
}

/// Render `prompt` with `bindings` overlaid on its declared defaults.
pub fn render_prompt(
    prompt: &CompiledPrompt,
    bindings: &BTreeMap<String, String>,
    options: RenderOptions,
) -> Result<String> {
    validate_template(&prompt.prompt)?;
    let effective = effective_bindings(prompt, bindings);

    if options.strict {
        let missing = missing_inputs(prompt, &effective);
        if !missing.is_empty() {
            return Err(SpecformError::MissingInputs { missing });
        }

        // Placeholders for names that were never declared.
        let mut undeclared: Vec<String> = Vec::new();
        for caps in placeholder_pattern().captures_iter(&prompt.prompt) {
            let name = &caps[1];
            if !effective.contains_key(name) && !undeclared.iter().any(|n| n == name) {
                undeclared.push(name.to_string());
            }
        }
        if !undeclared.is_empty() {
            return Err(SpecformError::MissingInputs {
                missing: undeclared,
            });
        }
    }

    let rendered = placeholder_pattern()
        .replace_all(&prompt.prompt, |caps: &Captures<'_>| {
            effective
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned();

    emit_render_completed(&prompt.id, options.strict, rendered.len());
    Ok(rendered)
}
