//! Compiled prompt record and the frontmatter metadata it is built from.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::assertion::Assertion;

/// Metadata read from a spec file's frontmatter header.
///
/// Unrecognized keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpecMeta {
    /// Human-readable scenario title; the prompt id is derived from it.
    pub scenario: String,
    pub feature: String,
    pub model: String,
    pub temperature: Option<f64>,
    pub tags: Vec<String>,
}

/// The structured record produced by compiling one spec file.
///
/// Serialized field names follow the `.prompt.json` format consumed by the
/// SDKs, so renames here are format changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompiledPrompt {
    /// Slug of the scenario title.
    pub id: String,

    /// SHA256 hex digest of `id`.
    pub hash: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub feature: String,

    #[serde(default)]
    pub scenario: String,

    /// Template text containing `{{name}}` placeholders.
    #[serde(rename = "compiledPrompt")]
    pub prompt: String,

    /// Declared input names in declaration order. May contain repeats.
    #[serde(default, deserialize_with = "null_as_default")]
    pub inputs: Vec<String>,

    /// Declared default values keyed by input name.
    #[serde(rename = "defaultInputs", default, deserialize_with = "null_as_default")]
    pub values: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertions: Vec<Assertion>,

    /// Expected-output fixture copied from the `output` block.
    #[serde(rename = "snapshot", default, skip_serializing_if = "Option::is_none")]
    pub snapshot_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub model: String,

    /// Omitted when unset or zero.
    #[serde(default, skip_serializing_if = "is_unset_temperature")]
    pub temperature: Option<f64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
}

impl CompiledPrompt {
    /// Declared input names with duplicates removed, first occurrence kept.
    pub fn unique_inputs(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.inputs
            .iter()
            .map(String::as_str)
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

fn is_unset_temperature(temperature: &Option<f64>) -> bool {
    temperature.map_or(true, |t| t == 0.0)
}

// Older compilers wrote `null` for absent inputs blocks.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
