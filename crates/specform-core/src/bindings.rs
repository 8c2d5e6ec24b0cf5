//! Input bindings and similarity scores supplied from outside a spec.
//!
//! Bindings come from an optional JSON object file plus `key=value` pairs;
//! inline pairs are applied last and win over file values.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::{Result, SpecformError};

/// Split one `key=value` pair on its first `=`.
///
/// The value may itself contain `=`. A pair without `=` is rejected.
pub fn parse_inline_binding(pair: &str) -> Result<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(SpecformError::InvalidInlineInput(pair.to_string())),
    }
}

/// Merge bindings from an optional JSON file and inline `key=value` pairs.
pub fn load_bindings(json_path: Option<&Path>, inline: &[String]) -> Result<BTreeMap<String, String>> {
    let mut bindings = match json_path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            serde_json::from_str::<BTreeMap<String, String>>(&content)?
        }
        None => BTreeMap::new(),
    };

    for pair in inline {
        let (key, value) = parse_inline_binding(pair)?;
        bindings.insert(key, value);
    }
    Ok(bindings)
}

/// Load precomputed similarity scores: a JSON object of expected text to score.
pub fn load_similarity_scores(path: &Path) -> Result<HashMap<String, f64>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
