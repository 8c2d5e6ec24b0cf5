//! Identifier and digest derivation for compiled prompts.

use sha2::{Digest, Sha256};

/// Derive a prompt id from a scenario title: lowercase, spaces become hyphens.
pub fn slugify(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}

/// SHA256 hex digest of a prompt id.
pub fn prompt_hash(id: &str) -> String {
    hex::encode(Sha256::digest(id.as_bytes()))
}
