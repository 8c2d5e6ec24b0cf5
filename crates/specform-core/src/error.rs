//! Error taxonomy for Specform.

use std::path::PathBuf;

/// Errors produced while compiling, rendering, evaluating or persisting specs.
#[derive(Debug, thiserror::Error)]
pub enum SpecformError {
    #[error("failed to parse frontmatter: {0}")]
    Frontmatter(String),

    #[error("no prompt found in spec file")]
    MissingPrompt,

    #[error("unclosed multiline string for key: {key}")]
    UnclosedMultilineInput { key: String },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<SpecformError>,
    },

    #[error("missing required inputs: {}", missing.join(", "))]
    MissingInputs { missing: Vec<String> },

    #[error("invalid prompt template: {0}")]
    TemplateSyntax(String),

    #[error("assertion {kind} already registered")]
    DuplicateAssertion { kind: String },

    #[error("assertion {kind} not found")]
    UnknownAssertionKind { kind: String },

    #[error("invalid regex {pattern}: {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("invalid inline input (expected key=value): {0}")]
    InvalidInlineInput(String),

    #[error("vector length mismatch ({left} != {right})")]
    DimensionMismatch { left: usize, right: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SpecformError {
    /// Attach the source path of the document being compiled.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        SpecformError::Parse {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, unwrapping any `Parse` layers.
    pub fn root(&self) -> &SpecformError {
        match self {
            SpecformError::Parse { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type for Specform operations.
pub type Result<T> = std::result::Result<T, SpecformError>;
