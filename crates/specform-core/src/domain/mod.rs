//! Domain models for Specform.
//!
//! Canonical definitions for the core entities:
//! - `CompiledPrompt`: structured record derived from one spec file
//! - `Assertion` / `AssertionResult`: declared checks and their outcomes
//! - `AssertionContext`: externally supplied side-data for evaluators

pub mod assertion;
pub mod digest;
pub mod prompt;

pub use assertion::{Assertion, AssertionContext, AssertionResult, DEFAULT_SIMILARITY_THRESHOLD};
pub use digest::{prompt_hash, slugify};
pub use prompt::{CompiledPrompt, SpecMeta};
