//! Configuration model for arbor.
//!
//! This module defines the Config struct that represents `.arbor.yaml` in the
//! primary worktree. It supports forward-compatible YAML parsing (unknown
//! fields are ignored), defaults for every field, and validation.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::CONFIG_FILE_NAME;
