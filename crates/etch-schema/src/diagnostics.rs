//! Error types
//!
//! Only the plumbing around the pipeline is fallible: reading and parsing
//! source files, compiling glob patterns and loading configuration. The
//! generation entry points themselves degrade to omission and never
//! surface these errors to their callers.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for etch-schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Main error type for etch-schema
#[derive(Debug, Error)]
pub enum SchemaError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TypeScript parse error
    #[error("TypeScript parse error in {file}: {message}")]
    TypeScriptParse { file: PathBuf, message: String },

    /// The parsed source was a script rather than an ES module
    #[error("Expected a module but got a script: {0}")]
    NotAModule(PathBuf),

    /// Invalid path (deno_ast needs absolute file paths)
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid glob pattern
    #[error("Invalid glob pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SchemaError {
    /// Create a TypeScript parse error for a file
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        SchemaError::TypeScriptParse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a glob pattern error
    pub fn pattern(pattern: impl Into<String>, message: impl ToString) -> Self {
        SchemaError::Pattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        SchemaError::Config(message.into())
    }
}
