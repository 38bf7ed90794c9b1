//! Error types for schema file loading, registration and reporting.
//!
//! Provides a unified error type covering I/O, serialization, schema
//! registration and value decoding failures.

use argscope_core::{DecodeError, SchemaError};
use thiserror::Error;

/// Errors that can occur while loading or applying a command spec.
#[derive(Debug, Error)]
pub enum SpecError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension names no known format.
    #[error("unsupported spec format: {0}")]
    UnsupportedFormat(String),

    /// A command or subcommand has an empty name.
    #[error("command name cannot be empty")]
    EmptyCommandName,

    /// Registering an entry of `command` failed.
    #[error("invalid schema for `{command}`: {source}")]
    Registration {
        command: String,
        #[source]
        source: SchemaError,
    },

    /// The parser handed to a report was not built from this spec.
    #[error("parser does not match spec `{command}`: {detail}")]
    ParserMismatch { command: String, detail: String },

    /// A parsed value does not match its declared type.
    #[error("invalid value for `{name}`: {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },
}

/// Convenience alias for results with [`SpecError`].
pub type Result<T> = std::result::Result<T, SpecError>;
