use thiserror::Error;

use crate::types::errors::{CoercionError, TypeSyntaxError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File error: {0}.")]
    FileError(String),

    #[error("Unsupported file format: {0}.")]
    UnsupportedFormat(String),

    #[error("Failed to parse {file}: {reason}")]
    Parse { file: String, reason: String },

    #[error("Unknown argument in defaults: {0}.")]
    UnknownArgument(String),

    #[error("Unknown subcommand in defaults: {0}.")]
    UnknownSubcommand(String),

    #[error("Default for '{name}' is invalid: {source}")]
    InvalidDefault {
        name: String,
        #[source]
        source: CoercionError,
    },

    #[error("Type of '{name}' is invalid: {source}")]
    InvalidType {
        name: String,
        #[source]
        source: TypeSyntaxError,
    },

    #[error("Declaration of '{name}' is invalid: {reason}.")]
    InvalidDeclaration { name: String, reason: String },

    #[error("Pattern of '{name}' is invalid: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}
