use thiserror::Error;

/// Reading or writing a slot of a [`ParsedArgs`](super::ParsedArgs).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccessError {
    #[error("Unknown argument '{0}'.")]
    Unknown(String),

    #[error("Argument '{0}' has not been set.")]
    Unset(String),

    #[error("Argument '{name}' holds a {found}, which cannot be read as {expected}.")]
    Type {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}
