use thiserror::Error;

/// A raw token that could not be converted to its declared type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot convert '{raw}' to {expected}: {reason}.")]
pub struct CoercionError {
    pub raw: String,
    pub expected: String,
    pub reason: String,
}

impl CoercionError {
    pub fn new(raw: &str, expected: impl ToString, reason: impl Into<String>) -> Self {
        Self {
            raw: raw.to_string(),
            expected: expected.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeSyntaxError {
    #[error("Unknown type name: {0}.")]
    UnknownType(String),

    #[error("Malformed type expression '{expr}': {reason}.")]
    Malformed { expr: String, reason: String },
}
