use thiserror::Error;

/// A coerced value rejected by the validator of its argument.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid value '{value}' for '{attr}': {reason}.")]
pub struct ValidationError {
    pub attr: String,
    pub value: String,
    pub reason: String,
}
