use thiserror::Error;

/// A declaration that cannot be turned into a parser.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("Invalid argument name '{0}'.")]
    InvalidName(String),

    #[error("Argument name '{0}' is reserved.")]
    ReservedName(String),

    #[error("Unknown argument '{0}'.")]
    UnknownArgument(String),

    #[error("Argument '{0}' has an empty flag list.")]
    EmptyFlags(String),

    #[error("Invalid flag '{flag}' on '{name}'.")]
    InvalidFlag { name: String, flag: String },

    #[error("Flag '{flag}' of '{name}' is already used by '{owner}'.")]
    DuplicateFlag {
        name: String,
        flag: String,
        owner: String,
    },

    #[error("Argument '{0}' is required but declares a default.")]
    RequiredWithDefault(String),

    #[error("Default of '{name}' does not fit type {expected}.")]
    DefaultTypeMismatch { name: String, expected: String },

    #[error("Variadic argument '{0}' must be the last positional.")]
    VariadicNotLast(String),

    #[error("Variadic argument '{name}' must have a list type, got {found}.")]
    VariadicType { name: String, found: String },

    #[error("Required positional '{name}' follows optional positional '{after}'.")]
    RequiredAfterOptional { name: String, after: String },

    #[error("Alias '{flag}' declared on '{name}', which does not take a single flag value.")]
    AliasOnNonFlag { name: String, flag: String },

    #[error("Alias '{flag}' of '{name}' maps to {value}, which does not fit type {expected}.")]
    AliasTypeMismatch {
        name: String,
        flag: String,
        value: String,
        expected: String,
    },

    #[error("Positional '{name}' cannot join exclusive group '{group}'.")]
    PositionalInExclusive { name: String, group: String },

    #[error("Exclusive group '{group}' has more than one required member: {members}.")]
    ExclusiveRequired { group: String, members: String },

    #[error("Invalid subcommand name '{0}'.")]
    InvalidSubcommand(String),

    #[error("In subcommand '{command}': {source}")]
    InSubcommand {
        command: String,
        #[source]
        source: Box<CompileError>,
    },
}
