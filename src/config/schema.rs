use super::ConfigError;
use crate::argument::Argument;
use crate::spec::ArgSpec;
use crate::types::{ScalarKind, Value, ValueType};
use crate::validator::Validator;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Declarative validator subset available to schema files.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidateDecl {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub positive: Option<bool>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub one_of: Vec<String>,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub suffix: Vec<String>,
    pub exists: bool,
    pub file: bool,
    pub dir: bool,
    pub allow_empty: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArgumentDecl {
    pub flags: Vec<String>,
    pub positional: bool,
    pub variadic: bool,
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub default: Option<Value>,
    pub required: bool,
    pub help: Option<String>,
    pub metavar: Option<String>,
    pub group: Option<String>,
    pub exclusive: Option<String>,
    pub hidden: bool,
    pub aliases: IndexMap<String, Value>,
    pub validate: Option<ValidateDecl>,
}

/// An [`ArgSpec`] written as a document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaFile {
    pub name: Option<String>,
    pub about: Option<String>,
    pub usage: Option<String>,
    pub epilog: Option<String>,
    pub arguments: IndexMap<String, ArgumentDecl>,
    pub commands: IndexMap<String, SchemaFile>,
    pub subcommand_required: bool,
}

impl SchemaFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        super::load(path)
    }

    /// Builds the declaration. `fallback_name` is used when the file names none.
    pub fn into_spec(self, fallback_name: &str) -> Result<ArgSpec, ConfigError> {
        let mut spec = ArgSpec::new(self.name.unwrap_or_else(|| fallback_name.to_string()));
        if let Some(about) = self.about {
            spec = spec.about(about);
        }
        if let Some(usage) = self.usage {
            spec = spec.usage(usage);
        }
        if let Some(epilog) = self.epilog {
            spec = spec.epilog(epilog);
        }
        for (name, decl) in self.arguments {
            spec = spec.arg(decl.into_argument(&name)?);
        }
        for (command, child) in self.commands {
            let child = child.into_spec(&command)?;
            spec = spec.subcommand(command, child);
        }
        Ok(spec.subcommand_required(self.subcommand_required))
    }
}

impl ArgumentDecl {
    pub fn into_argument(self, name: &str) -> Result<Argument, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidDeclaration {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let value_type = match &self.value_type {
            Some(expr) => expr.parse::<ValueType>().map_err(|source| ConfigError::InvalidType {
                name: name.to_string(),
                source,
            })?,
            None if self.positional || self.variadic => ValueType::STR,
            None => ValueType::BOOL,
        };

        let has_flags = !self.flags.is_empty();
        let mut argument = match (has_flags, self.positional, self.variadic) {
            (true, false, false) => Argument::flag(name, self.flags, value_type),
            (false, true, false) => Argument::positional(name, value_type),
            (false, false, true) => match value_type {
                ValueType::List(kind) | ValueType::Scalar(kind) => Argument::variadic(name, kind),
                other => {
                    return Err(invalid(&format!("variadic arguments take a list type, got {other}")));
                }
            },
            (false, false, false) => return Err(invalid("needs flags, positional or variadic")),
            _ => return Err(invalid("flags, positional and variadic are mutually exclusive")),
        };

        if let Some(decl) = self.validate {
            let validator = decl.build(name, argument.value_type())?;
            argument = argument.with_validator(validator);
        }
        if let Some(default) = self.default {
            argument = argument.with_default(default);
        }
        if self.required {
            argument = argument.required();
        }
        if let Some(help) = self.help {
            argument = argument.with_help(help);
        }
        if let Some(metavar) = self.metavar {
            argument = argument.with_metavar(metavar);
        }
        if let Some(group) = self.group {
            argument = argument.with_group(group);
        }
        if let Some(exclusive) = self.exclusive {
            argument = argument.with_exclusive(exclusive);
        }
        if self.hidden {
            argument = argument.hidden();
        }
        for (flag, value) in self.aliases {
            argument = argument.with_alias(flag, value);
        }
        Ok(argument)
    }
}

impl ValidateDecl {
    /// Validator for an argument of `value_type`. Keys that do not apply to
    /// the type are rejected.
    pub fn build(self, name: &str, value_type: &ValueType) -> Result<Validator, ConfigError> {
        let (value_type, optional) = match value_type {
            ValueType::Optional(inner) => (inner.as_ref(), true),
            other => (other, false),
        };
        let unsupported = |key: &str| ConfigError::InvalidDeclaration {
            name: name.to_string(),
            reason: format!("'{key}' does not apply to {value_type}"),
        };
        let numeric = self.min.is_some() || self.max.is_some() || self.positive.is_some();
        let string = self.pattern.is_some()
            || !self.one_of.is_empty()
            || self.starts_with.is_some()
            || self.ends_with.is_some();
        let path = !self.suffix.is_empty() || self.exists || self.file || self.dir;
        let length = self.min_length.is_some() || self.max_length.is_some();

        let validator: Validator = match value_type {
            ValueType::Scalar(ScalarKind::Int) => {
                reject(string, "pattern", &unsupported)?;
                reject(path || length, "suffix", &unsupported)?;
                let mut v = Validator::int();
                if numeric {
                    v = v.in_range(self.min.map(|m| m.ceil() as i64), self.max.map(|m| m.floor() as i64));
                }
                if let Some(include_zero) = self.positive {
                    v = v.positive(include_zero);
                }
                if optional { v.optional().into() } else { v.into() }
            }
            ValueType::Scalar(ScalarKind::Float) => {
                reject(string, "pattern", &unsupported)?;
                reject(path || length, "suffix", &unsupported)?;
                let mut v = Validator::float();
                if self.min.is_some() || self.max.is_some() {
                    v = v.in_range_closed(self.min, self.max);
                }
                if let Some(include_zero) = self.positive {
                    v = v.positive(include_zero);
                }
                if optional { v.optional().into() } else { v.into() }
            }
            ValueType::Scalar(ScalarKind::Str) | ValueType::Literal { .. } => {
                reject(numeric, "min", &unsupported)?;
                reject(path, "suffix", &unsupported)?;
                let mut v = Validator::str();
                if length {
                    v = v.length_in_range(self.min_length, self.max_length);
                }
                if let Some(pattern) = &self.pattern {
                    v = v.pattern(pattern).map_err(|source| ConfigError::InvalidPattern {
                        name: name.to_string(),
                        source,
                    })?;
                }
                if !self.one_of.is_empty() {
                    v = v.one_of(self.one_of);
                }
                if let Some(prefix) = self.starts_with {
                    v = v.starts_with(prefix);
                }
                if let Some(suffix) = self.ends_with {
                    v = v.ends_with(suffix);
                }
                if optional { v.optional().into() } else { v.into() }
            }
            ValueType::Scalar(ScalarKind::Path) => {
                reject(numeric, "min", &unsupported)?;
                reject(string || length, "pattern", &unsupported)?;
                let mut v = Validator::path();
                if !self.suffix.is_empty() {
                    v = v.is_suffix(self.suffix);
                }
                if self.exists {
                    v = v.is_exists();
                }
                if self.file {
                    v = v.is_file();
                }
                if self.dir {
                    v = v.is_dir();
                }
                if optional { v.optional().into() } else { v.into() }
            }
            ValueType::List(kind) => {
                reject(numeric || string || path, "min", &unsupported)?;
                let mut v = Validator::list(Some(*kind));
                if length {
                    v = v.length_in_range(self.min_length, self.max_length);
                }
                if let Some(allow) = self.allow_empty {
                    v = v.allow_empty(allow);
                }
                if optional { v.optional().into() } else { v.into() }
            }
            other => return Err(unsupported(&format!("validate on {other}"))),
        };
        Ok(validator)
    }
}

fn reject(present: bool, key: &str, unsupported: &impl Fn(&str) -> ConfigError) -> Result<(), ConfigError> {
    if present { Err(unsupported(key)) } else { Ok(()) }
}
