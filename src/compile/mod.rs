//! Declaration compiler: resolves an [`ArgSpec`] into a [`ParserPlan`].
//!
//! All structural checks happen here so that realising the plan as a
//! `clap::Command` never trips the engine's own debug assertions.

mod command;
pub mod errors;
mod plan;

pub use errors::CompileError;
pub use plan::{AliasEntry, Arity, Cluster, Field, FlagSet, ParserPlan, Placement};

use crate::argument::{ArgKind, Argument};
use crate::spec::ArgSpec;
use crate::types::{Value, ValueType};
use indexmap::IndexMap;
use plan::ParsedFlag;

const HELP_OWNER: &str = "help";

pub fn compile(spec: &ArgSpec) -> Result<ParserPlan, CompileError> {
    tracing::debug!(command = spec.name(), arguments = spec.len(), "compiling declaration");

    let mut seen_flags: IndexMap<ParsedFlag, String> = IndexMap::new();
    seen_flags.insert(ParsedFlag::Short('h'), HELP_OWNER.to_string());
    seen_flags.insert(ParsedFlag::Long("help".to_string()), HELP_OWNER.to_string());

    let mut fields = Vec::new();
    let mut aliases = Vec::new();
    let mut headings: Vec<String> = Vec::new();
    let mut positional_count = 0;
    let mut optional_positional: Option<String> = None;
    let mut variadic: Option<String> = None;

    for argument in spec.arguments() {
        let name = argument.name();
        check_name(name)?;

        if let Some(after) = &variadic {
            if argument.is_positional() {
                return Err(CompileError::VariadicNotLast(after.clone()));
            }
        }
        if argument.is_required() && argument.default().is_some() {
            return Err(CompileError::RequiredWithDefault(name.to_string()));
        }
        let default = conform_default(argument)?;

        let (placement, arity) = match argument.kind() {
            ArgKind::Flags(flags) => {
                let set = register_flags(name, flags, &mut seen_flags)?;
                let arity = if argument.is_switch() {
                    Arity::Switch
                } else if argument.value_type().is_list() {
                    Arity::Many
                } else {
                    Arity::One
                };
                (Placement::Flag(set), arity)
            }
            ArgKind::Positional => {
                if argument.value_type().is_list() {
                    tracing::warn!(argument = name, "list typed positional takes a single comma separated token");
                }
                (Placement::Positional(positional_count), Arity::One)
            }
            ArgKind::Variadic => {
                if !argument.value_type().is_list() {
                    return Err(CompileError::VariadicType {
                        name: name.to_string(),
                        found: argument.value_type().to_string(),
                    });
                }
                variadic = Some(name.to_string());
                (Placement::Positional(positional_count), Arity::Many)
            }
        };

        let required = match argument.kind() {
            ArgKind::Flags(_) | ArgKind::Variadic => argument.is_required(),
            ArgKind::Positional => {
                argument.is_required() || (default.is_none() && !argument.value_type().is_optional())
            }
        };
        if argument.is_positional() {
            positional_count += 1;
            if required {
                if let Some(after) = &optional_positional {
                    return Err(CompileError::RequiredAfterOptional {
                        name: name.to_string(),
                        after: after.clone(),
                    });
                }
            } else if optional_positional.is_none() {
                optional_positional = Some(name.to_string());
            }
        }

        if !argument.aliases().is_empty() && (arity != Arity::One || argument.is_positional()) {
            let flag = argument.aliases().keys().next().cloned().unwrap_or_default();
            return Err(CompileError::AliasOnNonFlag {
                name: name.to_string(),
                flag,
            });
        }
        for (flag, value) in argument.aliases() {
            let value = conform_alias(argument, flag, value)?;
            let flags = register_flags(name, std::slice::from_ref(flag), &mut seen_flags)?;
            aliases.push(AliasEntry {
                id: format!("{name}:alias:{}", aliases.len()),
                flags,
                target: name.to_string(),
                value,
            });
        }

        if let Some(group) = argument.group() {
            if !headings.iter().any(|h| h == group) {
                headings.push(group.to_string());
            }
        }

        fields.push(Field {
            help: render_help(argument),
            heading: argument.group().map(str::to_string),
            argument: argument.clone(),
            placement,
            arity,
            required,
            default,
        });
    }

    let clusters = build_clusters(&mut fields, &aliases)?;

    let mut subcommands = IndexMap::new();
    for (command, child) in spec.subcommands() {
        if command.is_empty() || command.starts_with('-') || command.contains(char::is_whitespace) {
            return Err(CompileError::InvalidSubcommand(command.clone()));
        }
        let plan = compile(child).map_err(|source| CompileError::InSubcommand {
            command: command.clone(),
            source: Box::new(source),
        })?;
        subcommands.insert(command.clone(), plan);
    }

    tracing::trace!(
        command = spec.name(),
        fields = fields.len(),
        aliases = aliases.len(),
        clusters = clusters.len(),
        "declaration compiled"
    );

    Ok(ParserPlan {
        name: spec.name().to_string(),
        about: spec.about_text().map(str::to_string),
        usage: spec.usage_text().map(str::to_string),
        epilog: spec.epilog_text().map(str::to_string),
        fields,
        aliases,
        headings,
        clusters,
        subcommands,
        subcommand_required: spec.is_subcommand_required(),
    })
}

/// Rust identifier rules, ASCII only.
fn check_name(name: &str) -> Result<(), CompileError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(CompileError::InvalidName(name.to_string()));
    }
    if name == HELP_OWNER {
        return Err(CompileError::ReservedName(name.to_string()));
    }
    Ok(())
}

fn register_flags(
    name: &str,
    flags: &[String],
    seen: &mut IndexMap<ParsedFlag, String>,
) -> Result<FlagSet, CompileError> {
    if flags.is_empty() {
        return Err(CompileError::EmptyFlags(name.to_string()));
    }
    let mut set = FlagSet::default();
    for flag in flags {
        let parsed = ParsedFlag::parse(flag).ok_or_else(|| CompileError::InvalidFlag {
            name: name.to_string(),
            flag: flag.clone(),
        })?;
        if let Some(owner) = seen.get(&parsed) {
            return Err(CompileError::DuplicateFlag {
                name: name.to_string(),
                flag: flag.clone(),
                owner: owner.clone(),
            });
        }
        set.push(&parsed);
        seen.insert(parsed, name.to_string());
    }
    Ok(set)
}

/// Declared defaults are converted to the declared type unless a caster owns conversion.
fn conform_default(argument: &Argument) -> Result<Option<Value>, CompileError> {
    let Some(default) = argument.implied_default() else {
        return Ok(None);
    };
    if argument.caster().is_some() || default.is_none() {
        return Ok(Some(default));
    }
    argument
        .value_type()
        .conform(default)
        .map(Some)
        .map_err(|_| CompileError::DefaultTypeMismatch {
            name: argument.name().to_string(),
            expected: argument.value_type().to_string(),
        })
}

fn conform_alias(argument: &Argument, flag: &str, value: &Value) -> Result<Value, CompileError> {
    let mismatch = || CompileError::AliasTypeMismatch {
        name: argument.name().to_string(),
        flag: flag.to_string(),
        value: value.to_string(),
        expected: argument.value_type().to_string(),
    };
    if !argument.value_type().conforms(value) {
        return Err(mismatch());
    }
    argument
        .value_type()
        .conform(value.clone())
        .map_err(|_| mismatch())
}

fn render_help(argument: &Argument) -> Option<String> {
    let default = argument.default();
    match (argument.help(), default) {
        (Some(help), Some(default)) if help.contains("{DEFAULT}") => {
            Some(help.replace("{DEFAULT}", &default.to_string()))
        }
        (Some(help), Some(default)) => Some(format!("{help} (default: {default})")),
        (None, Some(default)) => Some(format!("(default: {default})")),
        (help, None) => help.map(str::to_string),
    }
}

fn build_clusters(fields: &mut [Field], aliases: &[AliasEntry]) -> Result<Vec<Cluster>, CompileError> {
    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (i, field) in fields.iter().enumerate() {
        if let Some(group) = field.argument.exclusive() {
            if field.argument.is_positional() {
                return Err(CompileError::PositionalInExclusive {
                    name: field.name().to_string(),
                    group: group.to_string(),
                });
            }
            groups.entry(group.to_string()).or_default().push(i);
        }
    }

    let mut clusters = Vec::new();
    for (group, indices) in groups {
        if indices.len() == 1 {
            tracing::warn!(group = %group, "exclusive group has a single member");
        }
        let required: Vec<&str> = indices
            .iter()
            .filter(|&&i| fields[i].required)
            .map(|&i| fields[i].name())
            .collect();
        if required.len() > 1 {
            return Err(CompileError::ExclusiveRequired {
                group,
                members: required.join(", "),
            });
        }
        let cluster_required = !required.is_empty();

        let mut members = Vec::new();
        for &i in &indices {
            fields[i].required = false;
            let name = fields[i].name();
            members.push(name.to_string());
            members.extend(aliases.iter().filter(|a| a.target == name).map(|a| a.id.clone()));
        }
        clusters.push(Cluster {
            id: format!("exclusive:{group}"),
            name: group,
            members,
            required: cluster_required,
            multiple: false,
        });
    }

    // A required flag is satisfied by its primary or by any of its aliases.
    for field in fields.iter_mut() {
        if !field.required || field.argument.exclusive().is_some() {
            continue;
        }
        let alias_ids: Vec<String> = aliases
            .iter()
            .filter(|a| a.target == field.name())
            .map(|a| a.id.clone())
            .collect();
        if alias_ids.is_empty() {
            continue;
        }
        field.required = false;
        let name = field.name().to_string();
        let mut members = vec![name.clone()];
        members.extend(alias_ids);
        clusters.push(Cluster {
            id: format!("required:{name}"),
            name,
            members,
            required: true,
            multiple: true,
        });
    }
    Ok(clusters)
}
