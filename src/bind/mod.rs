//! Binder: turns engine matches back into typed, validated values.

pub mod errors;
mod parsed;

pub use errors::AccessError;
pub use parsed::{ParsedArgs, Slot};

use crate::compile::{AliasEntry, Arity, Field, ParserPlan};
use crate::error::ArgError;
use crate::types::Value;
use clap::ArgMatches;
use clap::parser::ValueSource;
use std::sync::Arc;

/// Binds every field in declaration order and stops at the first
/// coercion or validation failure.
pub fn bind(plan: &Arc<ParserPlan>, matches: &ArgMatches) -> Result<ParsedArgs, ArgError> {
    let mut parsed = ParsedArgs::empty(Arc::clone(plan));
    for field in &plan.fields {
        match bind_field(plan, field, matches)? {
            Some(value) => {
                if let Some(validator) = field.argument.validator() {
                    validator.validate(field.name(), &value)?;
                }
                tracing::trace!(argument = field.name(), value = %value, "bound");
                parsed.assign(field.name(), Slot::Set(value));
            }
            // Omitted and without a default: holds no value, and is not validated.
            None => parsed.assign(field.name(), Slot::Set(Value::None)),
        }
    }

    if let Some((name, sub_matches)) = matches.subcommand() {
        if let Some(sub_plan) = plan.subcommands.get(name) {
            tracing::debug!(command = name, "binding subcommand");
            let nested = bind(&Arc::new(sub_plan.clone()), sub_matches)?;
            parsed.set_command(name, nested);
        }
    }
    Ok(parsed)
}

fn on_command_line(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

fn bind_field(plan: &ParserPlan, field: &Field, matches: &ArgMatches) -> Result<Option<Value>, ArgError> {
    let name = field.name();
    let supplied = on_command_line(matches, name);

    let value = match field.arity {
        Arity::Switch => supplied.then_some(Value::Bool(true)),
        Arity::One => {
            let primary = if supplied {
                matches.index_of(name).zip(matches.get_one::<String>(name))
            } else {
                None
            };
            match (primary, last_alias(plan, name, matches)) {
                (Some((at, _)), Some((alias_at, alias))) if alias_at > at => Some(alias.value.clone()),
                (Some((_, raw)), _) => Some(convert(field, raw)?),
                (None, Some((_, alias))) => Some(alias.value.clone()),
                (None, None) => None,
            }
        }
        Arity::Many if supplied => {
            let mut items = Vec::new();
            for raw in matches.get_many::<String>(name).into_iter().flatten() {
                match convert_element(field, raw)? {
                    Value::List(more) if field.argument.caster().is_some() => items.extend(more),
                    item => items.push(item),
                }
            }
            Some(Value::List(items))
        }
        Arity::Many => None,
    };

    Ok(value.or_else(|| field.default.clone()))
}

/// Alias of `name` supplied last on the command line, with its position.
fn last_alias<'a>(plan: &'a ParserPlan, name: &'a str, matches: &ArgMatches) -> Option<(usize, &'a AliasEntry)> {
    plan.aliases_of(name)
        .filter(|alias| on_command_line(matches, &alias.id))
        .filter_map(|alias| matches.index_of(&alias.id).map(|at| (at, alias)))
        .max_by_key(|(at, _)| *at)
}

fn convert(field: &Field, raw: &str) -> Result<Value, ArgError> {
    let argument = &field.argument;
    match argument.caster() {
        Some(caster) => caster.cast(raw),
        None => argument.value_type().coerce(raw),
    }
    .map_err(|source| ArgError::InArgument {
        attr: field.name().to_string(),
        source,
    })
}

fn convert_element(field: &Field, raw: &str) -> Result<Value, ArgError> {
    let argument = &field.argument;
    match argument.caster() {
        Some(caster) => caster.cast(raw),
        None => argument.value_type().coerce_element(raw),
    }
    .map_err(|source| ArgError::InArgument {
        attr: field.name().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use crate::argument::Argument;
    use crate::error::ArgError;
    use crate::spec::ArgSpec;
    use crate::types::{ScalarKind, Value, ValueType, casters};
    use crate::validator::Validator;

    fn spec() -> ArgSpec {
        ArgSpec::new("demo")
            .arg(Argument::flag("name", ["--name"], ValueType::STR).required())
            .arg(Argument::flag("count", ["--count"], ValueType::INT).with_default(1))
            .arg(Argument::switch("verbose", ["--verbose"]))
    }

    #[test]
    fn end_to_end_binding() {
        let parsed = spec()
            .try_parse_from(["demo", "--name", "Alice", "--count", "3", "--verbose"])
            .unwrap();
        assert_eq!(parsed.get::<String>("name").unwrap(), "Alice");
        assert_eq!(parsed.get::<i64>("count").unwrap(), 3);
        assert!(parsed.get::<bool>("verbose").unwrap());
    }

    #[test]
    fn coercion_failure_names_attribute() {
        let err = spec()
            .try_parse_from(["demo", "--name", "A", "--count", "three"])
            .unwrap_err();
        assert!(matches!(err, ArgError::InArgument { ref attr, .. } if attr == "count"));
    }

    #[test]
    fn validator_runs_on_defaults() {
        let spec = ArgSpec::new("demo").arg(
            Argument::flag("count", ["--count"], ValueType::INT)
                .with_default(0)
                .with_validator(Validator::int().positive(false)),
        );
        let err = spec.try_parse_from(["demo"]).unwrap_err();
        assert!(matches!(err, ArgError::Validation(ref e) if e.attr == "count"));
        assert!(spec.try_parse_from(["demo", "--count", "2"]).is_ok());
    }

    #[test]
    fn first_failing_attribute_is_reported() {
        let spec = ArgSpec::new("demo")
            .arg(Argument::flag("a", ["-a"], ValueType::INT).with_validator(Validator::int().positive(false)))
            .arg(Argument::flag("b", ["-b"], ValueType::INT).with_validator(Validator::int().positive(false)));
        let err = spec.try_parse_from(["demo", "-b", "0", "-a", "0"]).unwrap_err();
        assert!(matches!(err, ArgError::Validation(ref e) if e.attr == "a"));
    }

    #[test]
    fn repeated_flag_last_wins() {
        let parsed = spec()
            .try_parse_from(["demo", "--name", "a", "--name", "b"])
            .unwrap();
        assert_eq!(parsed.get::<String>("name").unwrap(), "b");
    }

    #[test]
    fn negative_numbers_are_values() {
        let parsed = spec()
            .try_parse_from(["demo", "--name", "a", "--count", "-4"])
            .unwrap();
        assert_eq!(parsed.get::<i64>("count").unwrap(), -4);
    }

    #[test]
    fn list_flags_collect_each_occurrence() {
        let spec = ArgSpec::new("demo")
            .arg(Argument::flag("tag", ["-t", "--tag"], ValueType::List(ScalarKind::Int)))
            .arg(
                Argument::flag("ids", ["--ids"], ValueType::List(ScalarKind::Int))
                    .with_caster(casters::split_list(ScalarKind::Int, ';')),
            );
        let parsed = spec
            .try_parse_from(["demo", "-t", "1", "--tag", "2", "--ids", "3;4", "--ids", "5"])
            .unwrap();
        assert_eq!(parsed.get::<Vec<i64>>("tag").unwrap(), vec![1, 2]);
        assert_eq!(parsed.get::<Vec<i64>>("ids").unwrap(), vec![3, 4, 5]);

        let parsed = spec.try_parse_from(["demo"]).unwrap();
        assert_eq!(parsed.get::<Vec<i64>>("tag").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn positionals_and_variadic() {
        let spec = ArgSpec::new("demo")
            .arg(Argument::positional("src", ValueType::PATH))
            .arg(Argument::positional("mode", ValueType::literal(["fast", "slow"])).with_default("fast"))
            .arg(Argument::variadic("rest", ScalarKind::Int));
        let parsed = spec.try_parse_from(["demo", "a.txt", "slow", "1", "2"]).unwrap();
        assert_eq!(parsed.get::<String>("src").unwrap(), "a.txt");
        assert_eq!(parsed.get::<String>("mode").unwrap(), "slow");
        assert_eq!(parsed.get::<Vec<i64>>("rest").unwrap(), vec![1, 2]);

        let parsed = spec.try_parse_from(["demo", "a.txt"]).unwrap();
        assert_eq!(parsed.get::<String>("mode").unwrap(), "fast");
        assert_eq!(parsed.value("rest").unwrap(), &Value::List(vec![]));

        assert!(matches!(
            spec.try_parse_from(["demo"]).unwrap_err(),
            ArgError::Cli(_)
        ));
    }

    #[test]
    fn optional_type_defaults_to_none() {
        let spec = ArgSpec::new("demo").arg(Argument::flag(
            "limit",
            ["--limit"],
            ValueType::optional(ValueType::INT),
        ));
        let parsed = spec.try_parse_from(["demo"]).unwrap();
        assert_eq!(parsed.get::<Option<i64>>("limit").unwrap(), None);
        let parsed = spec.try_parse_from(["demo", "--limit", "5"]).unwrap();
        assert_eq!(parsed.get::<Option<i64>>("limit").unwrap(), Some(5));
    }

    #[test]
    fn omitted_flag_without_default_binds_none() {
        let spec = ArgSpec::new("demo").arg(
            Argument::flag("name", ["--name"], ValueType::STR)
                .with_validator(Validator::str().length_in_range(2, None)),
        );
        let parsed = spec.try_parse_from(["demo"]).unwrap();
        assert!(parsed.is_set("name"));
        assert_eq!(parsed.value("name").unwrap(), &Value::None);
        assert_eq!(parsed.get::<Option<String>>("name").unwrap(), None);

        let parsed = spec.try_parse_from(["demo", "--name", "Al"]).unwrap();
        assert_eq!(parsed.get::<Option<String>>("name").unwrap(), Some("Al".to_string()));
        assert!(matches!(
            spec.try_parse_from(["demo", "--name", "A"]).unwrap_err(),
            ArgError::Validation(_)
        ));
    }
}
