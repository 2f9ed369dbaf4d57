use super::errors::AccessError;
use crate::compile::{CompileError, Field, ParserPlan};
use crate::error::ArgError;
use crate::spec::ArgSpec;
use crate::types::{FromValue, Value};
use crate::visuals;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// State of one declared attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Not yet parsed: no default and never bound.
    Unset,
    Set(Value),
}

impl Slot {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Slot::Set(value) => Some(value),
            Slot::Unset => None,
        }
    }
}

/// Bound result of one parse: declared name to slot, in declaration order.
#[derive(Debug, Clone)]
pub struct ParsedArgs {
    plan: Arc<ParserPlan>,
    slots: IndexMap<String, Slot>,
    command: Option<(String, Box<ParsedArgs>)>,
}

impl PartialEq for ParsedArgs {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots && self.command == other.command
    }
}

impl ParsedArgs {
    pub(crate) fn empty(plan: Arc<ParserPlan>) -> Self {
        let slots = plan
            .fields
            .iter()
            .map(|f| (f.name().to_string(), Slot::Unset))
            .collect();
        Self {
            plan,
            slots,
            command: None,
        }
    }

    /// Declared and implied defaults, everything else unset. Nothing is validated.
    pub fn with_defaults(spec: &ArgSpec) -> Result<Self, CompileError> {
        let mut parsed = Self::empty(spec.compile()?);
        let defaults: Vec<(String, Value)> = parsed
            .plan
            .fields
            .iter()
            .filter_map(|f| f.default.clone().map(|d| (f.name().to_string(), d)))
            .collect();
        for (name, value) in defaults {
            parsed.assign(&name, Slot::Set(value));
        }
        Ok(parsed)
    }

    pub(crate) fn assign(&mut self, name: &str, slot: Slot) {
        self.slots.insert(name.to_string(), slot);
    }

    pub(crate) fn set_command(&mut self, name: &str, nested: ParsedArgs) {
        self.command = Some((name.to_string(), Box::new(nested)));
    }

    pub fn plan(&self) -> &ParserPlan {
        &self.plan
    }

    fn field(&self, name: &str) -> Result<&Field, AccessError> {
        self.plan
            .field(name)
            .ok_or_else(|| AccessError::Unknown(name.to_string()))
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        matches!(self.slots.get(name), Some(Slot::Set(_)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.slots.iter().map(|(name, slot)| (name.as_str(), slot))
    }

    pub fn value(&self, name: &str) -> Result<&Value, AccessError> {
        match self.slots.get(name) {
            Some(Slot::Set(value)) => Ok(value),
            Some(Slot::Unset) => Err(AccessError::Unset(name.to_string())),
            None => Err(AccessError::Unknown(name.to_string())),
        }
    }

    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, AccessError> {
        let value = self.value(name)?;
        T::from_value(value).ok_or_else(|| AccessError::Type {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
            found: value.kind_name(),
        })
    }

    /// Assigns after converting to the declared type and validating.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ArgError> {
        let field = self.field(name)?;
        let value = value.into();
        let value = match field.argument.caster() {
            Some(_) => value,
            None => field
                .argument
                .value_type()
                .conform(value)
                .map_err(|source| ArgError::InArgument {
                    attr: name.to_string(),
                    source,
                })?,
        };
        if let Some(validator) = field.argument.validator() {
            validator.validate(name, &value)?;
        }
        self.assign(name, Slot::Set(value));
        Ok(())
    }

    pub fn unset(&mut self, name: &str) -> Result<(), AccessError> {
        self.field(name)?;
        self.assign(name, Slot::Unset);
        Ok(())
    }

    /// Copies every set slot of `other` that is also declared here, then applies `overrides`.
    pub fn copy_from<K, V>(
        &mut self,
        other: &ParsedArgs,
        overrides: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), ArgError>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, slot) in &other.slots {
            match (slot, self.slots.contains_key(name)) {
                (Slot::Set(Value::None), true) => self.assign(name, Slot::Set(Value::None)),
                (Slot::Set(value), true) => self.set(name, value.clone())?,
                _ => {}
            }
        }
        for (name, value) in overrides {
            self.set(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Set slots only.
    pub fn as_map(&self) -> IndexMap<String, Value> {
        self.slots
            .iter()
            .filter_map(|(name, slot)| slot.value().map(|v| (name.clone(), v.clone())))
            .collect()
    }

    /// Set slots as a JSON object; a subcommand nests under its name.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut object = serde_json::Map::new();
        for (name, value) in self.as_map() {
            object.insert(name, serde_json::to_value(value)?);
        }
        if let Some((name, nested)) = &self.command {
            object.insert(name.clone(), nested.to_json()?);
        }
        Ok(serde_json::Value::Object(object))
    }

    /// Selected subcommand and its bound arguments.
    pub fn command(&self) -> Option<(&str, &ParsedArgs)> {
        self.command
            .as_ref()
            .map(|(name, nested)| (name.as_str(), nested.as_ref()))
    }
}

impl fmt::Display for ParsedArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", visuals::parsed_table(self))?;
        if let Some((name, nested)) = self.command() {
            write!(f, "\n[{name}]\n{nested}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Argument;
    use crate::types::ValueType;
    use crate::validator::Validator;

    fn spec() -> ArgSpec {
        ArgSpec::new("demo")
            .arg(Argument::flag("name", ["--name"], ValueType::STR).required())
            .arg(
                Argument::flag("count", ["--count"], ValueType::INT)
                    .with_default(1)
                    .with_validator(Validator::int().in_range(0, 10)),
            )
            .arg(Argument::switch("verbose", ["--verbose"]))
            .arg(Argument::flag("ratio", ["--ratio"], ValueType::FLOAT))
    }

    #[test]
    fn unset_is_distinct_from_defaults() {
        let parsed = ParsedArgs::with_defaults(&spec()).unwrap();
        assert_eq!(parsed.value("name"), Err(AccessError::Unset("name".into())));
        assert_eq!(parsed.get::<i64>("count"), Ok(1));
        assert_eq!(parsed.get::<bool>("verbose"), Ok(false));
        assert!(matches!(parsed.value("nope"), Err(AccessError::Unknown(_))));
        assert!(matches!(
            parsed.get::<String>("count"),
            Err(AccessError::Type { found: "int", .. })
        ));
    }

    #[test]
    fn set_converts_and_validates() {
        let mut parsed = ParsedArgs::with_defaults(&spec()).unwrap();
        parsed.set("count", 4).unwrap();
        assert_eq!(parsed.get::<i64>("count"), Ok(4));
        assert!(matches!(parsed.set("count", 40), Err(ArgError::Validation(_))));
        assert_eq!(parsed.get::<i64>("count"), Ok(4));
        assert!(matches!(parsed.set("count", "x"), Err(ArgError::InArgument { .. })));

        parsed.set("ratio", 2).unwrap();
        assert_eq!(parsed.value("ratio"), Ok(&Value::Float(2.0)));

        parsed.unset("count").unwrap();
        assert!(!parsed.is_set("count"));
        assert!(parsed.unset("nope").is_err());
    }

    #[test]
    fn copy_from_applies_overrides() {
        let source = spec()
            .try_parse_from(["demo", "--name", "Bob", "--count", "2"])
            .unwrap();
        let mut target = ParsedArgs::with_defaults(&spec()).unwrap();
        target.copy_from(&source, [("count", 3)]).unwrap();
        assert_eq!(target.get::<String>("name").unwrap(), "Bob");
        assert_eq!(target.get::<i64>("count"), Ok(3));
        assert_eq!(target.value("ratio"), Ok(&Value::None));
    }

    #[test]
    fn map_and_json_skip_unset() {
        let parsed = ParsedArgs::with_defaults(&spec()).unwrap();
        let map = parsed.as_map();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["count", "verbose"]);
        assert_eq!(
            parsed.to_json().unwrap(),
            serde_json::json!({"count": 1, "verbose": false})
        );
    }

    #[test]
    fn display_renders_every_slot() {
        let parsed = ParsedArgs::with_defaults(&spec()).unwrap();
        let text = parsed.to_string();
        assert!(text.contains("count"));
        assert!(text.contains("<unset>"));
    }
}
