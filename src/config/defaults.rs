use super::ConfigError;
use crate::types::Value;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum Entry {
    Value(Value),
    Section(IndexMap<String, Entry>),
}

/// Default values by argument name. Nested tables hold the defaults of a
/// subcommand of the same name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "IndexMap<String, Entry>")]
pub struct Defaults {
    values: IndexMap<String, Value>,
    sections: IndexMap<String, Defaults>,
}

impl From<IndexMap<String, Entry>> for Defaults {
    fn from(entries: IndexMap<String, Entry>) -> Self {
        let mut defaults = Defaults::default();
        for (name, entry) in entries {
            match entry {
                Entry::Value(value) => {
                    defaults.values.insert(name, value);
                }
                Entry::Section(nested) => {
                    defaults.sections.insert(name, nested.into());
                }
            }
        }
        defaults
    }
}

impl Defaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        super::load(path)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn with_section(mut self, command: impl Into<String>, defaults: Defaults) -> Self {
        self.sections.insert(command.into(), defaults);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn sections(&self) -> impl Iterator<Item = (&String, &Defaults)> {
        self.sections.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.sections.is_empty()
    }
}
