//! Immutable declaration of one command-line field.
//!
//! Every builder method consumes the descriptor and returns the edited copy,
//! so overriding an inherited argument never touches the original.

use crate::types::{Caster, ScalarKind, Value, ValueType};
use crate::validator::Validator;
use indexmap::IndexMap;

/// How an argument appears on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgKind {
    /// `-n`, `--name` and aliases of the same option.
    Flags(Vec<String>),
    /// Single positional slot.
    Positional,
    /// Trailing positional that collects the remaining tokens.
    Variadic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    name: String,
    kind: ArgKind,
    value_type: ValueType,
    default: Option<Value>,
    required: bool,
    validator: Option<Validator>,
    caster: Option<Caster>,
    group: Option<String>,
    exclusive: Option<String>,
    hidden: bool,
    help: Option<String>,
    metavar: Option<String>,
    aliases: IndexMap<String, Value>,
}

impl Argument {
    fn with_kind(name: impl Into<String>, kind: ArgKind, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            kind,
            value_type,
            default: None,
            required: false,
            validator: None,
            caster: None,
            group: None,
            exclusive: None,
            hidden: false,
            help: None,
            metavar: None,
            aliases: IndexMap::new(),
        }
    }

    /// Option taking its value after one of `flags`. A `bool` type makes it a switch.
    pub fn flag<S: Into<String>>(
        name: impl Into<String>,
        flags: impl IntoIterator<Item = S>,
        value_type: ValueType,
    ) -> Self {
        let flags = flags.into_iter().map(Into::into).collect();
        Self::with_kind(name, ArgKind::Flags(flags), value_type)
    }

    /// `bool` flag: present means `true`.
    pub fn switch<S: Into<String>>(name: impl Into<String>, flags: impl IntoIterator<Item = S>) -> Self {
        Self::flag(name, flags, ValueType::BOOL)
    }

    pub fn positional(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::with_kind(name, ArgKind::Positional, value_type)
    }

    pub fn variadic(name: impl Into<String>, element: ScalarKind) -> Self {
        Self::with_kind(name, ArgKind::Variadic, ValueType::List(element))
    }

    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn without_default(mut self) -> Self {
        self.default = None;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn not_required(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_validator(mut self, validator: impl Into<Validator>) -> Self {
        self.validator = Some(validator.into());
        self
    }

    pub fn without_validator(mut self) -> Self {
        self.validator = None;
        self
    }

    /// Replaces the registry conversion for this argument.
    pub fn with_caster(mut self, caster: Caster) -> Self {
        self.caster = Some(caster);
        self
    }

    /// Help heading.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Mutually exclusive cluster name.
    pub fn with_exclusive(mut self, exclusive: impl Into<String>) -> Self {
        self.exclusive = Some(exclusive.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// `{DEFAULT}` in the text is replaced by the default value.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    /// Zero-argument `flag` standing for this argument set to `value`.
    pub fn with_alias(mut self, flag: impl Into<String>, value: impl Into<Value>) -> Self {
        self.aliases.insert(flag.into(), value.into());
        self
    }

    /// Replaces the whole flag list. Ignored for positionals.
    pub fn with_flags<S: Into<String>>(mut self, flags: impl IntoIterator<Item = S>) -> Self {
        match &mut self.kind {
            ArgKind::Flags(current) => *current = flags.into_iter().map(Into::into).collect(),
            _ => tracing::warn!(argument = %self.name, "flags cannot be set on a positional argument"),
        }
        self
    }

    pub fn add_flag(mut self, flag: impl Into<String>) -> Self {
        match &mut self.kind {
            ArgKind::Flags(current) => current.push(flag.into()),
            _ => tracing::warn!(argument = %self.name, "flags cannot be added to a positional argument"),
        }
        self
    }

    pub fn rename_flag(mut self, from: &str, to: impl Into<String>) -> Self {
        if let ArgKind::Flags(current) = &mut self.kind {
            if let Some(flag) = current.iter_mut().find(|f| *f == from) {
                *flag = to.into();
            }
        }
        self
    }

    pub fn remove_flag(mut self, flag: &str) -> Self {
        if let ArgKind::Flags(current) = &mut self.kind {
            current.retain(|f| f != flag);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ArgKind {
        &self.kind
    }

    /// Empty for positionals.
    pub fn flags(&self) -> &[String] {
        match &self.kind {
            ArgKind::Flags(flags) => flags,
            _ => &[],
        }
    }

    pub fn is_positional(&self) -> bool {
        !matches!(self.kind, ArgKind::Flags(_))
    }

    pub fn is_switch(&self) -> bool {
        matches!(self.kind, ArgKind::Flags(_)) && self.value_type.is_bool()
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Value taken when the argument is absent: the declared default, else
    /// `false` for switches, empty for lists, `None` for optionals.
    pub fn implied_default(&self) -> Option<Value> {
        if let Some(default) = &self.default {
            return Some(default.clone());
        }
        match &self.value_type {
            _ if self.is_switch() => Some(Value::Bool(false)),
            ValueType::List(_) => Some(Value::List(Vec::new())),
            ValueType::Optional(_) => Some(Value::None),
            _ => None,
        }
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    pub fn caster(&self) -> Option<&Caster> {
        self.caster.as_ref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn exclusive(&self) -> Option<&str> {
        self.exclusive.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Declared metavar, else the one implied by a literal type.
    pub fn metavar(&self) -> Option<String> {
        self.metavar.clone().or_else(|| self.value_type.metavar())
    }

    pub fn aliases(&self) -> &IndexMap<String, Value> {
        &self.aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_copy_instead_of_mutating() {
        let base = Argument::flag("count", ["-c", "--count"], ValueType::INT)
            .with_default(1)
            .with_validator(Validator::int().positive(false));
        let child = base.clone().with_default(5);

        assert_eq!(base.default(), Some(&Value::Int(1)));
        assert_eq!(child.default(), Some(&Value::Int(5)));
        assert_eq!(child.flags(), base.flags());
        assert_eq!(child.validator(), base.validator());
    }

    #[test]
    fn flag_editing() {
        let arg = Argument::switch("verbose", ["-v", "--verbose"])
            .add_flag("--loud")
            .rename_flag("-v", "-V")
            .remove_flag("--verbose");
        assert_eq!(arg.flags(), ["-V", "--loud"]);

        let pos = Argument::positional("file", ValueType::PATH).with_flags(["--file"]);
        assert!(pos.is_positional());
        assert!(pos.flags().is_empty());
    }

    #[test]
    fn implied_defaults() {
        assert_eq!(
            Argument::switch("quiet", ["-q"]).implied_default(),
            Some(Value::Bool(false))
        );
        assert_eq!(
            Argument::variadic("files", ScalarKind::Path).implied_default(),
            Some(Value::List(vec![]))
        );
        assert_eq!(
            Argument::flag("limit", ["--limit"], ValueType::optional(ValueType::INT)).implied_default(),
            Some(Value::None)
        );
        assert_eq!(Argument::flag("name", ["--name"], ValueType::STR).implied_default(), None);
    }

    #[test]
    fn literal_type_implies_metavar() {
        let arg = Argument::flag("level", ["--level"], ValueType::literal(["low", "high"]));
        assert_eq!(arg.metavar().as_deref(), Some("low|high"));
        assert_eq!(arg.with_metavar("LEVEL").metavar().as_deref(), Some("LEVEL"));
    }
}
