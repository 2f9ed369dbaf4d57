//! Ordered argument registry that stands in for a configuration class.
//!
//! Composition replaces inheritance: [`ArgSpec::merge`] is an ordered union
//! in which later declarations replace earlier ones in place by name.

use crate::argument::Argument;
use crate::bind::{ParsedArgs, bind};
use crate::compile::{CompileError, ParserPlan, compile};
use crate::config::{ConfigError, Defaults};
use crate::error::ArgError;
use indexmap::IndexMap;
use std::ffi::OsString;
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, Default)]
pub struct ArgSpec {
    name: String,
    about: Option<String>,
    usage: Option<String>,
    epilog: Option<String>,
    arguments: IndexMap<String, Argument>,
    subcommands: IndexMap<String, ArgSpec>,
    subcommand_required: bool,
    plan: OnceLock<Result<Arc<ParserPlan>, CompileError>>,
}

impl ArgSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Ordered union of `parents`, most basic first.
    pub fn inherit<'a>(name: impl Into<String>, parents: impl IntoIterator<Item = &'a ArgSpec>) -> Self {
        parents
            .into_iter()
            .fold(Self::new(name), |spec, parent| spec.merge(parent))
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self.touched()
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self.touched()
    }

    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = Some(epilog.into());
        self.touched()
    }

    /// Declares `argument`. A declaration with the same name is replaced in place.
    pub fn arg(mut self, argument: Argument) -> Self {
        self.arguments.insert(argument.name().to_string(), argument);
        self.touched()
    }

    pub fn remove(mut self, name: &str) -> Self {
        if self.arguments.shift_remove(name).is_none() {
            tracing::warn!(command = %self.name, argument = name, "removing undeclared argument");
        }
        self.touched()
    }

    /// Takes every argument and subcommand of `other`, replacing same-named ones in place.
    pub fn merge(mut self, other: &ArgSpec) -> Self {
        for argument in other.arguments.values() {
            self.arguments.insert(argument.name().to_string(), argument.clone());
        }
        for (name, spec) in &other.subcommands {
            self.subcommands.insert(name.clone(), spec.clone());
        }
        if self.about.is_none() {
            self.about = other.about.clone();
        }
        self.subcommand_required |= other.subcommand_required;
        self.touched()
    }

    /// Redeclares `name` as an edited copy of its current descriptor.
    pub fn override_arg(
        mut self,
        name: &str,
        edit: impl FnOnce(Argument) -> Argument,
    ) -> Result<Self, CompileError> {
        let current = self
            .arguments
            .get(name)
            .cloned()
            .ok_or_else(|| CompileError::UnknownArgument(name.to_string()))?;
        let edited = edit(current);
        if edited.name() != name {
            return Err(CompileError::InvalidName(edited.name().to_string()));
        }
        self.arguments.insert(name.to_string(), edited);
        Ok(self.touched())
    }

    pub fn subcommand(mut self, name: impl Into<String>, spec: ArgSpec) -> Self {
        self.subcommands.insert(name.into(), spec);
        self.touched()
    }

    pub fn subcommand_required(mut self, required: bool) -> Self {
        self.subcommand_required = required;
        self.touched()
    }

    /// Overlays defaults loaded from a file. A default lifts the requirement.
    pub fn apply_defaults(mut self, defaults: &Defaults) -> Result<Self, ConfigError> {
        for (name, value) in defaults.iter() {
            let argument = self
                .arguments
                .get(name)
                .ok_or_else(|| ConfigError::UnknownArgument(name.clone()))?;
            let value = match argument.caster() {
                Some(_) => value.clone(),
                None => argument
                    .value_type()
                    .conform(value.clone())
                    .map_err(|source| ConfigError::InvalidDefault {
                        name: name.clone(),
                        source,
                    })?,
            };
            let updated = argument.clone().not_required().with_default(value);
            self.arguments.insert(name.clone(), updated);
        }
        for (command, nested) in defaults.sections() {
            let child = self
                .subcommands
                .get_mut(command)
                .ok_or_else(|| ConfigError::UnknownSubcommand(command.clone()))?;
            *child = std::mem::take(child).apply_defaults(nested)?;
        }
        Ok(self.touched())
    }

    fn touched(mut self) -> Self {
        self.plan = OnceLock::new();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about_text(&self) -> Option<&str> {
        self.about.as_deref()
    }

    pub fn usage_text(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    pub fn epilog_text(&self) -> Option<&str> {
        self.epilog.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.arguments.get(name)
    }

    pub fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.values()
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn subcommands(&self) -> impl Iterator<Item = (&String, &ArgSpec)> {
        self.subcommands.iter()
    }

    pub fn is_subcommand_required(&self) -> bool {
        self.subcommand_required
    }

    /// Compiled plan, built once per declaration value.
    pub fn compile(&self) -> Result<Arc<ParserPlan>, CompileError> {
        self.plan.get_or_init(|| compile(self).map(Arc::new)).clone()
    }

    pub fn command(&self) -> Result<clap::Command, CompileError> {
        Ok(self.compile()?.command())
    }

    pub fn render_help(&self) -> Result<String, CompileError> {
        Ok(self.command()?.render_help().to_string())
    }

    /// Parses `argv`, whose first item is the program name.
    pub fn try_parse_from<I, T>(&self, argv: I) -> Result<ParsedArgs, ArgError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let plan = self.compile()?;
        let matches = plan.command().try_get_matches_from(argv)?;
        bind(&plan, &matches)
    }

    /// Like [`ArgSpec::try_parse_from`], exiting the process on failure.
    pub fn parse_from<I, T>(&self, argv: I) -> ParsedArgs
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.try_parse_from(argv).unwrap_or_else(|e| e.exit())
    }

    pub fn parse(&self) -> ParsedArgs {
        self.parse_from(std::env::args_os())
    }
}
