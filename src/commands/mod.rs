//! Subcommand dispatch: a leading token selects one declaration, the rest
//! of the command line is parsed by it.

use crate::bind::ParsedArgs;
use crate::error::ArgError;
use crate::spec::ArgSpec;
use indexmap::IndexMap;
use std::ffi::OsString;

/// Command name to declaration, with no fields of its own.
#[derive(Debug, Clone, Default)]
pub struct CommandSet {
    name: String,
    about: Option<String>,
    commands: IndexMap<String, ArgSpec>,
}

/// The selected command and its bound arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: String,
    pub args: ParsedArgs,
}

impl CommandSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn command(mut self, name: impl Into<String>, spec: ArgSpec) -> Self {
        self.commands.insert(name.into(), spec);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Equivalent declaration: no fields, one required subcommand per entry.
    pub fn spec(&self) -> ArgSpec {
        let mut spec = ArgSpec::new(self.name.clone()).subcommand_required(true);
        if let Some(about) = &self.about {
            spec = spec.about(about.clone());
        }
        for (name, child) in &self.commands {
            spec = spec.subcommand(name.clone(), child.clone());
        }
        spec
    }

    pub fn try_parse_from<I, T>(&self, argv: I) -> Result<Invocation, ArgError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let parsed = self.spec().try_parse_from(argv)?;
        match parsed.command() {
            Some((command, args)) => Ok(Invocation {
                command: command.to_string(),
                args: args.clone(),
            }),
            None => Err(ArgError::Cli(
                self.spec()
                    .command()?
                    .error(clap::error::ErrorKind::MissingSubcommand, "a subcommand is required"),
            )),
        }
    }

    pub fn parse_from<I, T>(&self, argv: I) -> Invocation
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.try_parse_from(argv).unwrap_or_else(|e| e.exit())
    }
}
