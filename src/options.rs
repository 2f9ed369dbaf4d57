//! Typed entry point: a user struct that declares its arguments and reads
//! itself back out of the bound result.

use crate::bind::ParsedArgs;
use crate::error::ArgError;
use crate::spec::ArgSpec;
use std::ffi::OsString;

pub trait Options: Sized {
    fn spec() -> ArgSpec;

    fn from_parsed(parsed: &ParsedArgs) -> Result<Self, ArgError>;

    fn try_parse_from<I, T>(argv: I) -> Result<Self, ArgError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let parsed = Self::spec().try_parse_from(argv)?;
        Self::from_parsed(&parsed)
    }

    /// Parses the process arguments, exiting with the engine's status on failure.
    fn parse() -> Self {
        Self::try_parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Work performed once the options are bound.
    fn run(&self) -> Result<(), ArgError> {
        Ok(())
    }

    /// Parses `argv`, runs, and hands back the bound options.
    fn main<I, T>(argv: I) -> Result<Self, ArgError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let options = Self::try_parse_from(argv)?;
        tracing::debug!("running parsed options");
        options.run()?;
        Ok(options)
    }

    fn render_help() -> Result<String, ArgError> {
        Ok(Self::spec().render_help()?)
    }
}
