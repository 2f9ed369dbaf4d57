#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use declarg::{ArgError, ArgSpec, Argument, ParsedArgs, ValueType};

/// Parses `args` with the spec's name prepended as the program name.
pub fn parse(spec: &ArgSpec, args: &[&str]) -> Result<ParsedArgs, ArgError> {
    let argv = std::iter::once(spec.name()).chain(args.iter().copied());
    spec.try_parse_from(argv)
}

pub fn write_file(dir: &Path, file_name: &str, contents: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, contents).expect("write fixture file");
    path
}

/// `name:str required`, `count:int default=1`, `verbose:bool`.
pub fn greet_spec() -> ArgSpec {
    ArgSpec::new("greet")
        .arg(Argument::flag("name", ["-n", "--name"], ValueType::STR).required())
        .arg(Argument::flag("count", ["-c", "--count"], ValueType::INT).with_default(1))
        .arg(Argument::switch("verbose", ["-v", "--verbose"]))
}

pub fn assert_cli_error(result: Result<ParsedArgs, ArgError>) {
    match result {
        Err(ArgError::Cli(e)) => assert_eq!(e.exit_code(), 2, "{e}"),
        other => panic!("expected a command line error, got {other:?}"),
    }
}
