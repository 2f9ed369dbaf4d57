use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

// Arguments of the schema runner itself; the parsed command line follows `--`.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Parse a command line against a declarative argument schema"
)]
pub struct CliArgs {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Argument schema (toml/yaml/json)"
    )]
    pub schema: PathBuf,

    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Default values overlaid on the schema (toml/yaml/json)"
    )]
    pub defaults: Option<PathBuf>,

    #[arg(long, help = "Print the bound values as JSON", default_value_t = false)]
    pub json: bool,

    #[arg(
        long,
        help = "Print the compiled declaration instead of parsing",
        default_value_t = false,
        conflicts_with = "json"
    )]
    pub describe: bool,

    #[arg(last = true, value_name = "ARGS", help = "Command line to parse")]
    pub args: Vec<OsString>,
}

impl CliArgs {
    /// Program name for the parsed command line: the schema's file stem.
    pub fn program_name(&self) -> String {
        self.schema
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "declarg".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_arguments_follow_separator() {
        let args = CliArgs::try_parse_from([
            "declarg", "--schema", "greet.toml", "--json", "--", "--name", "Alice",
        ])
        .unwrap();
        assert_eq!(args.schema, PathBuf::from("greet.toml"));
        assert!(args.json);
        assert_eq!(args.args, vec![OsString::from("--name"), OsString::from("Alice")]);
        assert_eq!(args.program_name(), "greet");
    }

    #[test]
    fn describe_conflicts_with_json() {
        assert!(CliArgs::try_parse_from(["declarg", "-s", "a.toml", "--json", "--describe"]).is_err());
    }
}
