use clap::Parser;
use declarg::args::CliArgs;
use declarg::config::{Defaults, SchemaFile};
use declarg::error::ArgError;
use declarg::visuals;
use std::ffi::OsString;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: &CliArgs) -> Result<(), ArgError> {
    let mut spec = SchemaFile::load(&args.schema)?.into_spec(&args.program_name())?;
    if let Some(path) = &args.defaults {
        spec = spec.apply_defaults(&Defaults::load(path)?)?;
    }

    if args.describe {
        let plan = spec.compile()?;
        println!("{}", visuals::plan_table(&plan));
        for (name, sub) in &plan.subcommands {
            println!("\n[{name}]\n{}", visuals::plan_table(sub));
        }
        return Ok(());
    }

    let argv = std::iter::once(OsString::from(spec.name())).chain(args.args.iter().cloned());
    let parsed = spec.try_parse_from(argv)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&parsed.to_json()?)?);
    } else {
        println!("{parsed}");
        visuals::print_summary(&parsed);
    }
    Ok(())
}

fn main() {
    init_tracing();
    let args = CliArgs::parse();
    if let Err(e) = run(&args) {
        e.exit();
    }
}
