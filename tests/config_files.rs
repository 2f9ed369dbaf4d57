use declarg::config::{self, Format};
use declarg::{ConfigError, Defaults, SchemaFile, Value};
use std::path::Path;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

const SCHEMA: &str = r#"
about = "Packs files"

[arguments.output]
flags = ["-o", "--output"]
type = "path"
default = "out.tar"

[arguments.level]
flags = ["--level"]
type = "int"
default = 6
validate = { min = 0, max = 9 }

[arguments.inputs]
variadic = true
type = "list[path]"

[commands.push]
about = "Uploads the archive"

[commands.push.arguments.remote]
flags = ["--remote"]
type = "str"
default = "origin"
"#;

fn load_spec(dir: &TempDir) -> declarg::ArgSpec {
    let path = common::write_file(dir.path(), "pack.toml", SCHEMA);
    SchemaFile::load(&path).unwrap().into_spec("pack").unwrap()
}

#[test]
fn schema_file_without_name_takes_fallback() {
    let dir = TempDir::new().unwrap();
    let spec = load_spec(&dir);
    assert_eq!(spec.name(), "pack");
    assert_eq!(spec.about_text(), Some("Packs files"));

    let parsed = common::parse(&spec, &["a.txt", "b.txt"]).unwrap();
    assert_eq!(parsed.get::<i64>("level").unwrap(), 6);
    assert_eq!(
        parsed.value("inputs").unwrap(),
        &Value::List(vec![Value::Path("a.txt".into()), Value::Path("b.txt".into())])
    );
}

#[test]
fn defaults_in_every_format_agree() {
    let dir = TempDir::new().unwrap();
    let toml = common::write_file(
        dir.path(),
        "defaults.toml",
        "level = 9\noutput = \"dist.tar\"\n\n[push]\nremote = \"mirror\"\n",
    );
    let yaml = common::write_file(
        dir.path(),
        "defaults.yaml",
        "level: 9\noutput: dist.tar\npush:\n  remote: mirror\n",
    );
    let json = common::write_file(
        dir.path(),
        "defaults.JSON",
        r#"{"level": 9, "output": "dist.tar", "push": {"remote": "mirror"}}"#,
    );

    let loaded: Vec<Defaults> = [toml, yaml, json]
        .iter()
        .map(|path| Defaults::load(path).unwrap())
        .collect();
    assert_eq!(loaded[0], loaded[1]);
    assert_eq!(loaded[1], loaded[2]);

    let spec = load_spec(&dir)
        .remove("inputs")
        .apply_defaults(&loaded[0])
        .unwrap();
    let parsed = common::parse(&spec, &["push"]).unwrap();
    assert_eq!(parsed.get::<i64>("level").unwrap(), 9);
    assert_eq!(parsed.value("output").unwrap(), &Value::Path("dist.tar".into()));
    let (command, nested) = parsed.command().unwrap();
    assert_eq!(command, "push");
    assert_eq!(nested.get::<String>("remote").unwrap(), "mirror");

    let parsed = common::parse(&spec, &["--level", "2", "push", "--remote", "up"]).unwrap();
    assert_eq!(parsed.get::<i64>("level").unwrap(), 2);
    assert_eq!(parsed.command().unwrap().1.get::<String>("remote").unwrap(), "up");
}

#[test]
fn defaults_for_unknown_names_are_rejected() {
    let dir = TempDir::new().unwrap();
    let defaults = Defaults::new().with("compression", "zstd");
    assert!(matches!(
        load_spec(&dir).apply_defaults(&defaults),
        Err(ConfigError::UnknownArgument(name)) if name == "compression"
    ));

    let defaults = Defaults::new().with_section("pull", Defaults::new().with("remote", "x"));
    assert!(matches!(
        load_spec(&dir).apply_defaults(&defaults),
        Err(ConfigError::UnknownSubcommand(name)) if name == "pull"
    ));

    let defaults = Defaults::new().with("level", "high");
    assert!(matches!(
        load_spec(&dir).apply_defaults(&defaults),
        Err(ConfigError::InvalidDefault { .. })
    ));
}

#[test]
fn file_errors() {
    let dir = TempDir::new().unwrap();
    let ini = common::write_file(dir.path(), "defaults.ini", "level=1");
    assert!(matches!(Defaults::load(&ini), Err(ConfigError::UnsupportedFormat(_))));
    assert!(matches!(
        Defaults::load(dir.path().join("missing.toml")),
        Err(ConfigError::FileError(_))
    ));

    let broken = common::write_file(dir.path(), "broken.yaml", "level: [1, 2\n");
    assert!(matches!(Defaults::load(&broken), Err(ConfigError::Parse { .. })));
}

#[test]
fn format_detection() {
    assert_eq!(Format::from_path(Path::new("a.yml")).unwrap(), Format::Yaml);
    assert_eq!(Format::from_path(Path::new("a.TOML")).unwrap(), Format::Toml);
    assert!(Format::from_path(Path::new("a")).is_err());

    let defaults: Defaults = config::parse("{\"level\": 1}", Format::Json).unwrap();
    assert_eq!(defaults.get("level"), Some(&Value::Int(1)));
}
