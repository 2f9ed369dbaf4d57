use declarg::{ArgError, ArgSpec, Argument, Value, ValueType};

#[path = "common/mod.rs"]
mod common;

#[test]
fn name_count_verbose() {
    let parsed = common::parse(
        &common::greet_spec(),
        &["--name", "Alice", "--count", "3", "--verbose"],
    )
    .expect("parses");
    assert_eq!(parsed.get::<String>("name").unwrap(), "Alice");
    assert_eq!(parsed.get::<i64>("count").unwrap(), 3);
    assert!(parsed.get::<bool>("verbose").unwrap());
}

#[test]
fn missing_required_flag_is_engine_failure() {
    common::assert_cli_error(common::parse(&common::greet_spec(), &["--count", "3"]));
}

#[test]
fn booleans_follow_presence_in_any_position() {
    let spec = common::greet_spec()
        .arg(Argument::switch("dry_run", ["--dry-run"]).with_default(false))
        .arg(Argument::switch("color", ["--color"]).with_default(true));

    let orders: [&[&str]; 3] = [
        &["--verbose", "-n", "a"],
        &["-n", "a", "--verbose"],
        &["-v", "--name", "a"],
    ];
    for args in orders {
        let parsed = common::parse(&spec, args).unwrap();
        assert!(parsed.get::<bool>("verbose").unwrap(), "{args:?}");
        assert!(!parsed.get::<bool>("dry_run").unwrap(), "{args:?}");
        assert!(parsed.get::<bool>("color").unwrap(), "{args:?}");
    }

    let parsed = common::parse(&spec, &["-n", "a"]).unwrap();
    assert!(!parsed.get::<bool>("verbose").unwrap());
}

#[test]
fn exclusive_formats_conflict_without_bindings() {
    let spec = ArgSpec::new("export")
        .arg(Argument::switch("json", ["--json"]).with_exclusive("format"))
        .arg(Argument::switch("yaml", ["--yaml"]).with_exclusive("format"));

    common::assert_cli_error(common::parse(&spec, &["--json", "--yaml"]));

    let parsed = common::parse(&spec, &["--yaml"]).unwrap();
    assert!(parsed.get::<bool>("yaml").unwrap());
    assert!(!parsed.get::<bool>("json").unwrap());
}

#[test]
fn required_exclusive_group_needs_one_member() {
    let spec = ArgSpec::new("export")
        .arg(
            Argument::flag("out", ["--out"], ValueType::PATH)
                .with_exclusive("target")
                .required(),
        )
        .arg(Argument::switch("stdout", ["--stdout"]).with_exclusive("target"));

    common::assert_cli_error(common::parse(&spec, &[]));
    assert!(common::parse(&spec, &["--stdout"]).is_ok());
    let parsed = common::parse(&spec, &["--out", "a.txt"]).unwrap();
    assert_eq!(parsed.value("out").unwrap(), &Value::Path("a.txt".into()));
}

#[test]
fn alias_and_primary_last_one_wins() {
    let spec = ArgSpec::new("job").arg(
        Argument::flag("level", ["-l", "--level"], ValueType::INT)
            .with_default(1)
            .with_alias("--max", 9)
            .with_alias("--min", 0),
    );

    let level = |args: &[&str]| common::parse(&spec, args).unwrap().get::<i64>("level").unwrap();
    assert_eq!(level(&[]), 1);
    assert_eq!(level(&["--max"]), 9);
    assert_eq!(level(&["--level", "4", "--max"]), 9);
    assert_eq!(level(&["--max", "--level", "4"]), 4);
    assert_eq!(level(&["--max", "--min"]), 0);
    assert_eq!(level(&["--min", "-l", "5", "--max"]), 9);
}

#[test]
fn required_flag_is_satisfied_by_an_alias() {
    let spec = ArgSpec::new("job").arg(
        Argument::flag("level", ["--level"], ValueType::INT)
            .required()
            .with_alias("--max", 9),
    );

    let level = |args: &[&str]| common::parse(&spec, args).unwrap().get::<i64>("level").unwrap();
    assert_eq!(level(&["--max"]), 9);
    assert_eq!(level(&["--level", "3"]), 3);
    assert_eq!(level(&["--level", "3", "--max"]), 9);
    assert_eq!(level(&["--max", "--level", "3"]), 3);

    common::assert_cli_error(common::parse(&spec, &[]));
}

#[test]
fn validation_failure_is_user_error() {
    let spec = common::greet_spec()
        .override_arg("count", |a| {
            a.with_validator(declarg::Validator::int().in_range(1, 10))
        })
        .unwrap();
    let err = common::parse(&spec, &["-n", "a", "-c", "11"]).unwrap_err();
    assert!(matches!(err, ArgError::Validation(ref e) if e.attr == "count" && e.value == "11"));
    assert!(err.is_user_error());
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn help_is_delegated_to_engine() {
    let spec = common::greet_spec().about("Greets people");
    match common::parse(&spec, &["--help"]) {
        Err(ArgError::Cli(e)) => {
            assert_eq!(e.exit_code(), 0);
            assert!(e.to_string().contains("Greets people"));
        }
        other => panic!("expected help output, got {other:?}"),
    }
}
