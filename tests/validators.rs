use declarg::types::casters;
use declarg::{ArgError, ArgSpec, Argument, ScalarKind, TupleShape, Validator, Value, ValueType};

#[path = "common/mod.rs"]
mod common;

fn ids_spec() -> ArgSpec {
    ArgSpec::new("ids").arg(
        Argument::flag("ids", ["--id"], ValueType::List(ScalarKind::Int)).with_validator(
            Validator::list(Some(ScalarKind::Int))
                .length_in_range(1, 3)
                .on_item(Validator::int().positive(true)),
        ),
    )
}

#[test]
fn list_failure_reports_first_index() {
    let err = common::parse(&ids_spec(), &["--id", "1", "--id", "-1", "--id", "-2"]).unwrap_err();
    match err {
        ArgError::Validation(e) => {
            assert_eq!(e.attr, "ids");
            assert_eq!(e.value, "1,-1,-2");
            assert_eq!(e.reason, "at index 1, not a non-negative value: -1");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn list_length_is_checked_after_collection() {
    let parsed = common::parse(&ids_spec(), &["--id", "0", "--id", "4"]).unwrap();
    assert_eq!(parsed.get::<Vec<i64>>("ids").unwrap(), vec![0, 4]);

    let args = ["--id", "1", "--id", "2", "--id", "3", "--id", "4"];
    let err = common::parse(&ids_spec(), &args).unwrap_err();
    assert!(matches!(err, ArgError::Validation(ref e) if e.reason.contains("list length")));
}

#[test]
fn empty_list_flag_defaults_to_empty() {
    let spec = ArgSpec::new("tags").arg(Argument::flag("tags", ["--tag"], ValueType::List(ScalarKind::Str)));
    let parsed = common::parse(&spec, &[]).unwrap();
    assert_eq!(parsed.value("tags").unwrap(), &Value::List(Vec::new()));
}

#[test]
fn tuple_tail_needs_one_element() {
    let shape = TupleShape::repeat([ScalarKind::Str], ScalarKind::Float);
    let spec = ArgSpec::new("series").arg(
        Argument::flag("series", ["--series"], ValueType::Tuple(shape)).with_validator(
            Validator::tuple_repeat([Some(ScalarKind::Str)], Some(ScalarKind::Float))
                .on_item(Some(1), Validator::float().positive(false)),
        ),
    );

    let parsed = common::parse(&spec, &["--series", "x,1.5,2"]).unwrap();
    assert_eq!(
        parsed.value("series").unwrap(),
        &Value::Tuple(vec![Value::Str("x".into()), Value::Float(1.5), Value::Float(2.0)])
    );

    let err = common::parse(&spec, &["--series", "x"]).unwrap_err();
    assert!(matches!(err, ArgError::InArgument { ref attr, .. } if attr == "series"));
    assert!(err.is_user_error());

    let err = common::parse(&spec, &["--series", "x,-1.5"]).unwrap_err();
    assert!(matches!(err, ArgError::Validation(ref e) if e.reason.starts_with("at index 1")));
}

#[test]
fn caster_replaces_type_coercion() {
    let pair = ValueType::Tuple(TupleShape::fixed([ScalarKind::Str, ScalarKind::Int]));
    let spec = ArgSpec::new("opts").arg(
        Argument::flag("opt", ["-D"], pair).with_caster(casters::key_value(ScalarKind::Int)),
    );
    let parsed = common::parse(&spec, &["-D", "level=3"]).unwrap();
    assert_eq!(
        parsed.value("opt").unwrap(),
        &Value::Tuple(vec![Value::Str("level".into()), Value::Int(3)])
    );

    let err = common::parse(&spec, &["-D", "level=high"]).unwrap_err();
    assert!(matches!(err, ArgError::InArgument { ref attr, .. } if attr == "opt"));
}

#[test]
fn coercion_round_trips_through_display() {
    let cases = [
        (ValueType::INT, "-42"),
        (ValueType::FLOAT, "2.5"),
        (ValueType::literal(["low", "high"]), "high"),
        (ValueType::Tuple(TupleShape::fixed([ScalarKind::Int, ScalarKind::Str])), "3,abc"),
    ];
    for (value_type, raw) in cases {
        let value = value_type.coerce(raw).unwrap();
        assert_eq!(value.to_string(), raw);
        assert_eq!(value_type.coerce(&value.to_string()).unwrap(), value);
    }
}

#[test]
fn closure_validators_take_custom_messages() {
    let even = Validator::func(|v: &Value| v.as_int().is_some_and(|i| i % 2 == 0))
        .message("{} is odd");
    let spec = ArgSpec::new("even").arg(
        Argument::flag("n", ["-n"], ValueType::INT)
            .with_default(0)
            .with_validator(even),
    );
    assert_eq!(common::parse(&spec, &["-n", "4"]).unwrap().get::<i64>("n").unwrap(), 4);
    let err = common::parse(&spec, &["-n", "3"]).unwrap_err();
    assert!(matches!(err, ArgError::Validation(ref e) if e.reason == "3 is odd"));
}

#[test]
fn validators_run_on_defaults() {
    let spec = ArgSpec::new("bad").arg(
        Argument::flag("n", ["-n"], ValueType::INT)
            .with_default(-5)
            .with_validator(Validator::int().positive(false)),
    );
    assert!(matches!(common::parse(&spec, &[]), Err(ArgError::Validation(_))));
}
