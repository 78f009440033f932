use std::sync::Arc;
use std::thread;

use make_enum::{CaseValue, EnumTable, Error, Member, PayloadShape, Static, Value};

fn sample() -> EnumTable {
    EnumTable::builder("Sample")
        .unit("a")
        .case("b", PayloadShape::Object)
        .case("c", PayloadShape::Tuple(2))
        .build()
        .unwrap()
}

fn maybe() -> EnumTable {
    EnumTable::builder("Maybe")
        .unit("none")
        .case("some", PayloadShape::Value)
        .method("map", |table, this, args| {
            let [Value::Str(op)] = args else {
                return Err(Error::custom("map expects the name of an operation"));
            };
            match this.case() {
                "none" => Ok(table.construct("none", &[])?.into()),
                _ => {
                    let x = this
                        .payload()
                        .as_i64()
                        .ok_or_else(|| Error::custom("payload is not an integer"))?;
                    let mapped = match op.as_str() {
                        "square" => x * x,
                        "negate" => -x,
                        other => return Err(Error::custom(format!("unknown operation `{other}`"))),
                    };
                    Ok(table.construct("some", &[Value::from(mapped)])?.into())
                }
            }
        })
        .method("is_some", |_, this, _| Ok(Value::from(this.case() == "some")))
        .static_fn("from_int", |table, args| match args {
            [Value::Null] | [] => Ok(table.construct("none", &[])?.into()),
            [value] => Ok(table.construct("some", &[value.clone()])?.into()),
            _ => Err(Error::custom("from_int takes at most one argument")),
        })
        .build()
        .unwrap()
}

fn expect_case(value: Value) -> CaseValue {
    match value {
        Value::Case(case) => *case,
        other => panic!("expected a case value, found {:?}", other),
    }
}

#[test]
fn test_sample_scenario() {
    let table = sample();

    let a = table.construct("a", &[]).unwrap();
    assert_eq!(a.case(), "a");
    assert_eq!(a.payload(), &Value::Unit);

    let b = table
        .construct("b", &[Value::object([("value", 42)])])
        .unwrap();
    assert_eq!(b.case(), "b");
    assert_eq!(b.payload().get("value"), Some(&Value::Int(42)));

    let c = table
        .construct("c", &[Value::tuple([Value::from("x"), Value::from(7)])])
        .unwrap();
    assert_eq!(
        c.payload(),
        &Value::tuple([Value::from("x"), Value::from(7)])
    );
    let as_object = Value::object([("0", Value::from("x")), ("1", Value::from(7))]);
    for key in ["0", "1"] {
        assert_eq!(c.payload().get(key), as_object.get(key));
    }
}

#[test]
fn test_equal_payloads_give_equal_values() {
    let table = sample();
    let payload = Value::object([("value", 1.5)]);
    let first = table.construct("b", &[payload.clone()]).unwrap();
    let second = table.construct("b", &[payload]).unwrap();
    assert_eq!(first, second);
    assert_ne!(first, table.construct("b", &[Value::object([("value", 2.5)])]).unwrap());
}

#[test]
fn test_payload_is_copied() {
    let table = sample();
    let mut fields = Value::object([("value", 1)]);
    let value = table.construct("b", &[fields.clone()]).unwrap();
    if let Value::Object(map) = &mut fields {
        map.insert("value".into(), Value::from(2));
    }
    assert_eq!(value.payload().get("value"), Some(&Value::Int(1)));
}

#[test]
fn test_case_is_fixed_at_construction() {
    let table = sample();
    let original = table.construct("c", &[Value::from("x"), Value::from(7)]).unwrap();

    let copy = original.clone();
    let case = copy.case().to_owned();
    let rebuilt = table.construct(&case, &[copy.into_payload()]).unwrap();
    assert_eq!(original.case(), "c");
    assert_eq!(rebuilt.case(), original.case());
    assert_eq!(rebuilt, original);

    // Another case needs another value; the original keeps its tag
    let other = table.construct("a", &[]).unwrap();
    assert_ne!(other, original);
    assert_eq!(original.case(), "c");
}

#[test]
fn test_registry_is_complete() {
    let table = sample();
    let cases = table.cases();
    assert_eq!(cases.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    for name in ["a", "b", "c"] {
        assert_eq!(cases.get(name), Some(name));
    }
    assert!(!cases.contains("d"));
}

#[test]
fn test_unknown_case_fails_immediately() {
    let table = sample();
    assert!(matches!(
        table.get("typo"),
        Err(Error::UnknownCase { ref name, .. }) if name == "typo"
    ));
    assert!(table.constructor("typo").is_err());
}

#[test]
fn test_maybe_map() {
    let table = maybe();

    let some = table.construct("some", &[Value::from(42)]).unwrap();
    assert_eq!(some.case(), "some");

    let none = table.construct("none", &[]).unwrap();
    assert!(none.payload().is_unit());

    let squared = expect_case(some.call("map", &[Value::from("square")]).unwrap());
    assert_eq!(
        squared,
        table.construct("some", &[Value::from(1764)]).unwrap()
    );
    assert!(squared.belongs_to(&table));

    // The operation is never looked up for `none`, so even an unknown one succeeds
    let still_none = expect_case(none.call("map", &[Value::from("explode")]).unwrap());
    assert_eq!(still_none, none);

    assert!(matches!(
        some.call("map", &[Value::from("explode")]),
        Err(Error::Custom(_))
    ));
    assert!(matches!(
        some.call("flat_map", &[]),
        Err(Error::UnknownMethod { .. })
    ));
}

#[test]
fn test_behavior_is_shared() {
    let table = maybe();
    let some = table.construct("some", &[Value::from(1)]).unwrap();
    let none = table.construct("none", &[]).unwrap();

    let from_some = some.method("map").unwrap();
    let from_none = none.method("map").unwrap();
    assert!(Arc::ptr_eq(from_some, from_none));

    assert_eq!(some.call("is_some", &[]).unwrap(), Value::Bool(true));
    assert_eq!(none.call("is_some", &[]).unwrap(), Value::Bool(false));
}

#[test]
fn test_statics() {
    let table = maybe();
    let some = expect_case(table.call_static("from_int", &[Value::from(3)]).unwrap());
    assert_eq!(some.payload(), &Value::Int(3));
    let none = expect_case(table.call_static("from_int", &[Value::Null]).unwrap());
    assert!(none.is_unit());

    assert!(matches!(table.get("from_int"), Ok(Member::Static(Static::Function(_)))));
    assert!(matches!(table.get("some"), Ok(Member::Constructor(_))));
    assert!(matches!(
        table.call_static("missing", &[]),
        Err(Error::UnknownStatic { .. })
    ));
}

#[test]
fn test_static_case_collision_is_rejected() {
    let result = EnumTable::builder("Clash")
        .unit("none")
        .case("some", PayloadShape::Value)
        .static_fn("some", |_, _| Ok(Value::Null))
        .build();
    assert_eq!(
        result.unwrap_err(),
        Error::StaticCollision {
            enum_name: "Clash".into(),
            name: "some".into()
        }
    );
}

#[test]
fn test_every_configuration_shape_builds() {
    let bare = EnumTable::builder("Bare").unit("x").build().unwrap();
    let with_behavior = EnumTable::builder("Behavior")
        .unit("x")
        .method("name", |table, _, _| Ok(Value::from(table.name())))
        .build()
        .unwrap();
    let with_statics = EnumTable::builder("Statics")
        .unit("x")
        .static_value("VERSION", 1)
        .build()
        .unwrap();
    let with_both = EnumTable::builder("Both")
        .unit("x")
        .method("name", |table, _, _| Ok(Value::from(table.name())))
        .static_value("VERSION", 1)
        .build()
        .unwrap();

    for table in [&bare, &with_behavior, &with_statics, &with_both] {
        let x = table.construct("x", &[]).unwrap();
        assert!(x.is_unit());
        assert!(x.belongs_to(table));
    }
    assert_eq!(
        with_both.construct("x", &[]).unwrap().call("name", &[]).unwrap(),
        Value::from("Both")
    );
    assert_eq!(with_statics.static_value("VERSION").unwrap(), &Value::Int(1));
}

#[test]
fn test_nested_case_values() {
    let color = EnumTable::builder("Color")
        .case("red", PayloadShape::Value)
        .build()
        .unwrap();
    let wrapper = EnumTable::builder("Wrapper")
        .unit("none")
        .case("some", PayloadShape::Value)
        .build()
        .unwrap();

    let red = color.construct("red", &[Value::from(1)]).unwrap();
    let wrapped = wrapper.construct("some", &[red.clone().into()]).unwrap();

    let inner = wrapped.narrow("some").unwrap().as_case().unwrap();
    assert_eq!(inner, &red);
    assert_eq!(inner.case(), "red");
    assert_eq!(inner.payload(), &Value::Int(1));
    assert!(inner.belongs_to(&color));

    let again = wrapper
        .construct("some", &[color.construct("red", &[Value::from(1)]).unwrap().into()])
        .unwrap();
    assert_eq!(wrapped, again);

    assert_eq!(
        wrapped.narrow("none").unwrap_err(),
        Error::CaseMismatch {
            expected: "none".into(),
            found: "some".into()
        }
    );
}

#[test]
fn test_table_is_shared_across_threads() {
    let table = maybe();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let table = table.clone();
            thread::spawn(move || {
                let value = table.construct("some", &[Value::from(i)]).unwrap();
                expect_case(value.call("map", &[Value::from("square")]).unwrap())
                    .payload()
                    .as_i64()
            })
        })
        .collect();

    let mut squares: Vec<i64> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap().unwrap())
        .collect();
    squares.sort();
    assert_eq!(squares, vec![0, 1, 4, 9]);
}
