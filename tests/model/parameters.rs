//! Parameter Coercion Tests

use crate::common::json;
use modelstore::{
    coerce, Deferred, Element, Error, GetProperty, Instantiable, ModelContext, Parameter,
    ParameterValue, Value,
};

#[test]
fn declared_type_table() {
    assert_eq!(coerce(Some("int"), &Value::from("5")).unwrap(), Value::Int(5));
    assert!(!coerce(Some("bool"), &Value::from("")).unwrap().is_truthy());
    assert!(matches!(
        coerce(Some("float"), &Value::from("x")),
        Err(Error::TypeCoercion { .. })
    ));
    assert_eq!(
        coerce(Some("enum"), &Value::from("1")).unwrap_err(),
        Error::UnsupportedType {
            declared_type: "enum".to_string()
        }
    );
}

#[test]
fn declared_type_is_case_insensitive() {
    assert_eq!(coerce(Some("INT"), &Value::from(" 7 ")).unwrap(), Value::Int(7));
    assert_eq!(coerce(Some("Float"), &Value::from("2.5")).unwrap(), Value::Float(2.5));
    assert_eq!(coerce(Some("Str"), &Value::Int(3)).unwrap(), Value::from("3"));
    assert_eq!(coerce(Some("BOOL"), &Value::from("no")).unwrap(), Value::Bool(true));
}

#[test]
fn unset_type_yields_null() {
    assert_eq!(coerce(None, &Value::from("anything")).unwrap(), Value::Null);
}

#[test]
fn unsupported_type_never_passes_value_through() {
    for name in ["enum", "list", "map", "integer", ""] {
        assert!(matches!(
            coerce(Some(name), &Value::from("1")),
            Err(Error::UnsupportedType { .. })
        ));
    }
}

#[test]
fn raw_form_emits_coerced_value() {
    let a = Parameter::new("port", Some("int"), Some("8080"));
    let b = Parameter::new("port", Some("INT"), Some(" 8080"));
    let raw_a = a.raw_form().unwrap();
    let raw_b = b.raw_form().unwrap();

    assert_eq!(raw_a.as_object().unwrap()["value"], Value::Int(8080));
    assert_eq!(
        raw_a.as_object().unwrap()["value"],
        raw_b.as_object().unwrap()["value"]
    );
}

#[test]
fn raw_form_of_deferred_parameter_is_expression() {
    let p = Parameter::deferred("host", Some("str"), Deferred::new(GetProperty::new("host")));
    let raw = p.raw_form().unwrap();
    assert_eq!(
        raw.as_object().unwrap()["value"],
        json(serde_json::json!({"get_property": "host"}))
    );
}

#[test]
fn validate_reports_instead_of_failing() {
    let good = Parameter::new("n", Some("int"), Some("1"));
    let bad = Parameter::new("n", Some("int"), Some("one"));
    let unknown = Parameter::new("e", Some("enum"), Some("1"));

    let mut ctx = ModelContext::new();
    good.validate(&mut ctx);
    assert!(ctx.issues().is_empty());

    bad.validate(&mut ctx);
    unknown.validate(&mut ctx);
    assert_eq!(ctx.issues().len(), 2);
    assert!(ctx.has_errors());
    assert!(ctx.issues()[1].message.contains("enum"));
}

#[test]
fn coerce_values_evaluates_deferred_in_place() {
    let mut p = Parameter::deferred("port", Some("int"), Deferred::new(GetProperty::new("port")));
    let container = json(serde_json::json!({"properties": {"port": 22}}));

    let mut ctx = ModelContext::new();
    p.coerce_values(&mut ctx, &container, true).unwrap();

    assert!(!p.is_deferred());
    assert_eq!(p.value, ParameterValue::Evaluated(Value::Int(22)));
    assert_eq!(p.value().unwrap(), Value::Int(22));
}

#[test]
fn coerce_values_reports_or_returns_failures() {
    let container = json(serde_json::json!({"properties": {}}));
    let make = || Parameter::deferred("p", Some("int"), Deferred::new(GetProperty::new("p")));

    let mut reported = make();
    let mut ctx = ModelContext::new();
    reported.coerce_values(&mut ctx, &container, true).unwrap();
    assert!(ctx.has_errors());
    assert!(reported.is_deferred());

    let mut raised = make();
    let mut ctx = ModelContext::new();
    let err = raised.coerce_values(&mut ctx, &container, false).unwrap_err();
    assert!(matches!(err, Error::Evaluation { .. }));
    assert!(ctx.issues().is_empty());
}

#[test]
fn instantiate_aliases_deferred_value() {
    let f = Deferred::new(GetProperty::new("x"));
    let template = Parameter::deferred("x", None, f.clone()).with_description("copied");

    let mut ctx = ModelContext::new();
    let live = template.instantiate(&mut ctx, &Value::Null).unwrap();

    let ParameterValue::Deferred(copied) = &live.value else {
        panic!("instance lost its deferred value");
    };
    assert!(copied.same_instance(&f));
    assert_eq!(live.description.as_deref(), Some("copied"));
}

#[test]
fn dump_prints_name_type_and_description() {
    let p = Parameter::new("retries", Some("int"), Some("3")).with_description("attempts");
    let mut ctx = ModelContext::new();
    p.dump(&mut ctx);
    assert_eq!(
        ctx.output(),
        "retries: 3\n  Type: int\n  Description: attempts\n"
    );
}
