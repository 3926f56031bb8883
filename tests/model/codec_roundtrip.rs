//! Text Codec Tests
//!
//! decode(encode(v)) == v for plain values, stored null passes through,
//! and malformed text is a codec error.

use crate::common::json;
use modelstore::{dict_kind, get_codec, list_kind, Error, JsonTextCodec, TextCodec, Value};
use proptest::prelude::*;

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-4_000_000i64..4_000_000).prop_map(|n| Value::Float(n as f64 / 16.0)),
        ".{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::hash_map(".{0,8}", inner, 0..8).prop_map(Value::Object),
        ]
    })
}

proptest! {
    #[test]
    fn decode_inverts_encode(value in arb_value()) {
        let text = JsonTextCodec.encode(Some(&value)).unwrap();
        prop_assert_eq!(JsonTextCodec.decode(text.as_deref()).unwrap(), Some(value));
    }

    #[test]
    fn dict_field_round_trips_through_kind(
        map in prop::collection::hash_map("[a-z]{1,8}", arb_value(), 0..8)
    ) {
        let kind = dict_kind();
        let original = Value::Object(map);
        let field = kind.coerce("f", original.clone()).unwrap();
        let text = kind.encode(field.as_ref()).unwrap();
        let decoded = kind.decode("f", text.as_deref()).unwrap().unwrap();
        prop_assert_eq!(decoded.as_value(), &original);
    }
}

#[test]
fn stored_null_passes_through() {
    let codec = get_codec("json").unwrap();
    assert_eq!(codec.encode(None).unwrap(), None);
    assert_eq!(codec.decode(None).unwrap(), None);
    assert!(list_kind().decode("f", None).unwrap().is_none());
}

#[test]
fn malformed_text_is_codec_error() {
    for text in ["{", "[1,", "not json", "{\"a\":}"] {
        assert!(matches!(JsonTextCodec.decode(Some(text)), Err(Error::Codec(_))), "{}", text);
        assert!(matches!(dict_kind().decode("f", Some(text)), Err(Error::Codec(_))));
    }
}

#[test]
fn non_finite_float_is_not_encodable() {
    for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let value = json(serde_json::json!({"x": 1}));
        let mut map = value.as_object().cloned().unwrap();
        map.insert("bad".to_string(), Value::Float(f));
        let result = JsonTextCodec.encode(Some(&Value::Object(map)));
        assert!(matches!(result, Err(Error::Codec(_))));
    }
}

#[test]
fn integers_and_floats_stay_distinct() {
    let text = JsonTextCodec
        .encode(Some(&json(serde_json::json!([1, 1.5]))))
        .unwrap();
    let decoded = JsonTextCodec.decode(text.as_deref()).unwrap().unwrap();
    assert_eq!(decoded.as_array().unwrap()[0], Value::Int(1));
    assert_eq!(decoded.as_array().unwrap()[1], Value::Float(1.5));
}
