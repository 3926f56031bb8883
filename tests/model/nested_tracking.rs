//! Nested Mutation Tracking Tests
//!
//! Editing below the top level of a field dirties the owning record the
//! same way reassigning a top-level entry does.

use crate::common::{json, tracked_record};
use modelstore::{dict_kind, list_kind, Error, Value};

#[test]
fn inner_dict_edit_dirties_record() {
    let record = tracked_record();
    let mut field = record
        .bind("field", &dict_kind(), json(serde_json::json!({"a": {"b": 1}})))
        .unwrap()
        .unwrap();
    assert!(!record.is_dirty());

    field.nested_mut("a").unwrap().set("b", 2).unwrap();

    assert!(record.is_dirty());
    assert_eq!(record.take_dirty(), vec!["field".to_string()]);
    assert_eq!(field, json(serde_json::json!({"a": {"b": 2}})));
}

#[test]
fn top_level_reassignment_dirties_record_the_same_way() {
    let nested = tracked_record();
    let top = tracked_record();
    let mut a = nested
        .bind("field", &dict_kind(), json(serde_json::json!({"a": {"b": 1}})))
        .unwrap()
        .unwrap();
    let mut b = top
        .bind("field", &dict_kind(), json(serde_json::json!({"a": {"b": 1}})))
        .unwrap()
        .unwrap();

    a.nested_mut("a").unwrap().set("b", 1).unwrap();
    b.set_item("a", json(serde_json::json!({}))).unwrap();

    assert_eq!(nested.dirty_fields(), top.dirty_fields());
    assert_eq!(nested.change_count(), top.change_count());
}

#[test]
fn inner_dict_update_keeps_structure() {
    let record = tracked_record();
    let mut field = record
        .bind(
            "dict1",
            &dict_kind(),
            json(serde_json::json!({"inner_dict": {"inner_key": "inner_value"}})),
        )
        .unwrap()
        .unwrap();

    field
        .nested_mut("inner_dict")
        .unwrap()
        .set("inner_key", "new_inner_value")
        .unwrap();

    assert_eq!(
        field,
        json(serde_json::json!({"inner_dict": {"inner_key": "new_inner_value"}}))
    );
    assert!(record.is_dirty());
}

#[test]
fn inner_list_update_keeps_structure() {
    let record = tracked_record();
    let mut field = record
        .bind(
            "list1",
            &list_kind(),
            json(serde_json::json!([1, ["inner_value"], {"inner_key": ["x"]}])),
        )
        .unwrap()
        .unwrap();

    field
        .nested_index_mut(1)
        .unwrap()
        .set_index(0, "new_inner_value")
        .unwrap();
    field
        .nested_index_mut(2)
        .unwrap()
        .nested_mut("inner_key")
        .unwrap()
        .insert(0, "w")
        .unwrap();

    assert_eq!(
        field,
        json(serde_json::json!([1, ["new_inner_value"], {"inner_key": ["w", "x"]}]))
    );
    assert_eq!(record.change_count(), 2);
}

#[test]
fn nested_remove_and_push() {
    let record = tracked_record();
    let mut field = record
        .bind("f", &dict_kind(), json(serde_json::json!({"tags": [], "opts": {"x": 1}})))
        .unwrap()
        .unwrap();

    field.nested_mut("tags").unwrap().push("fast").unwrap();
    assert_eq!(field.nested_mut("opts").unwrap().remove("x").unwrap(), Some(Value::Int(1)));
    assert_eq!(field.nested_mut("opts").unwrap().remove("x").unwrap(), None);
    assert_eq!(record.change_count(), 2);
}

#[test]
fn nested_scalar_is_not_a_container() {
    let record = tracked_record();
    let mut field = record
        .bind("f", &dict_kind(), json(serde_json::json!({"n": 3})))
        .unwrap()
        .unwrap();

    assert!(matches!(field.nested_mut("n"), Err(Error::Storage(_))));
    assert!(matches!(
        field.nested_index_mut(0),
        Err(Error::Storage(_))
    ));
    assert!(!record.is_dirty());
}

#[test]
fn wrong_shape_nested_call_fails_without_signal() {
    let record = tracked_record();
    let mut field = record
        .bind("f", &list_kind(), json(serde_json::json!([{"a": 1}])))
        .unwrap()
        .unwrap();

    let mut inner = field.nested_index_mut(0).unwrap();
    assert!(matches!(inner.push(2), Err(Error::Storage(_))));
    assert!(matches!(inner.set_index(0, 2), Err(Error::Storage(_))));
    assert_eq!(inner.get("a"), Some(&Value::Int(1)));
    assert!(!record.is_dirty());
}
