//! Record Tests
//!
//! Load, edit and save cycles through `RecordState` and `Metadata`.

use crate::common::{json, tracked_record, tracking};
use modelstore::{
    strict_dict, strict_list, Element, ElementType, Metadata, ModelContext, RecordState, Value,
};
use std::sync::Arc;

#[test]
fn save_cycle_reencodes_only_dirty_fields() {
    let record = tracked_record();
    let tags = strict_list(ElementType::Str);
    let limits = strict_dict(ElementType::Str, ElementType::Int);

    let mut tag_field = record.load("tags", &tags, Some(r#"["a"]"#)).unwrap().unwrap();
    let limit_field = record
        .load("limits", &limits, Some(r#"{"cpu":2}"#))
        .unwrap()
        .unwrap();

    tag_field.append("b").unwrap();
    let dirty = record.take_dirty();
    assert_eq!(dirty, vec!["tags".to_string()]);

    let text = tags.encode(Some(&tag_field)).unwrap();
    assert_eq!(text.as_deref(), Some(r#"["a","b"]"#));
    assert_eq!(limit_field.get("cpu"), Some(&Value::Int(2)));
    assert!(!record.is_dirty());
}

#[test]
fn reassigning_container_rewires_owner() {
    let old_owner = tracked_record();
    let new_owner = tracked_record();
    let kind = strict_dict(ElementType::Str, ElementType::Any);

    let field = old_owner
        .bind("data", &kind, json(serde_json::json!({"k": 1})))
        .unwrap()
        .unwrap();
    let mut field = new_owner.assign_container("data", &kind, field).unwrap();
    new_owner.take_dirty();

    field.set_item("k", 2).unwrap();
    assert!(!old_owner.is_dirty());
    assert!(new_owner.is_dirty());
}

#[test]
fn container_of_other_kind_is_rechecked_on_assign() {
    let record = tracked_record();
    let loose = strict_list(ElementType::Any);
    let ints = strict_list(ElementType::Int);

    let field = record
        .bind("items", &loose, json(serde_json::json!([1, "two"])))
        .unwrap()
        .unwrap();
    assert!(record.assign_container("items", &ints, field).unwrap_err().is_strict_type());
    assert!(!record.is_dirty());
}

#[test]
fn records_are_independent_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let record = RecordState::with_settings(&tracking());
                let mut meta = Metadata::with_state(Arc::clone(&record), format!("m{}", i)).unwrap();
                meta.save().unwrap();
                meta.set("thread", i).unwrap();
                (record.change_count(), meta.save().unwrap())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (changes, saved) = handle.join().unwrap();
        assert_eq!(changes, 2);
        assert_eq!(saved, Some(format!(r#"{{"thread":{}}}"#, i)));
    }
}

#[test]
fn metadata_round_trip() {
    let mut meta = Metadata::with_state(tracked_record(), "service").unwrap();
    meta.set("replicas", 3).unwrap();
    meta.values_mut()
        .set_item("labels", json(serde_json::json!({"tier": "web"})))
        .unwrap();
    let text = meta.save().unwrap().unwrap();

    let mut loaded = Metadata::load_with_state(tracked_record(), "service", Some(&text)).unwrap();
    assert_eq!(loaded.raw_form().unwrap(), meta.raw_form().unwrap());
    assert_eq!(loaded.save().unwrap(), None);

    loaded
        .values_mut()
        .nested_mut("labels")
        .unwrap()
        .set("tier", "api")
        .unwrap();
    assert!(loaded.save().unwrap().unwrap().contains("api"));
}

#[test]
fn metadata_dump_is_sorted() {
    let mut meta = Metadata::with_state(tracked_record(), "m").unwrap();
    meta.set("zeta", true).unwrap();
    meta.set("alpha", "first").unwrap();

    let mut ctx = ModelContext::new();
    meta.dump(&mut ctx);
    assert_eq!(ctx.output(), "m:\n  alpha: first\n  zeta: true\n");
}
