//! Owner Tracking Disable Tests
//!
//! Disabling owner tracking is a one-time, process-wide step, so this suite
//! owns its own test binary and runs everything in a single ordered test.

use modelstore::{
    configure, dict_kind, disable_owner_tracking, settings, Error, Metadata, ModelSettings,
    RecordState, Value,
};

#[test]
fn disable_before_first_record_then_manage_dirtiness_manually() {
    // Must precede every record constructed in this process
    disable_owner_tracking().unwrap();
    assert!(!settings().owner_tracking);

    // Repeating the request is harmless; changing it back is not allowed
    disable_owner_tracking().unwrap();
    assert!(matches!(
        configure(ModelSettings::default()),
        Err(Error::AlreadyInitialized(_))
    ));

    let record = RecordState::new();
    assert!(!record.owner_tracking());

    let mut field = record
        .bind("data", &dict_kind(), serde_json::json!({"a": {"b": 1}}).into())
        .unwrap()
        .unwrap();
    assert!(!field.is_bound());

    field.set_item("x", 1).unwrap();
    field.nested_mut("a").unwrap().set("b", 2).unwrap();
    assert!(!record.is_dirty());

    record.mark_dirty("data");
    assert_eq!(record.take_dirty(), vec!["data".to_string()]);

    // Records built on the process-wide settings behave the same way
    let mut meta = Metadata::load("meta", Some(r#"{"k":1}"#)).unwrap();
    meta.set("k", 2).unwrap();
    assert_eq!(meta.save().unwrap(), None);
    meta.state().mark_dirty("values");
    assert_eq!(meta.save().unwrap().as_deref(), Some(r#"{"k":2}"#));
    assert_eq!(meta.get("k"), Some(&Value::Int(2)));
}
