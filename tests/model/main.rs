#[path = "../common/mod.rs"]
mod common;

mod codec_roundtrip;
mod nested_tracking;
mod parameters;
mod records;
mod registry_identity;
