//! Strict, change-tracked containers for the model store
//!
//! This crate implements the persistence-facing half of the model:
//! - Registry: one identity-stable `StrictKind` per type-parameter combination
//! - TrackedContainer: strict mappings/sequences that notify their owner
//! - RecordState: owning record bookkeeping (dirty fields, manual marks)
//! - Codec: flat text encoding of container values
//! - Config: process-wide owner-tracking settings, fixed at initialization
//! - Metadata: a complete record built from the pieces above
//!
//! # Concurrency
//!
//! The registry is safe to use from any thread. Containers are mutated
//! through `&mut` and carry no lock of their own.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod kind;
pub mod metadata;
pub mod record;
pub mod registry;
pub mod tracked;

pub use codec::{get_codec, JsonTextCodec, TextCodec};
pub use config::{configure, disable_owner_tracking, settings, ModelSettings, CONFIG_FILE_NAME};
pub use kind::{KindKey, StrictKind};
pub use metadata::Metadata;
pub use record::{ChangeListener, RecordState};
pub use registry::{dict_kind, list_kind, strict_dict, strict_list};
pub use tracked::{NestedMut, TrackedContainer};
