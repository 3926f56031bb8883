//! Owning records and change notification
//!
//! The persistence layer owns records; this crate only needs to tell a
//! record which of its fields changed. [`ChangeListener`] is that seam, and
//! [`RecordState`] is the listener used by records built on this crate: it
//! collects dirtied field names until the save path takes them.
//!
//! Whether containers are wired to their record at all is decided by the
//! process-wide settings when the record is constructed (see
//! [`crate::config`]).

use crate::config::{settings, ModelSettings};
use crate::kind::StrictKind;
use crate::tracked::TrackedContainer;
use modelstore_core::{Result, Value};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::trace;
use uuid::Uuid;

/// Receiver of "field changed" signals from tracked containers
pub trait ChangeListener: Send + Sync {
    /// Called after every mutation of the container bound under `field`
    fn changed(&self, field: &str);
}

/// Dirty-state bookkeeping for one record
#[derive(Debug)]
pub struct RecordState {
    id: Uuid,
    owner_tracking: bool,
    dirty: Mutex<BTreeSet<String>>,
    changes: AtomicU64,
}

impl RecordState {
    /// Create a record under the process-wide settings
    ///
    /// The first call freezes the settings (see [`crate::config::settings`]).
    pub fn new() -> Arc<Self> {
        Self::with_settings(settings())
    }

    /// Create a record under explicit settings
    pub fn with_settings(settings: &ModelSettings) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4(),
            owner_tracking: settings.owner_tracking,
            dirty: Mutex::new(BTreeSet::new()),
            changes: AtomicU64::new(0),
        })
    }

    /// Record identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether containers bound to this record notify it
    pub fn owner_tracking(&self) -> bool {
        self.owner_tracking
    }

    /// Check if any field changed since the last [`take_dirty`](Self::take_dirty)
    pub fn is_dirty(&self) -> bool {
        !self.dirty.lock().is_empty()
    }

    /// Total change signals received, manual marks included
    pub fn change_count(&self) -> u64 {
        self.changes.load(Ordering::Acquire)
    }

    /// Dirtied field names, sorted
    pub fn dirty_fields(&self) -> Vec<String> {
        self.dirty.lock().iter().cloned().collect()
    }

    /// Return the dirtied field names and mark the record clean
    pub fn take_dirty(&self) -> Vec<String> {
        std::mem::take(&mut *self.dirty.lock()).into_iter().collect()
    }

    /// Mark `field` as changed
    pub fn mark_dirty(&self, field: &str) {
        self.dirty.lock().insert(field.to_string());
        self.changes.fetch_add(1, Ordering::AcqRel);
    }

    /// Bind a value loaded from storage under `field`
    ///
    /// The value is coerced through `kind`. The record is not dirtied.
    pub fn bind(
        self: &Arc<Self>,
        field: &str,
        kind: &Arc<StrictKind>,
        value: Value,
    ) -> Result<Option<TrackedContainer>> {
        let mut container = kind.coerce(field, value)?;
        if let Some(container) = container.as_mut() {
            self.wire(field, container);
        }
        Ok(container)
    }

    /// Decode stored text under `field` and bind it
    pub fn load(
        self: &Arc<Self>,
        field: &str,
        kind: &Arc<StrictKind>,
        text: Option<&str>,
    ) -> Result<Option<TrackedContainer>> {
        let mut container = kind.decode(field, text)?;
        if let Some(container) = container.as_mut() {
            self.wire(field, container);
        }
        Ok(container)
    }

    /// Assign a new value to `field`, dirtying the record
    pub fn assign(
        self: &Arc<Self>,
        field: &str,
        kind: &Arc<StrictKind>,
        value: Value,
    ) -> Result<Option<TrackedContainer>> {
        let container = self.bind(field, kind, value)?;
        self.mark_dirty(field);
        Ok(container)
    }

    /// Assign an existing container to `field`, dirtying the record
    ///
    /// A container of another kind is re-checked against `kind`.
    pub fn assign_container(
        self: &Arc<Self>,
        field: &str,
        kind: &Arc<StrictKind>,
        container: TrackedContainer,
    ) -> Result<TrackedContainer> {
        let mut container = kind.adopt(field, container)?;
        self.wire(field, &mut container);
        self.mark_dirty(field);
        Ok(container)
    }

    fn wire(self: &Arc<Self>, field: &str, container: &mut TrackedContainer) {
        if !self.owner_tracking {
            container.unbind();
            return;
        }
        let weak = Arc::downgrade(self);
        let listener: Weak<dyn ChangeListener> = weak;
        container.bind(listener, field);
        trace!(target: "modelstore::record", record = %self.id, field, "Wired container to owner");
    }
}

impl ChangeListener for RecordState {
    fn changed(&self, field: &str) {
        self.mark_dirty(field);
    }
}
