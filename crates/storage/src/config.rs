//! Process-wide model settings
//!
//! Settings are fixed once per process. They are either configured
//! explicitly during application startup, or frozen to their defaults the
//! first time a record is constructed. After that point they cannot change.
//!
//! Owner tracking (wiring tracked containers to the record that owns them)
//! is the only setting. Disabling it must happen before the first record is
//! constructed; records wired before that keep notifying their owner.

use modelstore_core::{Error, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Config file name conventionally used by embedders.
pub const CONFIG_FILE_NAME: &str = "modelstore.toml";

static SETTINGS: OnceCell<ModelSettings> = OnceCell::new();

/// Model settings, loadable from TOML.
///
/// # Example
///
/// ```toml
/// # Wire tracked containers to their owning record (default: true)
/// owner_tracking = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Automatically notify the owning record when a tracked container changes.
    #[serde(default = "default_owner_tracking")]
    pub owner_tracking: bool,
}

fn default_owner_tracking() -> bool {
    true
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            owner_tracking: default_owner_tracking(),
        }
    }
}

impl ModelSettings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Model store configuration
#
# Wire tracked containers to their owning record (default: true).
# Disable only when the persistence layer marks records dirty itself.
owner_tracking = true
"#
    }
}

/// Fix the process-wide settings.
///
/// # Errors
///
/// Returns `Error::AlreadyInitialized` if settings were already configured,
/// or already frozen by constructing a record.
pub fn configure(settings: ModelSettings) -> Result<()> {
    let requested = settings.clone();
    SETTINGS.set(settings).map_err(|_| {
        Error::AlreadyInitialized(format!(
            "cannot apply {:?}; settings are {:?}",
            requested,
            SETTINGS.get()
        ))
    })?;
    info!(target: "modelstore::config", owner_tracking = requested.owner_tracking, "Model settings configured");
    Ok(())
}

/// The process-wide settings, frozen to the defaults on first use.
pub fn settings() -> &'static ModelSettings {
    SETTINGS.get_or_init(|| {
        info!(target: "modelstore::config", "Model settings frozen to defaults");
        ModelSettings::default()
    })
}

/// Stop wiring tracked containers to their owning records.
///
/// Must be called before any record is constructed. Succeeds if owner
/// tracking is already disabled.
///
/// # Errors
///
/// Returns `Error::AlreadyInitialized` when settings were already fixed with
/// owner tracking enabled; already wired records are unaffected.
pub fn disable_owner_tracking() -> Result<()> {
    match configure(ModelSettings {
        owner_tracking: false,
    }) {
        Ok(()) => Ok(()),
        Err(_) if !settings().owner_tracking => Ok(()),
        Err(err) => {
            warn!(target: "modelstore::config", "Owner tracking disabled too late; records are already wired");
            Err(err)
        }
    }
}
