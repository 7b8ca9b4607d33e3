use crate::config::{ModuleDefaults, DEFAULT_SENTINEL};
use serde::{Deserialize, Serialize};

/// Module overrides as requested on the command line; each may be `default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedOverrides {
    pub lyrics: String,
    pub covers: String,
    pub credits: String,
    pub separate_download: String,
}

impl Default for RequestedOverrides {
    fn default() -> Self {
        Self {
            lyrics: DEFAULT_SENTINEL.to_string(),
            covers: DEFAULT_SENTINEL.to_string(),
            credits: DEFAULT_SENTINEL.to_string(),
            separate_download: DEFAULT_SENTINEL.to_string(),
        }
    }
}

/// Modules to take lyrics, covers and credits from. `None` means the
/// downloading module's own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityOverrides {
    pub lyrics: Option<String>,
    pub covers: Option<String>,
    pub credits: Option<String>,
}

impl CapabilityOverrides {
    pub fn resolve(requested: &RequestedOverrides, defaults: &ModuleDefaults) -> Self {
        Self {
            lyrics: resolve_one(&requested.lyrics, &defaults.lyrics),
            covers: resolve_one(&requested.covers, &defaults.covers),
            credits: resolve_one(&requested.credits, &defaults.credits),
        }
    }
}

/// The requested value, else the configured default, else nothing.
fn resolve_one(requested: &str, configured: &str) -> Option<String> {
    let mut selected = requested.to_lowercase();
    if selected == DEFAULT_SENTINEL {
        selected = configured.to_lowercase();
    }
    non_default(selected)
}

/// Module that downloads playlists in place of the main module, if any.
pub fn resolve_separate_download(requested: &str) -> Option<String> {
    non_default(requested.to_lowercase())
}

fn non_default(value: String) -> Option<String> {
    if value == DEFAULT_SENTINEL || value.is_empty() {
        None
    } else {
        Some(value)
    }
}
