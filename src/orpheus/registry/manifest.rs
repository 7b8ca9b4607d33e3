use super::command::CommandModule;
use super::{ModuleEntry, ModuleRegistry, ModuleRouting, UrlConstants, UrlDecoding};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A module as declared in the `modules` section of the config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleManifest {
    pub name: String,

    /// Regex tested against the host of incoming URLs.
    pub netloc_pattern: String,

    #[serde(default)]
    pub url_decoding: UrlDecoding,

    /// Path segment → media type. Empty means the default mapping.
    #[serde(default, skip_serializing_if = "UrlConstants::is_empty")]
    pub url_constants: UrlConstants,

    #[serde(default)]
    pub hidden: bool,

    /// Program implementing `search` and `parse-url` for this module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl ModuleManifest {
    pub fn new(name: impl Into<String>, netloc_pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            netloc_pattern: netloc_pattern.into(),
            url_decoding: UrlDecoding::Auto,
            url_constants: UrlConstants::new(),
            hidden: false,
            command: None,
        }
    }

    pub fn to_entry(&self) -> Result<ModuleEntry> {
        let mut entry = ModuleEntry::new(&self.name, &self.netloc_pattern)?.with_routing(
            ModuleRouting {
                url_decoding: self.url_decoding,
                url_constants: self.url_constants.clone(),
            },
        );
        entry.hidden = self.hidden;
        if let Some(command) = &self.command {
            let name = entry.name.clone();
            entry = entry.with_backend(CommandModule::new(name, command));
        }
        Ok(entry)
    }
}

impl ModuleRegistry {
    /// Builds a registry from config manifests, preserving their order.
    pub fn from_manifests(manifests: &[ModuleManifest]) -> Result<Self> {
        let mut registry = ModuleRegistry::new();
        for manifest in manifests {
            registry.register(manifest.to_entry()?);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrpheusError;
    use crate::model::MediaType;

    #[test]
    fn manifests_build_entries_in_order() {
        let mut qobuz = ModuleManifest::new("Qobuz", r"qobuz\.com");
        qobuz.url_constants.insert("disc".into(), MediaType::Album);
        let mut spotify = ModuleManifest::new("spotify", r"spotify\.com");
        spotify.url_decoding = UrlDecoding::Manual;
        spotify.hidden = true;
        spotify.command = Some("orpheus-spotify".into());

        let registry = ModuleRegistry::from_manifests(&[qobuz, spotify]).unwrap();
        let names: Vec<_> = registry.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["qobuz", "spotify"]);

        let spotify = registry.get("spotify").unwrap();
        assert_eq!(spotify.routing.url_decoding, UrlDecoding::Manual);
        assert!(spotify.hidden);
        assert!(spotify.backend.is_some());
        assert!(registry.get("qobuz").unwrap().backend.is_none());
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let broken = ModuleManifest::new("broken", "(unclosed");
        assert!(matches!(
            ModuleRegistry::from_manifests(&[broken]),
            Err(OrpheusError::Pattern(_))
        ));
    }

    #[test]
    fn url_constants_keep_declaration_order() {
        let json = r#"{"name": "m", "netloc_pattern": "m", "url_constants": {"song": "track", "record": "album", "list": "playlist"}}"#;
        let manifest: ModuleManifest = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = manifest.url_constants.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["song", "record", "list"]);
    }

    #[test]
    fn command_backend_reports_under_module_name() {
        let mut manifest = ModuleManifest::new("Scripted", r"scripted\.example");
        manifest.command = Some("/nonexistent/orpheus-module".into());

        let registry = ModuleRegistry::from_manifests(&[manifest]).unwrap();
        let err = registry
            .load_module("scripted")
            .unwrap()
            .search(MediaType::Track, "query", 5)
            .unwrap_err();
        match err {
            OrpheusError::Module { module, .. } => assert_eq!(module, "scripted"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
