use crate::error::{OrpheusError, Result};
use crate::registry::manifest::ModuleManifest;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "config.json";
pub const HOME_ENV: &str = "ORPHEUS_HOME";

const DEFAULT_DOWNLOAD_PATH: &str = "./downloads/";
const DEFAULT_SEARCH_LIMIT: usize = 10;
const DEFAULT_PICKER_COMMAND: &str = "fzf";

/// Sentinel meaning "defer to the next level of defaults".
pub const DEFAULT_SENTINEL: &str = "default";

/// Configuration for orpheus, stored in `config.json` under the config dir.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrpheusConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub module_defaults: ModuleDefaults,

    #[serde(default)]
    pub picker: PickerConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Registered modules, in routing order.
    #[serde(default)]
    pub modules: Vec<ModuleManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneralConfig {
    #[serde(default = "default_download_path")]
    pub download_path: String,

    /// Number of candidates requested from a module for interactive search.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            download_path: default_download_path(),
            search_limit: default_search_limit(),
        }
    }
}

/// Modules used for lyrics, covers and credits when the CLI leaves them at `default`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleDefaults {
    #[serde(default = "default_sentinel")]
    pub lyrics: String,
    #[serde(default = "default_sentinel")]
    pub covers: String,
    #[serde(default = "default_sentinel")]
    pub credits: String,
}

impl Default for ModuleDefaults {
    fn default() -> Self {
        Self {
            lyrics: default_sentinel(),
            covers: default_sentinel(),
            credits: default_sentinel(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickerConfig {
    /// Use the external fuzzy picker when it is installed.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_picker_command")]
    pub command: String,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_picker_command(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    /// External download program fed the job on stdin. Unset prints the job instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

fn default_download_path() -> String {
    DEFAULT_DOWNLOAD_PATH.to_string()
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_sentinel() -> String {
    DEFAULT_SENTINEL.to_string()
}

fn default_picker_command() -> String {
    DEFAULT_PICKER_COMMAND.to_string()
}

fn default_true() -> bool {
    true
}

impl OrpheusConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: OrpheusConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }
}

/// Resolves the config directory: `$ORPHEUS_HOME` wins over the platform default.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }

    ProjectDirs::from("com", "orpheus", "orpheus")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| OrpheusError::Config("could not determine a config directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MediaType;
    use crate::registry::UrlDecoding;

    #[test]
    fn test_default_config() {
        let config = OrpheusConfig::default();
        assert_eq!(config.general.download_path, "./downloads/");
        assert_eq!(config.general.search_limit, 10);
        assert_eq!(config.module_defaults.lyrics, "default");
        assert!(config.picker.enabled);
        assert_eq!(config.picker.command, "fzf");
        assert!(config.modules.is_empty());
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = OrpheusConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config, OrpheusConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{"general": {"search_limit": 3}, "modules": [{"name": "deezer", "netloc_pattern": "deezer\\.com"}]}"#,
        )
        .unwrap();

        let config = OrpheusConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.general.search_limit, 3);
        assert_eq!(config.general.download_path, "./downloads/");
        assert_eq!(config.modules.len(), 1);
        assert_eq!(config.modules[0].url_decoding, UrlDecoding::Auto);
        assert!(config.modules[0].url_constants.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("nested");

        let mut config = OrpheusConfig::default();
        config.general.search_limit = 25;
        let mut manifest = ModuleManifest::new("qobuz", r"qobuz\.com");
        manifest
            .url_constants
            .insert("disc".to_string(), MediaType::Album);
        config.modules.push(manifest);
        config.save(&nested).unwrap();

        let loaded = OrpheusConfig::load(&nested).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();
        assert!(matches!(
            OrpheusConfig::load(temp_dir.path()),
            Err(OrpheusError::Serialization(_))
        ));
    }
}
