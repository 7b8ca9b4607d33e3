//! # Module Registry
//!
//! The registry is the read-only view of the modules orpheus can dispatch to.
//! Module discovery and per-module settings live outside this crate; what the
//! dispatcher needs from each module is captured in a [`ModuleEntry`]:
//!
//! - a **network-location pattern** (regex) tested against URL hosts,
//! - its **routing rules** ([`ModuleRouting`]) mapping path segments to media types,
//! - an optional **backend** implementing [`MediaModule`] (search and manual URL parsing).
//!
//! Entry order is significant: it is the iteration order used by the URL router,
//! where the last matching pattern wins.
//!
//! ## Implementations of [`MediaModule`]
//!
//! - [`command::CommandModule`]: spawns an external program per call (production)
//! - [`memory::StaticModule`]: canned results held in memory (testing, embedding)
//!
//! Registries are usually built from the `modules` section of the config via
//! [`ModuleRegistry::from_manifests`].

use crate::error::{OrpheusError, Result};
use crate::model::{MediaIdentification, MediaType, SearchResult};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod command;
pub mod manifest;
pub mod memory;

/// Segment literal → media type, in declaration order.
pub type UrlConstants = IndexMap<String, MediaType>;

/// The four-entry mapping used by modules that declare no URL constants.
pub fn default_url_constants() -> UrlConstants {
    MediaType::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), *t))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlDecoding {
    #[default]
    Auto,
    /// The module parses its own URLs.
    Manual,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleRouting {
    pub url_decoding: UrlDecoding,
    pub url_constants: UrlConstants,
}

impl ModuleRouting {
    pub fn manual() -> Self {
        Self {
            url_decoding: UrlDecoding::Manual,
            url_constants: UrlConstants::new(),
        }
    }

    pub fn with_constants(url_constants: UrlConstants) -> Self {
        Self {
            url_decoding: UrlDecoding::Auto,
            url_constants,
        }
    }

    /// The module's own constants, or the default mapping when it has none.
    pub fn effective_constants(&self) -> UrlConstants {
        if self.url_constants.is_empty() {
            default_url_constants()
        } else {
            self.url_constants.clone()
        }
    }
}

/// The entry points a loaded module exposes to the dispatcher.
pub trait MediaModule {
    /// Search the module's catalogue, returning at most `limit` results.
    fn search(&self, media_type: MediaType, query: &str, limit: usize)
        -> Result<Vec<SearchResult>>;

    /// Decode a URL the module declared as manually parsed.
    fn custom_url_parse(&self, url: &str) -> Result<MediaIdentification>;
}

pub struct ModuleEntry {
    pub name: String,
    pub netloc_pattern: Regex,
    pub routing: ModuleRouting,
    /// Hidden modules still route, but are left out of suggestions.
    pub hidden: bool,
    pub backend: Option<Box<dyn MediaModule>>,
}

impl ModuleEntry {
    pub fn new(name: impl Into<String>, netloc_pattern: &str) -> Result<Self> {
        Ok(Self {
            name: name.into().to_lowercase(),
            netloc_pattern: Regex::new(netloc_pattern)?,
            routing: ModuleRouting::default(),
            hidden: false,
            backend: None,
        })
    }

    pub fn with_routing(mut self, routing: ModuleRouting) -> Self {
        self.routing = routing;
        self
    }

    pub fn with_backend(mut self, backend: impl MediaModule + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

impl std::fmt::Debug for ModuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleEntry")
            .field("name", &self.name)
            .field("netloc_pattern", &self.netloc_pattern.as_str())
            .field("routing", &self.routing)
            .field("hidden", &self.hidden)
            .field("backend", &self.backend.is_some())
            .finish()
    }
}

/// Ordered, read-only collection of module entries.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    entries: Vec<ModuleEntry>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. A later entry with the same name replaces the earlier one
    /// but keeps the earlier position.
    pub fn register(&mut self, entry: ModuleEntry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn with(mut self, entry: ModuleEntry) -> Self {
        self.register(entry);
        self
    }

    pub fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ModuleEntry> {
        let name = name.to_lowercase();
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of modules offered to the user.
    pub fn visible_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| !e.hidden)
            .map(|e| e.name.clone())
            .collect()
    }

    pub fn unknown_module(&self, name: &str) -> OrpheusError {
        OrpheusError::UnknownModule {
            name: name.to_string(),
            available: self.visible_names(),
        }
    }

    /// Returns the module's backend, failing for unregistered or backend-less modules.
    pub fn load_module(&self, name: &str) -> Result<&dyn MediaModule> {
        let entry = self.get(name).ok_or_else(|| self.unknown_module(name))?;
        entry
            .backend
            .as_deref()
            .ok_or_else(|| OrpheusError::module(&entry.name, "no backend command configured"))
    }
}
