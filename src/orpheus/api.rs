//! # API Facade
//!
//! [`Orpheus`] is the single entry point for resolving user input into a
//! [`DownloadBatch`]. It owns the configuration and the module registry, both
//! passed in explicitly, and dispatches to the components:
//!
//! - **search / luckysearch**: module search → [`format_candidates`] →
//!   [`Selector`] → one identification
//! - **download**: explicit ids of one media type for one module
//! - **links**: each URL through the [`UrlRouter`]
//!
//! The facade does no terminal I/O of its own and never exits the process. A
//! user quitting the picker surfaces as [`Resolution::Aborted`], which callers
//! must honour by not submitting anything downstream.

use crate::batch::DownloadBatch;
use crate::config::OrpheusConfig;
use crate::error::{OrpheusError, Result};
use crate::format::format_candidates;
use crate::model::{MediaIdentification, MediaType};
use crate::overrides::{resolve_separate_download, CapabilityOverrides, RequestedOverrides};
use crate::pipeline::DownloadJob;
use crate::registry::ModuleRegistry;
use crate::router::UrlRouter;
use crate::selection::{SelectionOutcome, Selector};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Batch(DownloadBatch),
    Aborted,
}

pub enum SearchMode<'s> {
    /// Take the first result without asking.
    Lucky,
    Interactive(&'s mut Selector),
}

pub struct Orpheus {
    config: OrpheusConfig,
    registry: ModuleRegistry,
}

impl Orpheus {
    pub fn new(config: OrpheusConfig, registry: ModuleRegistry) -> Self {
        Self { config, registry }
    }

    /// Builds the registry from the config's module manifests.
    pub fn from_config(config: OrpheusConfig) -> Result<Self> {
        let registry = ModuleRegistry::from_manifests(&config.modules)?;
        Ok(Self::new(config, registry))
    }

    pub fn config(&self) -> &OrpheusConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Validates a module name, then a media type name, in that order.
    pub fn resolve_target(&self, module: &str, media_type: &str) -> Result<(String, MediaType)> {
        let module = module.to_lowercase();
        if !self.registry.contains(&module) {
            return Err(self.registry.unknown_module(&module));
        }
        let media_type = media_type.parse::<MediaType>()?;
        Ok((module, media_type))
    }

    pub fn search(
        &self,
        module: &str,
        media_type: MediaType,
        query: &str,
        mode: SearchMode<'_>,
    ) -> Result<Resolution> {
        let limit = match mode {
            SearchMode::Lucky => 1,
            SearchMode::Interactive(_) => self.config.general.search_limit,
        };

        let backend = self.registry.load_module(module)?;
        let items = backend.search(media_type, query, limit)?;
        debug!(module, %media_type, query, results = items.len(), "search finished");
        if items.is_empty() {
            return Err(OrpheusError::NoSearchResults {
                media_type,
                query: query.to_string(),
            });
        }

        let index = match mode {
            SearchMode::Lucky => 0,
            SearchMode::Interactive(selector) => {
                let table = format_candidates(&items, media_type);
                match selector.select(&table)? {
                    SelectionOutcome::Selected(index) => index,
                    SelectionOutcome::Aborted => return Ok(Resolution::Aborted),
                }
            }
        };

        let media = MediaIdentification::from_search_result(media_type, &items[index]);
        Ok(Resolution::Batch(DownloadBatch::from_selection(module, media)))
    }

    pub fn download_ids<S: AsRef<str>>(
        &self,
        module: &str,
        media_type: MediaType,
        ids: &[S],
    ) -> DownloadBatch {
        DownloadBatch::from_media_ids(module, media_type, ids.iter().map(|id| id.as_ref()))
    }

    /// Routes links in order. Anything not starting with `http` is rejected.
    pub fn resolve_links<S: AsRef<str>>(&self, links: &[S]) -> Result<DownloadBatch> {
        for link in links {
            let link = link.as_ref();
            if !link.starts_with("http") {
                return Err(OrpheusError::InvalidArgument(link.to_string()));
            }
        }
        let router = UrlRouter::new(&self.registry);
        DownloadBatch::from_links(&router, links)
    }

    /// Where downloads go: the requested path, else the configured one,
    /// without a trailing slash.
    pub fn output_path(&self, requested: Option<&str>) -> PathBuf {
        let path = requested.unwrap_or(&self.config.general.download_path);
        let trimmed = match path.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => path,
        };
        PathBuf::from(trimmed)
    }

    pub fn job(
        &self,
        batch: DownloadBatch,
        requested: &RequestedOverrides,
        output_path: PathBuf,
    ) -> DownloadJob {
        DownloadJob {
            batch,
            overrides: CapabilityOverrides::resolve(requested, &self.config.module_defaults),
            separate_download: resolve_separate_download(&requested.separate_download),
            output_path,
        }
    }
}

/// Link arguments as given, or the lines of a file when the only argument names one.
pub fn expand_link_arguments(arguments: &[String]) -> Result<Vec<String>> {
    if let [single] = arguments {
        let path = Path::new(single);
        if path.is_file() {
            let content = std::fs::read_to_string(path)?;
            return Ok(content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect());
        }
    }
    Ok(arguments.to_vec())
}
