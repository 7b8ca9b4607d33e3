//! # URL Router
//!
//! Maps one URL to a `(module, MediaIdentification)` pair.
//!
//! 1. **Module**: the URL's network location, as written (userinfo and port
//!    included), is tested against every registered module's pattern in
//!    registry order. The *last* module whose pattern matches wins;
//!    overlapping patterns are not ranked any other way.
//! 2. **Manual modules** receive the raw URL and return their own identification.
//! 3. **Automatic modules**: the path must split into at least three `/`
//!    segments. Among the module's URL constants (or the default
//!    `track`/`album`/`playlist`/`artist` mapping), every key that appears as a
//!    path segment matches and the last one in mapping order decides the media
//!    type. The final path segment is the media id.
//!
//! Locations and paths are taken from the link text itself, so ids keep
//! their original spelling: no percent-encoding and no `..` resolution.

use crate::error::{OrpheusError, Result};
use crate::model::{MediaIdentification, MediaType};
use crate::registry::{ModuleEntry, ModuleRegistry, UrlConstants, UrlDecoding};
use tracing::debug;
use url::Url;

const MIN_PATH_SEGMENTS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct RoutedMedia {
    pub module: String,
    pub media: MediaIdentification,
}

pub struct UrlRouter<'a> {
    registry: &'a ModuleRegistry,
}

impl<'a> UrlRouter<'a> {
    pub fn new(registry: &'a ModuleRegistry) -> Self {
        Self { registry }
    }

    /// The last registered module whose pattern matches `netloc`.
    pub fn module_for_netloc(&self, netloc: &str) -> Result<&'a ModuleEntry> {
        self.registry
            .entries()
            .iter()
            .filter(|entry| entry.netloc_pattern.is_match(netloc))
            .last()
            .ok_or_else(|| {
                OrpheusError::UnroutableUrl(format!(
                    "location \"{}\" is not found in modules",
                    netloc
                ))
            })
    }

    pub fn route(&self, link: &str) -> Result<RoutedMedia> {
        let malformed = || OrpheusError::MalformedUrl(link.to_string());
        Url::parse(link).map_err(|_| malformed())?;
        let raw = RawParts::split(link).ok_or_else(malformed)?;
        let entry = self.module_for_netloc(raw.netloc)?;
        debug!(link, module = %entry.name, "matched module");

        if entry.routing.url_decoding == UrlDecoding::Manual {
            let media = self.registry.load_module(&entry.name)?.custom_url_parse(link)?;
            return Ok(RoutedMedia {
                module: entry.name.clone(),
                media,
            });
        }

        let segments: Vec<&str> = raw.path.split('/').collect();
        if segments.len() < MIN_PATH_SEGMENTS {
            return Err(OrpheusError::MalformedUrl(link.to_string()));
        }

        let constants = entry.routing.effective_constants();
        let media_type = media_type_for_segments(&constants, &segments).ok_or_else(|| {
            OrpheusError::UnroutableUrl(format!("no media type found in path of \"{}\"", link))
        })?;

        let media_id = segments.last().copied().unwrap_or_default();
        if media_id.is_empty() {
            return Err(OrpheusError::MalformedUrl(link.to_string()));
        }

        Ok(RoutedMedia {
            module: entry.name.clone(),
            media: MediaIdentification::new(media_type, media_id),
        })
    }
}

/// `scheme://netloc/path;params?query#fragment`, sliced from the link text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawParts<'a> {
    netloc: &'a str,
    /// Path without the params of its last segment.
    path: &'a str,
}

impl<'a> RawParts<'a> {
    fn split(link: &'a str) -> Option<Self> {
        let (_, rest) = link.split_once("://")?;
        let rest = rest
            .split(|c: char| c == '?' || c == '#')
            .next()
            .unwrap_or_default();
        let (netloc, path) = match rest.find('/') {
            Some(start) => rest.split_at(start),
            None => (rest, ""),
        };
        let last_segment = path.rfind('/').unwrap_or(0);
        let path = match path[last_segment..].find(';') {
            Some(params) => &path[..last_segment + params],
            None => path,
        };
        Some(Self { netloc, path })
    }
}

/// The type of the last constant, in mapping order, whose key is one of `segments`.
pub fn media_type_for_segments(constants: &UrlConstants, segments: &[&str]) -> Option<MediaType> {
    constants
        .iter()
        .filter(|(key, _)| segments.contains(&key.as_str()))
        .map(|(_, media_type)| *media_type)
        .last()
}
