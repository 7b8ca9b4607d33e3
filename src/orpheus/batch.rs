use crate::error::Result;
use crate::model::{MediaIdentification, MediaType};
use crate::router::{RoutedMedia, UrlRouter};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Resolved identifications grouped per module.
///
/// Modules keep the order they were first seen in, and each module's
/// identifications keep the order they were added in: that is the download order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadBatch {
    modules: IndexMap<String, Vec<MediaIdentification>>,
}

impl DownloadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A batch holding the single identification picked from a search.
    pub fn from_selection(module: &str, media: MediaIdentification) -> Self {
        let mut batch = Self::new();
        batch.push(module, media);
        batch
    }

    /// A batch of explicit ids, all of one type, for one module.
    pub fn from_media_ids<I, S>(module: &str, media_type: MediaType, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut batch = Self::new();
        for id in ids {
            batch.push(module, MediaIdentification::new(media_type, id));
        }
        batch
    }

    /// Routes each link in turn. The first link that fails to route aborts the batch.
    pub fn from_links<I, S>(router: &UrlRouter<'_>, links: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut batch = Self::new();
        for link in links {
            let routed = router.route(link.as_ref())?;
            debug!(
                module = %routed.module,
                media_type = %routed.media.media_type,
                id = %routed.media.media_id,
                "routed link"
            );
            batch.push_routed(routed);
        }
        Ok(batch)
    }

    pub fn push(&mut self, module: &str, media: MediaIdentification) {
        self.modules
            .entry(module.to_string())
            .or_default()
            .push(media);
    }

    pub fn push_routed(&mut self, routed: RoutedMedia) {
        self.modules
            .entry(routed.module)
            .or_default()
            .push(routed.media);
    }

    pub fn is_empty(&self) -> bool {
        self.modules.values().all(Vec::is_empty)
    }

    /// Total number of identifications across modules.
    pub fn len(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    pub fn get(&self, module: &str) -> Option<&[MediaIdentification]> {
        self.modules.get(module).map(Vec::as_slice)
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MediaIdentification])> {
        self.modules
            .iter()
            .map(|(module, media)| (module.as_str(), media.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrpheusError;
    use crate::registry::{ModuleEntry, ModuleRegistry};

    fn registry() -> ModuleRegistry {
        ModuleRegistry::new()
            .with(ModuleEntry::new("deezer", r"deezer\.com").unwrap())
            .with(ModuleEntry::new("tidal", r"tidal\.com").unwrap())
    }

    #[test]
    fn links_for_one_module_keep_their_order() {
        let registry = registry();
        let router = UrlRouter::new(&registry);
        let batch = DownloadBatch::from_links(
            &router,
            [
                "https://deezer.com/track/3",
                "https://deezer.com/album/1",
                "https://deezer.com/track/2",
            ],
        )
        .unwrap();

        let ids: Vec<_> = batch
            .get("deezer")
            .unwrap()
            .iter()
            .map(|m| m.media_id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn links_spanning_modules_are_grouped() {
        let registry = registry();
        let router = UrlRouter::new(&registry);
        let batch = DownloadBatch::from_links(
            &router,
            [
                "https://tidal.com/browse/album/10",
                "https://deezer.com/track/3",
                "https://tidal.com/browse/track/11",
            ],
        )
        .unwrap();

        assert_eq!(batch.modules().collect::<Vec<_>>(), vec!["tidal", "deezer"]);
        assert_eq!(batch.get("tidal").unwrap().len(), 2);
        assert_eq!(
            batch.get("tidal").unwrap()[1],
            MediaIdentification::new(MediaType::Track, "11")
        );
    }

    #[test]
    fn no_links_is_an_empty_batch() {
        let registry = registry();
        let router = UrlRouter::new(&registry);
        let batch = DownloadBatch::from_links(&router, Vec::<String>::new()).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
        assert_eq!(serde_json::to_string(&batch).unwrap(), "{}");
    }

    #[test]
    fn failing_link_aborts() {
        let registry = registry();
        let router = UrlRouter::new(&registry);
        let result = DownloadBatch::from_links(
            &router,
            ["https://deezer.com/track/3", "https://unknown.net/track/4"],
        );
        assert!(matches!(result, Err(OrpheusError::UnroutableUrl(_))));
    }

    #[test]
    fn media_ids_share_type_and_order() {
        let batch = DownloadBatch::from_media_ids("qobuz", MediaType::Album, ["b", "a"]);
        let media = batch.get("qobuz").unwrap();
        assert_eq!(media[0], MediaIdentification::new(MediaType::Album, "b"));
        assert_eq!(media[1], MediaIdentification::new(MediaType::Album, "a"));
    }

    #[test]
    fn serializes_as_module_map() {
        let batch = DownloadBatch::from_selection(
            "mod",
            MediaIdentification::new(MediaType::Track, "1"),
        );
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"mod": [{"media_type": "track", "media_id": "1"}]})
        );
    }
}
