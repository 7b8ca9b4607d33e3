use super::MediaModule;
use crate::error::{OrpheusError, Result};
use crate::model::{MediaIdentification, MediaType, SearchResult};
use std::cell::RefCell;

type UrlParser = Box<dyn Fn(&str) -> Result<MediaIdentification>>;

/// A module answering from memory.
///
/// Searches return the canned results (truncated to the requested limit) and
/// are recorded so callers can inspect what was asked.
#[derive(Default)]
pub struct StaticModule {
    results: Vec<SearchResult>,
    url_parser: Option<UrlParser>,
    searches: RefCell<Vec<(MediaType, String, usize)>>,
}

impl StaticModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, results: Vec<SearchResult>) -> Self {
        self.results = results;
        self
    }

    pub fn with_url_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str) -> Result<MediaIdentification> + 'static,
    {
        self.url_parser = Some(Box::new(parser));
        self
    }

    /// The `(media_type, query, limit)` of every search made so far.
    pub fn searches(&self) -> Vec<(MediaType, String, usize)> {
        self.searches.borrow().clone()
    }
}

impl MediaModule for StaticModule {
    fn search(
        &self,
        media_type: MediaType,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        self.searches
            .borrow_mut()
            .push((media_type, query.to_string(), limit));
        Ok(self.results.iter().take(limit).cloned().collect())
    }

    fn custom_url_parse(&self, url: &str) -> Result<MediaIdentification> {
        match &self.url_parser {
            Some(parser) => parser(url),
            None => Err(OrpheusError::InvalidArgument(url.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_respects_limit_and_records_calls() {
        let module = StaticModule::new().with_results(vec![
            SearchResult::new("1", "One"),
            SearchResult::new("2", "Two"),
        ]);

        let results = module.search(MediaType::Album, "q", 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].result_id, "1");
        assert_eq!(
            module.searches(),
            vec![(MediaType::Album, "q".to_string(), 1)]
        );
    }

    #[test]
    fn url_parser_is_used_when_present() {
        let module = StaticModule::new().with_url_parser(|url| {
            Ok(MediaIdentification::new(MediaType::Track, url.len().to_string()))
        });
        let ident = module.custom_url_parse("abc").unwrap();
        assert_eq!(ident.media_id, "3");

        assert!(StaticModule::new().custom_url_parse("abc").is_err());
    }
}
