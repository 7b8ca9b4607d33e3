use crate::error::{OrpheusError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Module-specific keyword arguments carried from a search result to the
/// download pipeline without interpretation.
pub type ExtraKwargs = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Track,
    Album,
    Playlist,
    Artist,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [
        MediaType::Track,
        MediaType::Album,
        MediaType::Playlist,
        MediaType::Artist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Track => "track",
            MediaType::Album => "album",
            MediaType::Playlist => "playlist",
            MediaType::Artist => "artist",
        }
    }

    /// The slash-separated list shown in usage and error messages.
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = OrpheusError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lower)
            .ok_or(OrpheusError::InvalidMediaType(lower))
    }
}

/// Artist credit of a search result: modules report either a single string
/// or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Artists {
    One(String),
    Many(Vec<String>),
}

impl Artists {
    pub fn joined(&self) -> String {
        match self {
            Artists::One(name) => name.clone(),
            Artists::Many(names) => names.join(", "),
        }
    }
}

impl Default for Artists {
    fn default() -> Self {
        Artists::Many(Vec::new())
    }
}

impl From<&str> for Artists {
    fn from(name: &str) -> Self {
        Artists::One(name.to_string())
    }
}

impl From<Vec<String>> for Artists {
    fn from(names: Vec<String>) -> Self {
        Artists::Many(names)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub result_id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Artists,
    #[serde(default)]
    pub year: Option<u32>,
    /// Length in seconds.
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub explicit: bool,
    /// Free-form details; the first entry is the quality label.
    #[serde(default)]
    pub additional: Vec<String>,
    #[serde(default)]
    pub extra_kwargs: ExtraKwargs,
}

impl SearchResult {
    pub fn new(result_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            result_id: result_id.into(),
            name: name.into(),
            artists: Artists::default(),
            year: None,
            duration: None,
            explicit: false,
            additional: Vec::new(),
            extra_kwargs: ExtraKwargs::new(),
        }
    }

    pub fn with_artists(mut self, artists: impl Into<Artists>) -> Self {
        self.artists = artists.into();
        self
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_explicit(mut self, explicit: bool) -> Self {
        self.explicit = explicit;
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.additional.insert(0, quality.into());
        self
    }

    /// The quality label, taken from the first `additional` entry.
    pub fn quality(&self) -> Option<&str> {
        self.additional.first().map(String::as_str)
    }
}

/// A fully resolved request for one piece of media within a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaIdentification {
    pub media_type: MediaType,
    pub media_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_kwargs: Option<ExtraKwargs>,
}

impl MediaIdentification {
    pub fn new(media_type: MediaType, media_id: impl Into<String>) -> Self {
        Self {
            media_type,
            media_id: media_id.into(),
            extra_kwargs: None,
        }
    }

    /// Identification for a picked search result, forwarding its kwargs if any.
    pub fn from_search_result(media_type: MediaType, result: &SearchResult) -> Self {
        let extra_kwargs = if result.extra_kwargs.is_empty() {
            None
        } else {
            Some(result.extra_kwargs.clone())
        };
        Self {
            media_type,
            media_id: result.result_id.clone(),
            extra_kwargs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_parses_case_insensitively() {
        assert_eq!("Album".parse::<MediaType>().unwrap(), MediaType::Album);
        assert_eq!("TRACK".parse::<MediaType>().unwrap(), MediaType::Track);
    }

    #[test]
    fn media_type_rejects_unknown_names() {
        let err = "song".parse::<MediaType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "song is not a valid media type! Choose track/album/playlist/artist"
        );
    }

    #[test]
    fn artists_join_lists_with_commas() {
        let many = Artists::Many(vec!["A".into(), "B".into()]);
        assert_eq!(many.joined(), "A, B");
        assert_eq!(Artists::from("Solo").joined(), "Solo");
    }

    #[test]
    fn search_result_deserializes_with_missing_optionals() {
        let json = r#"{"result_id": "42", "name": "Song", "artists": ["X", "Y"]}"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.artists.joined(), "X, Y");
        assert_eq!(result.year, None);
        assert!(!result.explicit);
        assert!(result.quality().is_none());
    }

    #[test]
    fn identification_from_result_keeps_kwargs() {
        let mut result = SearchResult::new("7", "Name");
        result
            .extra_kwargs
            .insert("region".into(), serde_json::Value::from("us"));
        let ident = MediaIdentification::from_search_result(MediaType::Track, &result);
        assert_eq!(ident.media_id, "7");
        assert_eq!(
            ident.extra_kwargs.unwrap().get("region"),
            Some(&serde_json::Value::from("us"))
        );

        let plain =
            MediaIdentification::from_search_result(MediaType::Track, &SearchResult::new("8", "N"));
        assert_eq!(plain.extra_kwargs, None);
    }
}
