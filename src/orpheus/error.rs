use crate::model::MediaType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrpheusError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Unroutable URL: {0}")]
    UnroutableUrl(String),

    #[error("Invalid URL: \"{0}\"")]
    MalformedUrl(String),

    #[error(
        "Unknown module name \"{name}\". Must select from: {list}",
        list = available.join(", ")
    )]
    UnknownModule { name: String, available: Vec<String> },

    #[error("No search results for {media_type}: {query}")]
    NoSearchResults { media_type: MediaType, query: String },

    #[error("{0} is not a valid media type! Choose {choices}", choices = MediaType::choices())]
    InvalidMediaType(String),

    #[error("Invalid argument: \"{0}\"")]
    InvalidArgument(String),

    #[error("Module {module}: {message}")]
    Module { module: String, message: String },

    #[error("Download pipeline error: {0}")]
    Pipeline(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid module pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl OrpheusError {
    pub fn module(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Module {
            module: module.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrpheusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_media_type_lists_choices() {
        let err = OrpheusError::InvalidMediaType("song".into());
        assert_eq!(
            err.to_string(),
            "song is not a valid media type! Choose track/album/playlist/artist"
        );
    }

    #[test]
    fn unknown_module_joins_available_names() {
        let err = OrpheusError::UnknownModule {
            name: "spotify".into(),
            available: vec!["deezer".into(), "qobuz".into()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown module name \"spotify\". Must select from: deezer, qobuz"
        );
    }

    #[test]
    fn io_and_json_errors_convert() {
        fn read() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        fn parse() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("{")?)
        }

        assert!(matches!(read(), Err(OrpheusError::Io(_))));
        assert!(matches!(parse(), Err(OrpheusError::Serialization(_))));
    }
}
