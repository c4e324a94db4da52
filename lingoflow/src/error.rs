//! All error types for the lingoflow crate.
//!
//! Configuration problems are reported before any network or file I/O.
//! Backend failures keep the HTTP status and body verbatim, and batch/key
//! failures carry the batch index or key path that produced them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("backend returned HTTP {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    #[error("batch {index} failed: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to translate key `{key}`: {source}")]
    Key {
        key: String,
        #[source]
        source: Box<Error>,
    },

    #[error("worker pool error: {0}")]
    Scheduler(String),

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// Creates a data integrity error.
    pub fn data_integrity(message: impl Into<String>) -> Self {
        Error::DataIntegrity(message.into())
    }

    /// Wraps an error with the index of the batch that produced it.
    pub fn in_batch(self, index: usize) -> Self {
        Error::Batch {
            index,
            source: Box::new(self),
        }
    }

    /// Wraps an error with the key whose translation failed.
    pub fn for_key(self, key: impl Into<String>) -> Self {
        Error::Key {
            key: key.into(),
            source: Box::new(self),
        }
    }

    /// Returns `true` if this error, or the error it wraps, is a configuration error.
    pub fn is_configuration(&self) -> bool {
        match self {
            Error::Configuration(_) => true,
            Error::Batch { source, .. } | Error::Key { source, .. } => source.is_configuration(),
            _ => false,
        }
    }
}
