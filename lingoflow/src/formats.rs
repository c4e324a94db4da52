//! File format handlers.
//!
//! Each handler converts between file text and a [`Document`]. The
//! [`FormatType`] enum picks a handler from a name or file extension, and
//! [`read_document`] / [`write_document`] do the dispatch for callers.

pub mod android_strings;
pub mod json;
pub mod properties;
pub mod strings;
pub mod yaml;

use std::{
    fmt::{Display, Formatter},
    fs,
    path::Path,
    str::FromStr,
};

use crate::{
    document::{Document, Mapping},
    error::Error,
    flatten::flatten,
};

pub use android_strings::AndroidStringsCodec;
pub use json::JsonCodec;
pub use properties::PropertiesCodec;
pub use strings::StringsCodec;
pub use yaml::YamlCodec;

/// Parsing and rendering of one file format.
pub trait DocumentCodec {
    fn parse(&self, input: &str) -> Result<Document, Error>;

    fn render(&self, document: &Document) -> Result<String, Error>;

    /// Parse from file path.
    fn read_from(&self, path: &Path) -> Result<Document, Error> {
        let content = fs::read_to_string(path)?;
        self.parse(&content)
    }

    /// Write to file path, creating parent directories.
    fn write_to(&self, path: &Path, document: &Document) -> Result<(), Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render(document)?)?;
        Ok(())
    }
}

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    Json,
    Yaml,
    /// Java `.properties`.
    Properties,
    /// Android `strings.xml`.
    AndroidStrings,
    /// Apple `.strings`.
    Strings,
}

impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Json => write!(f, "json"),
            FormatType::Yaml => write!(f, "yaml"),
            FormatType::Properties => write!(f, "properties"),
            FormatType::AndroidStrings => write!(f, "android"),
            FormatType::Strings => write!(f, "strings"),
        }
    }
}

/// Accepts format names and extensions, case-insensitively.
///
/// ```rust
/// use lingoflow::formats::FormatType;
/// assert_eq!("yml".parse::<FormatType>().unwrap(), FormatType::Yaml);
/// assert_eq!("xml".parse::<FormatType>().unwrap(), FormatType::AndroidStrings);
/// assert!("xliff".parse::<FormatType>().is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "json" => Ok(FormatType::Json),
            "yaml" | "yml" => Ok(FormatType::Yaml),
            "properties" => Ok(FormatType::Properties),
            "android" | "androidstrings" | "xml" => Ok(FormatType::AndroidStrings),
            "strings" => Ok(FormatType::Strings),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Json => "json",
            FormatType::Yaml => "yaml",
            FormatType::Properties => "properties",
            FormatType::AndroidStrings => "xml",
            FormatType::Strings => "strings",
        }
    }

    pub fn codec(&self) -> Box<dyn DocumentCodec> {
        match self {
            FormatType::Json => Box::new(JsonCodec),
            FormatType::Yaml => Box::new(YamlCodec),
            FormatType::Properties => Box::new(PropertiesCodec),
            FormatType::AndroidStrings => Box::new(AndroidStringsCodec),
            FormatType::Strings => Box::new(StringsCodec),
        }
    }
}

/// Infers the format from a path's extension.
pub fn infer_format_from_path<P: AsRef<Path>>(path: P) -> Result<FormatType, Error> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
    extension
        .parse()
        .map_err(|_| Error::UnsupportedFormat(format!("`.{extension}` ({})", path.display())))
}

/// Reads a document, choosing the handler from the file extension.
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Document, Error> {
    let path = path.as_ref();
    infer_format_from_path(path)?.codec().read_from(path)
}

/// Writes a document, choosing the handler from the file extension.
pub fn write_document<P: AsRef<Path>>(path: P, document: &Document) -> Result<(), Error> {
    let path = path.as_ref();
    infer_format_from_path(path)?
        .codec()
        .write_to(path, document)
}

/// Key/value pairs of a document for flat formats. Nested keys are joined with `.`.
pub(crate) fn flat_entries(document: &Document) -> Vec<(String, String)> {
    flatten(document)
        .into_iter()
        .map(|(path, value)| (path.to_string(), value))
        .collect()
}

pub(crate) fn flat_document(entries: impl IntoIterator<Item = (String, String)>) -> Document {
    Document::Map(
        entries
            .into_iter()
            .map(|(key, value)| (key, Document::String(value)))
            .collect::<Mapping>(),
    )
}
