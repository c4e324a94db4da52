//! The in-memory document model shared by every format handler.
//!
//! A [`Document`] is a tree of mappings, lists and scalar leaves. Only
//! [`Document::String`] leaves are ever translated; everything else passes
//! through untouched. Mapping keys keep their insertion order so that
//! rendered files come out in the same order they were read.

use std::fmt::{Display, Formatter};

use serde_json::Number;

/// A parsed localization document.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Lists are carried as-is and never translated.
    List(Vec<Document>),
    Map(Mapping),
}

impl Document {
    /// Creates an empty mapping document.
    pub fn empty_map() -> Self {
        Document::Map(Mapping::new())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Document::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up the node at `path`, walking mappings only.
    pub fn get_path(&self, path: &LeafPath) -> Option<&Document> {
        let mut current = self;
        for segment in path.segments() {
            current = current.as_map()?.get(segment)?;
        }
        Some(current)
    }

    /// Sets the node at `path`, creating intermediate mappings as needed.
    ///
    /// Any non-mapping node found along the way is replaced by a mapping.
    /// An existing key keeps its position.
    pub fn set_path(&mut self, path: &LeafPath, value: Document) {
        let Some((last, parents)) = path.segments().split_last() else {
            *self = value;
            return;
        };

        let mut current = self;
        for segment in parents {
            let map = current.ensure_map();
            if !matches!(map.get(segment), Some(Document::Map(_))) {
                map.insert(segment.clone(), Document::empty_map());
            }
            // The entry was just ensured to exist.
            current = match map.get_mut(segment) {
                Some(child) => child,
                None => return,
            };
        }
        current.ensure_map().insert(last.clone(), value);
    }

    /// Turns `self` into a mapping if it is not one already.
    fn ensure_map(&mut self) -> &mut Mapping {
        if !matches!(self, Document::Map(_)) {
            *self = Document::empty_map();
        }
        match self {
            Document::Map(map) => map,
            _ => unreachable!("document was just replaced by a mapping"),
        }
    }
}

/// An insertion-ordered mapping of string keys to documents.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<(String, Document)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Document> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts `value` under `key`. An existing key is replaced in place and
    /// its previous value returned; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: Document) -> Option<Document> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Document)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl<K: Into<String>> FromIterator<(K, Document)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, Document)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Document);
    type IntoIter = std::vec::IntoIter<(String, Document)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// The sequence of mapping keys that locates one leaf in a [`Document`].
///
/// Paths compare structurally, so `["a.b"]` and `["a", "b"]` are different
/// leaves even though both render as `a.b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct LeafPath(Vec<String>);

impl LeafPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Splits a dotted key such as `menu.file.open` into segments.
    pub fn from_dotted(key: &str) -> Self {
        Self(key.split('.').map(str::to_string).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self(segments)
    }
}

impl Display for LeafPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// How a caller-supplied key was matched against a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResolution {
    /// A top-level key with exactly this name holds a string.
    Literal,
    /// The key was split on dots and walked through nested mappings.
    Nested,
    /// Nothing matched; the key itself is the source text (gettext-style catalogs).
    KeyAsText,
}

/// Finds the source text for `key` in `source`.
///
/// Lookup order: a literal top-level key, then dot-path traversal, then the
/// key string itself.
pub fn resolve_source_text(source: &Document, key: &str) -> (String, KeyResolution) {
    if let Some(Document::String(text)) = source.as_map().and_then(|map| map.get(key)) {
        return (text.clone(), KeyResolution::Literal);
    }
    if let Some(Document::String(text)) = source.get_path(&LeafPath::from_dotted(key)) {
        return (text.clone(), KeyResolution::Nested);
    }
    (key.to_string(), KeyResolution::KeyAsText)
}

/// Writes `value` for `key` into `target` according to how the key resolved
/// in the source document.
pub fn place_translation(
    target: &mut Document,
    key: &str,
    resolution: KeyResolution,
    value: String,
) {
    match resolution {
        KeyResolution::Nested => {
            target.set_path(&LeafPath::from_dotted(key), Document::String(value))
        }
        KeyResolution::Literal | KeyResolution::KeyAsText => {
            target.ensure_map().insert(key, Document::String(value));
        }
    }
}

/// Returns the dotted keys of string leaves present in `source` but absent
/// from `target`, in source order.
pub fn missing_keys(source: &Document, target: &Document) -> Vec<String> {
    crate::flatten::flatten(source)
        .into_iter()
        .filter(|(path, _)| !path.is_root())
        .map(|(path, _)| path.to_string())
        .filter(|key| !has_string_at(target, key))
        .collect()
}

fn has_string_at(document: &Document, key: &str) -> bool {
    if let Some(Document::String(_)) = document.as_map().and_then(|map| map.get(key)) {
        return true;
    }
    matches!(
        document.get_path(&LeafPath::from_dotted(key)),
        Some(Document::String(_))
    )
}

impl From<serde_json::Value> for Document {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Bool(b),
            Value::Number(n) => Document::Number(n),
            Value::String(s) => Document::String(s),
            Value::Array(items) => Document::List(items.into_iter().map(Document::from).collect()),
            Value::Object(map) => Document::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Document::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Document> for serde_json::Value {
    fn from(document: &Document) -> Self {
        use serde_json::Value;
        match document {
            Document::Null => Value::Null,
            Document::Bool(b) => Value::Bool(*b),
            Document::Number(n) => Value::Number(n.clone()),
            Document::String(s) => Value::String(s.clone()),
            Document::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            Document::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_yaml::Value> for Document {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Bool(b),
            Value::Number(n) => yaml_number(&n),
            Value::String(s) => Document::String(s),
            Value::Sequence(items) => {
                Document::List(items.into_iter().map(Document::from).collect())
            }
            Value::Mapping(map) => Document::Map(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), Document::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Document::from(tagged.value),
        }
    }
}

impl From<&Document> for serde_yaml::Value {
    fn from(document: &Document) -> Self {
        use serde_yaml::Value;
        match document {
            Document::Null => Value::Null,
            Document::Bool(b) => Value::Bool(*b),
            Document::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(i.into())
                } else if let Some(u) = n.as_u64() {
                    Value::Number(u.into())
                } else {
                    Value::Number(n.as_f64().unwrap_or_default().into())
                }
            }
            Document::String(s) => Value::String(s.clone()),
            Document::List(items) => Value::Sequence(items.iter().map(Value::from).collect()),
            Document::Map(map) => Value::Mapping(
                map.iter()
                    .map(|(k, v)| (Value::String(k.clone()), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Document {
    if let Some(i) = n.as_i64() {
        Document::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Document::Number(u.into())
    } else {
        // Non-finite floats have no JSON number form.
        n.as_f64()
            .and_then(Number::from_f64)
            .map_or(Document::Null, Document::Number)
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value;
    match key {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
