//! JSON localization files (nested or flat key/value objects).

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::DocumentCodec;
use crate::{document::Document, error::Error};

pub struct JsonCodec;

impl DocumentCodec for JsonCodec {
    fn parse(&self, input: &str) -> Result<Document, Error> {
        let value: serde_json::Value = serde_json::from_str(input.trim_start_matches('\u{feff}'))?;
        Ok(Document::from(value))
    }

    fn render(&self, document: &Document) -> Result<String, Error> {
        let value = serde_json::Value::from(document);
        let mut out = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"  "));
        value.serialize(&mut serializer)?;
        out.push(b'\n');
        String::from_utf8(out).map_err(|e| Error::InvalidDocument(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_key_order() {
        let document = JsonCodec.parse(r#"{"z": "last", "a": {"y": "x"}}"#).unwrap();
        let keys: Vec<_> = document.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_render_keeps_non_ascii_and_order() {
        let document = JsonCodec.parse(r#"{"b": "Grüße", "a": 1}"#).unwrap();
        let rendered = JsonCodec.render(&document).unwrap();
        assert_eq!(rendered, "{\n  \"b\": \"Grüße\",\n  \"a\": 1\n}\n");
    }

    #[test]
    fn test_bom_is_ignored() {
        let document = JsonCodec.parse("\u{feff}{\"a\": \"b\"}").unwrap();
        assert_eq!(document.as_map().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(JsonCodec.parse("{ nope"), Err(Error::Json(_))));
    }
}
