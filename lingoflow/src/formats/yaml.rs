//! YAML localization files (Rails-style nested mappings).

use super::DocumentCodec;
use crate::{document::Document, error::Error};

pub struct YamlCodec;

impl DocumentCodec for YamlCodec {
    fn parse(&self, input: &str) -> Result<Document, Error> {
        if input.trim().is_empty() {
            return Ok(Document::empty_map());
        }
        let value: serde_yaml::Value = serde_yaml::from_str(input)?;
        Ok(Document::from(value))
    }

    fn render(&self, document: &Document) -> Result<String, Error> {
        Ok(serde_yaml::to_string(&serde_yaml::Value::from(document))?)
    }
}
