//! Support for Apple `.strings` localization files.
//!
//! The file is a list of `"key" = "value";` pairs with optional `/* */` and
//! `//` comments. Comments are not carried into the document.

use std::{fs::File, io::Read, path::Path};

use indoc::indoc;
use lazy_static::lazy_static;
use regex::Regex;

use super::{DocumentCodec, flat_document, flat_entries};
use crate::{document::Document, error::Error};

lazy_static! {
    /// Matches a comment or a pair; comments are matched only to be skipped,
    /// so `//` inside a quoted value is never taken for one.
    static ref TOKEN: Regex = Regex::new(
        r#"(?s)/\*.*?\*/|//[^\n]*|"((?:[^"\\]|\\.)*)"\s*=\s*"((?:[^"\\]|\\.)*)"\s*;"#
    )
    .expect("static .strings token pattern is valid");
}

const HEADER: &str = indoc! {"
    // This file was generated by lingoflow.
    // Manual edits to translated keys are overwritten on the next run.

"};

pub struct StringsCodec;

impl DocumentCodec for StringsCodec {
    fn parse(&self, input: &str) -> Result<Document, Error> {
        let mut entries = Vec::new();
        for captures in TOKEN.captures_iter(input) {
            if let (Some(key), Some(value)) = (captures.get(1), captures.get(2)) {
                entries.push((unescape(key.as_str()), unescape(value.as_str())));
            }
        }
        Ok(flat_document(entries))
    }

    fn render(&self, document: &Document) -> Result<String, Error> {
        let mut content = String::from(HEADER);
        for (key, value) in flat_entries(document) {
            content.push_str(&format!("\"{}\" = \"{}\";\n", escape(&key), escape(&value)));
        }
        Ok(content)
    }

    /// Override default file reading to support BOM-aware decoding (e.g., UTF-16 Apple .strings)
    fn read_from(&self, path: &Path) -> Result<Document, Error> {
        let file = File::open(path)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded)?;

        self.parse(&decoded)
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
