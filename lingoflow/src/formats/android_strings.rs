//! Support for Android `strings.xml` resource files.
//!
//! Only singular `<string>` elements are read; `<plurals>` and
//! `<string-array>` are skipped. Entries marked `translatable="false"` are
//! left out of the document, so they never reach a translated locale.
//! Android backslash escapes are decoded on read and re-applied on write.

use std::io::BufRead;

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use super::{DocumentCodec, flat_document, flat_entries};
use crate::{document::Document, error::Error};

pub struct AndroidStringsCodec;

impl DocumentCodec for AndroidStringsCodec {
    fn parse(&self, input: &str) -> Result<Document, Error> {
        let mut xml_reader = Reader::from_reader(input.as_bytes());
        xml_reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut entries = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"string" => {
                    let (name, value, translatable) = parse_string_element(e, &mut xml_reader)?;
                    if translatable {
                        entries.push((name, decode_android_escapes(&value)));
                    }
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"string" => {
                    let (name, translatable) = parse_attributes(e)?;
                    if translatable {
                        entries.push((name, String::new()));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }

        Ok(flat_document(entries))
    }

    fn render(&self, document: &Document) -> Result<String, Error> {
        let mut out = Vec::new();
        let mut xml_writer = Writer::new(&mut out);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::Start(BytesStart::new("resources")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        for (name, value) in flat_entries(document) {
            let mut elem = BytesStart::new("string");
            elem.push_attribute(("name", name.as_str()));
            xml_writer.write_event(Event::Text(BytesText::new("    ")))?;
            xml_writer.write_event(Event::Start(elem))?;
            let escaped = partial_escape(&encode_android_escapes(&value)).into_owned();
            xml_writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
            xml_writer.write_event(Event::End(BytesEnd::new("string")))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        String::from_utf8(out).map_err(|e| Error::InvalidDocument(e.to_string()))
    }
}

fn parse_attributes(e: &BytesStart) -> Result<(String, bool), Error> {
    let mut name = None;
    let mut translatable = true;

    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::InvalidDocument(e.to_string()))?;
        match attr.key.as_ref() {
            b"name" => name = Some(attr.unescape_value()?.to_string()),
            b"translatable" => translatable = attr.unescape_value()? != "false",
            _ => {}
        }
    }
    let name =
        name.ok_or_else(|| Error::InvalidDocument("string tag missing 'name'".to_string()))?;
    Ok((name, translatable))
}

fn parse_string_element<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut Reader<R>,
) -> Result<(String, String, bool), Error> {
    let (name, translatable) = parse_attributes(e)?;

    let mut buf = Vec::new();
    let mut value = String::new();
    // Collect text until the closing tag; CDATA counts as text.
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(t)) => value.push_str(&t.unescape()?),
            Ok(Event::CData(t)) => value.push_str(&String::from_utf8_lossy(&t)),
            Ok(Event::End(ref end)) if end.name().as_ref() == b"string" => break,
            Ok(Event::Eof) => {
                return Err(Error::InvalidDocument(format!(
                    "unexpected end of file inside string `{name}`"
                )));
            }
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok((name, value, translatable))
}

fn decode_android_escapes(raw: &str) -> String {
    let trimmed = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    let mut out = String::with_capacity(trimmed.len());
    let mut chars = trimmed.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn encode_android_escapes(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '@' | '?' if i == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
