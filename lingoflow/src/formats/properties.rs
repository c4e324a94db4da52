//! Java `.properties` resource bundles.
//!
//! Supports `key=value`, `key: value` and `key value` separators, `#` / `!`
//! comments, backslash line continuations and the usual escapes including
//! `\uXXXX`. Output is written as UTF-8.

use super::{DocumentCodec, flat_document, flat_entries};
use crate::{document::Document, error::Error};

pub struct PropertiesCodec;

impl DocumentCodec for PropertiesCodec {
    fn parse(&self, input: &str) -> Result<Document, Error> {
        let mut entries = Vec::new();
        let mut lines = input.trim_start_matches('\u{feff}').lines();

        while let Some(line) = lines.next() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let mut logical = trimmed.to_string();
            while ends_with_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (key, value) = split_key_value(&logical);
            entries.push((unescape(key)?, unescape(value)?));
        }

        Ok(flat_document(entries))
    }

    fn render(&self, document: &Document) -> Result<String, Error> {
        let mut out = String::new();
        for (key, value) in flat_entries(document) {
            out.push_str(&escape(&key, true));
            out.push('=');
            out.push_str(&escape(&value, false));
            out.push('\n');
        }
        Ok(out)
    }
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], line[i + 1..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[i..].trim_start();
                let rest = rest
                    .strip_prefix('=')
                    .or_else(|| rest.strip_prefix(':'))
                    .unwrap_or(rest);
                return (&line[..i], rest.trim_start());
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str) -> Result<String, Error> {
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
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        Error::InvalidDocument(format!("invalid unicode escape `\\u{hex}`"))
                    })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '=' | ':' | '#' | '!' if is_key => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn value<'a>(document: &'a Document, key: &str) -> Option<&'a str> {
        document.as_map()?.get(key)?.as_str()
    }

    #[test]
    fn test_parse_separators_and_comments() {
        let document = PropertiesCodec
            .parse(indoc! {r"
                # comment
                ! another comment
                app.title=My App
                greeting: Hello
                farewell Goodbye
                empty=
            "})
            .unwrap();
        assert_eq!(value(&document, "app.title"), Some("My App"));
        assert_eq!(value(&document, "greeting"), Some("Hello"));
        assert_eq!(value(&document, "farewell"), Some("Goodbye"));
        assert_eq!(value(&document, "empty"), Some(""));
        assert_eq!(document.as_map().unwrap().len(), 4);
    }

    #[test]
    fn test_parse_escapes_and_continuations() {
        let document = PropertiesCodec
            .parse("multi=first \\\n    second\nunicode=caf\\u00e9\\nnext\nkey\\=with=eq\n")
            .unwrap();
        assert_eq!(value(&document, "multi"), Some("first second"));
        assert_eq!(value(&document, "unicode"), Some("café\nnext"));
        assert_eq!(value(&document, "key=with"), Some("eq"));
    }

    #[test]
    fn test_invalid_unicode_escape() {
        assert!(PropertiesCodec.parse("bad=\\uZZZZ").is_err());
    }

    #[test]
    fn test_render_round_trip() {
        let source = "app.title=My App\nkey\\=x=line one\\nline two\nlead=\\ spaced\n";
        let document = PropertiesCodec.parse(source).unwrap();
        let rendered = PropertiesCodec.render(&document).unwrap();
        assert_eq!(rendered, source);
        assert_eq!(PropertiesCodec.parse(&rendered).unwrap(), document);
    }
}
