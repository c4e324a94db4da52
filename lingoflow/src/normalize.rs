//! Post-processing of backend output.

/// Escape sequences that backends sometimes emit literally.
const ESCAPES: [(char, char); 6] = [
    ('\'', '\''),
    ('"', '"'),
    ('n', '\n'),
    ('t', '\t'),
    ('r', '\r'),
    ('\\', '\\'),
];

/// Un-escapes sequences in `translated` that were not present in `source`.
///
/// An escape that the source text already contains is kept, since the file
/// format evidently wants it. The text is scanned once, so `\\n` decodes to
/// a backslash followed by `n`.
pub fn unescape_translation(source: &str, translated: &str) -> String {
    let mut out = String::with_capacity(translated.len());
    let mut chars = translated.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match ESCAPES.iter().find(|(escaped, _)| *escaped == next) {
            Some((escaped, literal)) if !source.contains(&format!("\\{escaped}")) => {
                out.push(*literal);
            }
            _ => {
                out.push('\\');
                out.push(next);
            }
        }
    }
    out
}
