//! Flattening documents into translatable leaves and rebuilding them.

use std::collections::HashMap;

use crate::document::{Document, LeafPath, Mapping};

/// Collects every string leaf of `document` in pre-order, following mapping
/// key order. Lists and non-string scalars are skipped.
pub fn flatten(document: &Document) -> Vec<(LeafPath, String)> {
    let mut leaves = Vec::new();
    collect(document, &LeafPath::root(), &mut leaves);
    leaves
}

fn collect(node: &Document, path: &LeafPath, leaves: &mut Vec<(LeafPath, String)>) {
    match node {
        Document::String(text) => leaves.push((path.clone(), text.clone())),
        Document::Map(map) => {
            for (key, child) in map.iter() {
                collect(child, &path.child(key), leaves);
            }
        }
        Document::Null | Document::Bool(_) | Document::Number(_) | Document::List(_) => {}
    }
}

/// Rebuilds `document` with translated string leaves.
///
/// The result has the same containers, key order and non-string values as
/// the input. String leaves missing from `translations` keep their source
/// text; use [`unresolved`] to find them first.
pub fn rebuild(document: &Document, translations: &HashMap<LeafPath, String>) -> Document {
    rebuild_node(document, &LeafPath::root(), translations)
}

fn rebuild_node(
    node: &Document,
    path: &LeafPath,
    translations: &HashMap<LeafPath, String>,
) -> Document {
    match node {
        Document::String(text) => Document::String(
            translations
                .get(path)
                .cloned()
                .unwrap_or_else(|| text.clone()),
        ),
        Document::Map(map) => Document::Map(
            map.iter()
                .map(|(key, child)| {
                    (
                        key.clone(),
                        rebuild_node(child, &path.child(key), translations),
                    )
                })
                .collect::<Mapping>(),
        ),
        Document::Null | Document::Bool(_) | Document::Number(_) | Document::List(_) => {
            node.clone()
        }
    }
}

/// Returns the string leaves of `document` that have no entry in `translations`.
pub fn unresolved(
    document: &Document,
    translations: &HashMap<LeafPath, String>,
) -> Vec<(LeafPath, String)> {
    flatten(document)
        .into_iter()
        .filter(|(path, _)| !translations.contains_key(path))
        .collect()
}
