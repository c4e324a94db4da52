//! Language code handling.

use tracing::debug;
use unic_langid::LanguageIdentifier;

/// Marker accepted in place of a source language.
pub const AUTO: &str = "auto";

/// Returns the canonical BCP 47 form of `code` (`pt_br` → `pt-BR`).
///
/// `auto` is passed through. Codes that do not parse are trusted as given.
pub fn canonical_language(code: &str) -> String {
    let trimmed = code.trim();
    if trimmed.eq_ignore_ascii_case(AUTO) {
        return AUTO.to_string();
    }
    match trimmed.replace('_', "-").parse::<LanguageIdentifier>() {
        Ok(id) => id.to_string(),
        Err(e) => {
            debug!(code = trimmed, error = %e, "keeping unparseable language code as-is");
            trimmed.to_string()
        }
    }
}
