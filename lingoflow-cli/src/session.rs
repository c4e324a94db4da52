//! Shared setup for commands that need project settings or a translator.

use std::{fs, path::Path, sync::Arc};

use lingoflow::{
    TranslationCache, Translator, TranslatorOptions,
    backend::{Credentials, build_backend},
    config::Settings,
};
use tracing::debug;

/// Placeholder replaced by a language code in project path patterns.
pub const LANG_PLACEHOLDER: &str = "{lang}";

/// Whether `path` is a per-language pattern such as `locales/{lang}.json`.
pub fn is_language_pattern(path: &str) -> bool {
    path.contains(LANG_PLACEHOLDER)
}

/// Fills every `{lang}` of `pattern` with `lang`.
pub fn localized_path(pattern: &str, lang: &str) -> String {
    pattern.replace(LANG_PLACEHOLDER, lang)
}

/// Loads settings from `--config`, or discovers `.lingoflow.yml` in the
/// working directory.
pub fn load_settings(config: Option<&str>) -> Result<Settings, String> {
    let settings = match config {
        Some(path) => Settings::load(path),
        None => Settings::discover("."),
    }
    .map_err(|e| e.to_string())?;
    debug!(provider = %settings.api.provider, "project configuration loaded");
    Ok(settings)
}

/// Opens the cache the settings point at; an in-memory cache when disabled.
pub fn open_cache(settings: &Settings) -> Arc<TranslationCache> {
    let cache = if settings.cache.enabled {
        TranslationCache::open(&settings.cache.path, settings.cache.max_entries)
    } else {
        TranslationCache::in_memory(settings.cache.max_entries)
    };
    Arc::new(cache)
}

/// Reads a custom prompt file, trimming surrounding whitespace.
pub fn read_prompt_file(path: &str) -> Result<String, String> {
    fs::read_to_string(Path::new(path))
        .map(|content| content.trim().to_string())
        .map_err(|e| format!("Cannot read prompt file {}: {}", path, e))
}

/// Builds a translator from the settings and the process environment.
pub fn build_translator(
    settings: &Settings,
    prompt_override: Option<String>,
) -> Result<Translator, String> {
    let backend =
        build_backend(&settings.api, &Credentials::from_env()).map_err(|e| e.to_string())?;
    let options = TranslatorOptions::from(&settings.api);
    let mut translator = Translator::new(backend, open_cache(settings), options);
    if let Some(prompt) = prompt_override {
        translator.set_prompt(prompt);
    }
    Ok(translator)
}
