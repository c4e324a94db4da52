//! The translation façade.
//!
//! [`Translator`] ties together the cache, the batch scheduler and a
//! backend. Every operation runs the same pipeline: resolve parameters,
//! look up the cache, fetch what is missing, normalize, store, return.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lingoflow::{
//!     TranslationCache, TranslationParams, Translator, TranslatorOptions,
//!     backend::{Credentials, build_backend},
//!     config::Settings,
//! };
//!
//! # async fn run() -> Result<(), lingoflow::Error> {
//! let settings = Settings::discover(".")?;
//! let backend = build_backend(&settings.api, &Credentials::from_env())?;
//! let cache = Arc::new(TranslationCache::open(&settings.cache.path, settings.cache.max_entries));
//! let translator = Translator::new(backend, cache, TranslatorOptions::from(&settings.api));
//!
//! let source = lingoflow::formats::read_document("en.json")?;
//! let french = translator
//!     .translate_document(&source, &TranslationParams::new("en", "fr"))
//!     .await?;
//! lingoflow::formats::write_document("fr.json", &french)?;
//! # Ok(())
//! # }
//! ```

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, info};

use crate::{
    backend::Backend,
    cache::TranslationCache,
    config::ApiSettings,
    document::{Document, KeyResolution, place_translation, resolve_source_text},
    error::Error,
    flatten::{flatten, rebuild, unresolved},
    lang::canonical_language,
    normalize::unescape_translation,
    scheduler::{BatchScheduler, DEFAULT_BATCH_SIZE, DEFAULT_MAX_CONCURRENCY},
    types::TranslationParams,
};

/// Tunables for a [`Translator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorOptions {
    pub batch_size: usize,
    pub max_parallel_batches: usize,
    /// Un-escape `\n`, `\"` and friends that the backend added.
    pub normalize_strings: bool,
    /// Default custom prompt for calls that do not set one.
    pub prompt: String,
    /// Default glossary for calls that do not set one.
    pub glossary_id: Option<String>,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_parallel_batches: DEFAULT_MAX_CONCURRENCY,
            normalize_strings: true,
            prompt: String::new(),
            glossary_id: None,
        }
    }
}

impl TranslatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_parallel_batches(mut self, max_parallel_batches: usize) -> Self {
        self.max_parallel_batches = max_parallel_batches;
        self
    }

    pub fn with_normalize_strings(mut self, normalize_strings: bool) -> Self {
        self.normalize_strings = normalize_strings;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_glossary_id(mut self, glossary_id: Option<String>) -> Self {
        self.glossary_id = glossary_id;
        self
    }
}

impl From<&ApiSettings> for TranslatorOptions {
    fn from(settings: &ApiSettings) -> Self {
        Self {
            batch_size: settings.batch_size,
            max_parallel_batches: settings.max_parallel_batches,
            normalize_strings: settings.normalize_strings,
            prompt: settings.prompt.clone().unwrap_or_default(),
            glossary_id: settings.glossary_id.clone(),
        }
    }
}

pub struct Translator {
    backend: Arc<dyn Backend>,
    cache: Arc<TranslationCache>,
    options: TranslatorOptions,
}

impl Translator {
    pub fn new(
        backend: Arc<dyn Backend>,
        cache: Arc<TranslationCache>,
        options: TranslatorOptions,
    ) -> Self {
        Self {
            backend,
            cache,
            options,
        }
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }

    /// Replaces the default custom prompt. Cached results made with another
    /// prompt are not reused.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.options.prompt = prompt.into();
    }

    fn scheduler(&self) -> BatchScheduler {
        BatchScheduler::new(self.options.batch_size, self.options.max_parallel_batches)
    }

    /// Canonicalizes language codes and fills in the default prompt and glossary.
    fn resolve(&self, params: &TranslationParams) -> TranslationParams {
        TranslationParams {
            source_lang: canonical_language(&params.source_lang),
            target_lang: canonical_language(&params.target_lang),
            ui_safe: params.ui_safe,
            prompt: if params.prompt.is_empty() {
                self.options.prompt.clone()
            } else {
                params.prompt.clone()
            },
            glossary_id: params
                .glossary_id
                .clone()
                .or_else(|| self.options.glossary_id.clone()),
        }
    }

    fn normalize(&self, source: &str, translated: String) -> String {
        if self.options.normalize_strings {
            unescape_translation(source, &translated)
        } else {
            translated
        }
    }

    /// Translates a single text, using the cache when possible.
    ///
    /// Blank text is returned unchanged without a backend call.
    pub async fn translate_text(
        &self,
        text: &str,
        params: &TranslationParams,
    ) -> Result<String, Error> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        let params = self.resolve(params);
        let request = params.request(text);
        if let Some(hit) = self.cache.get(&request) {
            debug!("cache hit");
            return Ok(hit);
        }

        let translated = self.backend.translate_one(text, &params).await?;
        let translated = self.normalize(text, translated);
        self.cache.set(&request, &translated);
        Ok(translated)
    }

    /// Translates many texts through the batch scheduler.
    ///
    /// Cache hits are served locally. Fresh results are written to the
    /// cache only once every batch has succeeded.
    pub async fn translate_texts(
        &self,
        texts: &[String],
        params: &TranslationParams,
    ) -> Result<Vec<String>, Error> {
        let params = self.resolve(params);
        let mut results: Vec<Option<String>> = texts
            .iter()
            .map(|text| {
                if text.trim().is_empty() {
                    Some(text.clone())
                } else {
                    self.cache.get(&params.request(text.as_str()))
                }
            })
            .collect();

        let pending: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, result)| result.is_none())
            .map(|(index, _)| index)
            .collect();
        debug!(
            total = texts.len(),
            cached = texts.len() - pending.len(),
            "cache lookup finished"
        );

        if !pending.is_empty() {
            let misses: Vec<String> = pending.iter().map(|&i| texts[i].clone()).collect();
            let translated = self
                .scheduler()
                .translate_batches(&self.backend, &misses, &params)
                .await?;

            let mut fresh = Vec::with_capacity(pending.len());
            for (&index, translation) in pending.iter().zip(translated) {
                let translation = self.normalize(&texts[index], translation);
                fresh.push((params.request(texts[index].as_str()), translation.clone()));
                results[index] = Some(translation);
            }
            self.cache.set_many(fresh);
        }

        Ok(results
            .into_iter()
            .zip(texts)
            .map(|(result, text)| result.unwrap_or_else(|| text.clone()))
            .collect())
    }

    /// Translates every string leaf of `document`, keeping its structure.
    pub async fn translate_document(
        &self,
        document: &Document,
        params: &TranslationParams,
    ) -> Result<Document, Error> {
        let leaves = flatten(document);
        let texts: Vec<String> = leaves.iter().map(|(_, text)| text.clone()).collect();
        let translated = self.translate_texts(&texts, params).await?;

        let mut translations: HashMap<_, _> = leaves
            .into_iter()
            .map(|(path, _)| path)
            .zip(translated)
            .collect();

        for (path, text) in unresolved(document, &translations) {
            debug!(path = %path, "translating leaf individually");
            let translation = self.translate_text(&text, params).await?;
            translations.insert(path, translation);
        }

        info!(leaves = translations.len(), "document translated");
        Ok(rebuild(document, &translations))
    }

    /// Translates `document` one leaf at a time through
    /// [`Translator::translate_text`], without the batch scheduler.
    pub async fn translate_document_sequential(
        &self,
        document: &Document,
        params: &TranslationParams,
    ) -> Result<Document, Error> {
        let mut translations = HashMap::new();
        for (path, text) in flatten(document) {
            let translation = self
                .translate_text(&text, params)
                .await
                .map_err(|e| e.for_key(path.to_string()))?;
            translations.insert(path, translation);
        }
        info!(leaves = translations.len(), "document translated sequentially");
        Ok(rebuild(document, &translations))
    }

    /// Adds translations for `keys` to a copy of `target`, one key at a time.
    ///
    /// Keys are looked up in `source` literally, then as dotted paths, and
    /// finally used as the source text themselves. Entries of `target` that
    /// are not named in `keys` are left untouched.
    pub async fn translate_missing_keys(
        &self,
        source: &Document,
        target: &Document,
        keys: &[String],
        params: &TranslationParams,
    ) -> Result<Document, Error> {
        let mut out = target.clone();
        for key in keys {
            let (text, resolution) = resolve_source_text(source, key);
            let translation = self
                .translate_text(&text, params)
                .await
                .map_err(|e| e.for_key(key.as_str()))?;
            place_translation(&mut out, key, resolution, translation);
        }
        info!(keys = keys.len(), "missing keys translated");
        Ok(out)
    }

    /// Re-translates `keys` whose source text changed, replacing their
    /// current values in a copy of `target`.
    pub async fn translate_outdated_keys(
        &self,
        source: &Document,
        target: &Document,
        keys: &[String],
        params: &TranslationParams,
    ) -> Result<Document, Error> {
        self.translate_missing_keys(source, target, keys, params).await
    }

    /// Batch variant of [`Translator::translate_missing_keys`].
    pub async fn translate_missing_keys_batch(
        &self,
        source: &Document,
        target: &Document,
        keys: &[String],
        params: &TranslationParams,
    ) -> Result<Document, Error> {
        let resolved: Vec<(String, KeyResolution)> = keys
            .iter()
            .map(|key| resolve_source_text(source, key))
            .collect();
        let texts: Vec<String> = resolved.iter().map(|(text, _)| text.clone()).collect();
        let translated = self.translate_texts(&texts, params).await?;

        let mut out = target.clone();
        for ((key, (_, resolution)), translation) in keys.iter().zip(resolved).zip(translated) {
            place_translation(&mut out, key, resolution, translation);
        }
        info!(keys = keys.len(), "missing keys translated in batches");
        Ok(out)
    }

    /// Batch variant of [`Translator::translate_outdated_keys`].
    pub async fn translate_outdated_keys_batch(
        &self,
        source: &Document,
        target: &Document,
        keys: &[String],
        params: &TranslationParams,
    ) -> Result<Document, Error> {
        self.translate_missing_keys_batch(source, target, keys, params)
            .await
    }
}
