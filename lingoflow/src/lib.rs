#![forbid(unsafe_code)]
//! Batch translation pipeline for structured localization files.
//!
//! lingoflow reads a localization file into a [`Document`], collects its
//! translatable strings, sends them to a translation backend in concurrent
//! batches and writes the translations back into the same structure.
//! Finished translations are cached on disk so repeated runs only pay for
//! new or changed text.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lingoflow::{
//!     TranslationCache, TranslationParams, Translator, TranslatorOptions,
//!     backend::{Credentials, build_backend},
//!     config::Settings,
//!     formats::{read_document, write_document},
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), lingoflow::Error> {
//! let settings = Settings::discover(".")?;
//! let backend = build_backend(&settings.api, &Credentials::from_env())?;
//! let cache = Arc::new(TranslationCache::open(&settings.cache.path, settings.cache.max_entries));
//! let translator = Translator::new(backend, cache, TranslatorOptions::from(&settings.api));
//!
//! let source = read_document("locales/en.json")?;
//! let params = TranslationParams::new("en", "de").with_ui_safe(true);
//! let german = translator.translate_document(&source, &params).await?;
//! write_document("locales/de.json", &german)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Supported Formats
//!
//! - **JSON** and **YAML**: nested key/value trees, key order preserved
//! - **Java `.properties`**
//! - **Android `strings.xml`**
//! - **Apple `.strings`**
//!
//! # Backends
//!
//! - `openai`: chat-completion API, one request per text
//! - `algebras-ai`: translation platform with a native batch endpoint

pub mod backend;
pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod flatten;
pub mod formats;
pub mod lang;
pub mod normalize;
pub mod scheduler;
pub mod translator;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    backend::{Backend, Provider},
    cache::TranslationCache,
    config::Settings,
    document::{Document, LeafPath, Mapping, missing_keys},
    error::Error,
    flatten::{flatten, rebuild},
    formats::{FormatType, read_document, write_document},
    scheduler::BatchScheduler,
    translator::{Translator, TranslatorOptions},
    types::{TranslationParams, TranslationRequest},
};
