//! Project configuration loaded from `.lingoflow.yml`.
//!
//! ```yaml
//! languages: [en, fr, de]
//! api:
//!   provider: algebras-ai
//!   batch_size: 20
//! cache:
//!   path: .lingoflow-cache.json
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{backend::Provider, cache, error::Error, lang::canonical_language};

/// File name looked up by [`Settings::discover`].
pub const CONFIG_FILE_NAME: &str = ".lingoflow.yml";

/// Top-level project settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Project languages. The first one is the source language unless
    /// `source_language` says otherwise.
    pub languages: Vec<String>,
    pub source_language: Option<String>,
    pub api: ApiSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// `openai` or `algebras-ai`.
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    pub batch_size: usize,
    pub max_parallel_batches: usize,
    pub normalize_strings: bool,
    pub glossary_id: Option<String>,
    pub prompt: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4".to_string(),
            base_url: None,
            batch_size: 20,
            max_parallel_batches: 5,
            normalize_strings: true,
            glossary_id: None,
            prompt: None,
            request_timeout_secs: 60,
        }
    }
}

impl ApiSettings {
    pub fn provider(&self) -> Result<Provider, Error> {
        self.provider.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub path: PathBuf,
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from(".lingoflow-cache.json"),
            max_entries: cache::DEFAULT_CAPACITY,
        }
    }
}

impl Settings {
    /// Parses and validates settings from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, Error> {
        let settings: Settings = serde_yaml::from_str(content)
            .map_err(|e| Error::configuration(format!("invalid project configuration: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from `path`. Relative cache paths are resolved against
    /// the directory holding the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "cannot read project configuration {}: {e}",
                path.display()
            ))
        })?;
        let mut settings = Self::from_yaml_str(&content)?;
        if settings.cache.path.is_relative() {
            if let Some(dir) = path.parent() {
                settings.cache.path = dir.join(&settings.cache.path);
            }
        }
        Ok(settings)
    }

    /// Loads `.lingoflow.yml` from `dir`.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        let candidate = dir.as_ref().join(CONFIG_FILE_NAME);
        if !candidate.is_file() {
            return Err(Error::configuration(format!(
                "no project configuration found ({} missing in {})",
                CONFIG_FILE_NAME,
                dir.as_ref().display()
            )));
        }
        Self::load(candidate)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.api.provider()?;
        if self.api.batch_size == 0 {
            return Err(Error::configuration("api.batch_size must be at least 1"));
        }
        if self.api.max_parallel_batches == 0 {
            return Err(Error::configuration(
                "api.max_parallel_batches must be at least 1",
            ));
        }
        if self.cache.max_entries == 0 {
            return Err(Error::configuration("cache.max_entries must be at least 1"));
        }
        Ok(())
    }

    /// The configured source language, falling back to the first project
    /// language and then to `auto`.
    pub fn source_language(&self) -> String {
        self.source_language
            .clone()
            .or_else(|| self.languages.first().cloned())
            .unwrap_or_else(|| crate::lang::AUTO.to_string())
    }

    /// Every project language except the source language.
    pub fn target_languages(&self) -> Vec<String> {
        let source = self.source_language();
        self.languages
            .iter()
            .filter(|lang| **lang != source)
            .cloned()
            .collect()
    }

    /// Languages to translate into: every target language, or only
    /// `requested` when it is one of them.
    pub fn select_target_languages(&self, requested: Option<&str>) -> Result<Vec<String>, Error> {
        let targets = self.target_languages();
        let Some(requested) = requested else {
            if targets.is_empty() {
                return Err(Error::configuration(
                    "no target languages configured: list at least two `languages`",
                ));
            }
            return Ok(targets);
        };

        let wanted = canonical_language(requested);
        targets
            .into_iter()
            .find(|lang| canonical_language(lang) == wanted)
            .map(|lang| vec![lang])
            .ok_or_else(|| {
                Error::configuration(format!(
                    "language `{requested}` is not configured in this project"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let settings = Settings::from_yaml_str("languages: [en, fr]\n").unwrap();
        assert_eq!(settings.api.provider, "openai");
        assert_eq!(settings.api.batch_size, 20);
        assert_eq!(settings.api.max_parallel_batches, 5);
        assert!(settings.api.normalize_strings);
        assert!(settings.cache.enabled);
        assert_eq!(settings.source_language(), "en");
        assert_eq!(settings.target_languages(), vec!["fr"]);
    }

    #[test]
    fn test_full_document() {
        let yaml = "
languages: [en, de, fr]
source_language: de
api:
  provider: algebras-ai
  batch_size: 7
  normalize_strings: false
  glossary_id: g-42
cache:
  enabled: false
  max_entries: 50
";
        let settings = Settings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.api.provider().unwrap(), Provider::Algebras);
        assert_eq!(settings.api.batch_size, 7);
        assert!(!settings.api.normalize_strings);
        assert_eq!(settings.api.glossary_id.as_deref(), Some("g-42"));
        assert!(!settings.cache.enabled);
        assert_eq!(settings.target_languages(), vec!["en", "fr"]);
    }

    #[test]
    fn test_unsupported_provider_is_configuration_error() {
        let err = Settings::from_yaml_str("api:\n  provider: babelfish\n").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("babelfish"));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let err = Settings::from_yaml_str("api:\n  batch_size: 0\n").unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_discover_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Settings::discover(dir.path()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_load_resolves_cache_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "languages: [en]\n").unwrap();
        let settings = Settings::discover(dir.path()).unwrap();
        assert_eq!(
            settings.cache.path,
            dir.path().join(".lingoflow-cache.json")
        );
    }

    #[test]
    fn test_no_languages_means_auto_source() {
        let settings = Settings::default();
        assert_eq!(settings.source_language(), "auto");
        assert!(settings.target_languages().is_empty());
    }

    #[test]
    fn test_select_all_target_languages() {
        let settings = Settings::from_yaml_str("languages: [en, fr, pt-BR]\n").unwrap();
        assert_eq!(settings.select_target_languages(None).unwrap(), vec!["fr", "pt-BR"]);
    }

    #[test]
    fn test_select_one_configured_language() {
        let settings = Settings::from_yaml_str("languages: [en, fr, pt-BR]\n").unwrap();
        assert_eq!(settings.select_target_languages(Some("pt_br")).unwrap(), vec!["pt-BR"]);

        let err = settings.select_target_languages(Some("de")).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("`de` is not configured"));

        // The source language is not a target.
        assert!(settings.select_target_languages(Some("en")).is_err());
    }

    #[test]
    fn test_select_without_targets_fails() {
        let settings = Settings::from_yaml_str("languages: [en]\n").unwrap();
        assert!(settings.select_target_languages(None).unwrap_err().is_configuration());
    }
}
