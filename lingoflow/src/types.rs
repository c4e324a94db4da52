//! Request types shared by the cache, the scheduler and the backends.

use serde_json::json;

/// Everything besides the text that shapes a translation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationParams {
    /// Source language code, or `auto`.
    pub source_lang: String,
    pub target_lang: String,
    /// Ask the backend to keep the result short enough for UI layouts.
    pub ui_safe: bool,
    /// Extra instructions appended to the backend prompt. Empty means none.
    pub prompt: String,
    /// Glossary applied by backends that support one. Not part of the cache key.
    pub glossary_id: Option<String>,
}

impl TranslationParams {
    pub fn new(source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            ..Self::default()
        }
    }

    pub fn with_ui_safe(mut self, ui_safe: bool) -> Self {
        self.ui_safe = ui_safe;
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

    /// Builds the request for a single text under these parameters.
    pub fn request(&self, text: impl Into<String>) -> TranslationRequest {
        TranslationRequest {
            text: text.into(),
            params: self.clone(),
        }
    }
}

/// One text to translate together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub params: TranslationParams,
}

impl TranslationRequest {
    /// Cache identity of this request.
    ///
    /// The text, both languages and the UI-safety flag are encoded as a JSON
    /// array so no field value can bleed into another. A non-empty prompt
    /// adds `#` and the first 8 hex digits of its BLAKE3 hash. The glossary
    /// id is not part of the key.
    pub fn fingerprint(&self) -> String {
        let base = json!([
            self.text,
            self.params.source_lang,
            self.params.target_lang,
            self.params.ui_safe
        ])
        .to_string();

        if self.params.prompt.is_empty() {
            base
        } else {
            let hash = blake3::hash(self.params.prompt.as_bytes()).to_hex();
            format!("{base}#{}", &hash.as_str()[..8])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_without_prompt() {
        let request = TranslationParams::new("en", "fr").request("Hello");
        assert_eq!(request.fingerprint(), r#"["Hello","en","fr",false]"#);
    }

    #[test]
    fn test_fingerprint_prompt_suffix() {
        let plain = TranslationParams::new("en", "fr").request("Hello");
        let prompted = TranslationParams::new("en", "fr")
            .with_prompt("X")
            .request("Hello");
        let key = prompted.fingerprint();
        assert!(key.starts_with(&plain.fingerprint()));
        assert_eq!(key.len(), plain.fingerprint().len() + 9);
        assert_ne!(key, plain.fingerprint());
    }

    #[test]
    fn test_fingerprint_ignores_glossary() {
        let a = TranslationParams::new("en", "fr").request("Hi");
        let b = TranslationParams::new("en", "fr")
            .with_glossary_id(Some("g-1".into()))
            .request("Hi");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_distinguishes_ui_safe() {
        let a = TranslationParams::new("en", "fr").request("Hi");
        let b = TranslationParams::new("en", "fr")
            .with_ui_safe(true)
            .request("Hi");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
