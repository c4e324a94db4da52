//! Client for the Algebras translation platform.
//!
//! Single texts go to `/api/v1/translation/translate` as a multipart form;
//! batches go to `/api/v1/translation/translate-batch` as JSON and come back
//! as index-tagged translations.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Backend, http_client, read_success_body};
use crate::{error::Error, types::TranslationParams};

pub const DEFAULT_BASE_URL: &str = "https://platform.algebras.ai";
const TRANSLATE_PATH: &str = "/api/v1/translation/translate";
const TRANSLATE_BATCH_PATH: &str = "/api/v1/translation/translate-batch";

pub struct AlgebrasClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AlgebrasClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: http_client(timeout)?,
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{}{path}", self.base_url))
            .header("accept", "application/json")
            .header("X-Api-Key", &self.api_key)
    }
}

#[async_trait]
impl Backend for AlgebrasClient {
    fn name(&self) -> &'static str {
        "algebras-ai"
    }

    fn supports_batch(&self) -> bool {
        true
    }

    async fn translate_one(&self, text: &str, params: &TranslationParams) -> Result<String, Error> {
        let form = Form::new()
            .text("sourceLanguage", params.source_lang.clone())
            .text("targetLanguage", params.target_lang.clone())
            .text("textContent", text.to_string())
            .text("fileContent", String::new())
            .text("glossaryId", params.glossary_id.clone().unwrap_or_default())
            .text("prompt", params.prompt.clone())
            .text("flag", flag(params.ui_safe).to_string());

        let response = self.post(TRANSLATE_PATH).multipart(form).send().await?;
        let body = read_success_body(response).await?;

        let parsed: SingleResponse = serde_json::from_str(&body)
            .map_err(|e| Error::data_integrity(format!("malformed translate response: {e}")))?;
        match parsed.data {
            serde_json::Value::String(translation) => Ok(translation),
            other => Err(Error::data_integrity(format!(
                "translate response `data` is not a string: {other}"
            ))),
        }
    }

    async fn translate_many(
        &self,
        texts: &[String],
        params: &TranslationParams,
    ) -> Result<Vec<String>, Error> {
        let request = BatchRequest {
            texts,
            source_language: &params.source_lang,
            target_language: &params.target_lang,
            prompt: &params.prompt,
            flag: params.ui_safe,
        };

        debug!(texts = texts.len(), "batch translate request");
        let response = self.post(TRANSLATE_BATCH_PATH).json(&request).send().await?;
        let body = read_success_body(response).await?;

        let parsed: BatchResponse = serde_json::from_str(&body)
            .map_err(|e| Error::data_integrity(format!("malformed batch response: {e}")))?;
        let mut translations = parsed.data.translations;
        if translations.len() != texts.len() {
            return Err(Error::data_integrity(format!(
                "batch response has {} translations for {} texts",
                translations.len(),
                texts.len()
            )));
        }
        translations.sort_by_key(|t| t.index);
        if let Some((position, t)) = translations
            .iter()
            .enumerate()
            .find(|(position, t)| t.index != *position)
        {
            return Err(Error::data_integrity(format!(
                "batch response index {} found where {position} was expected",
                t.index
            )));
        }
        Ok(translations.into_iter().map(|t| t.content).collect())
    }
}

fn flag(ui_safe: bool) -> &'static str {
    if ui_safe { "true" } else { "false" }
}

#[derive(Deserialize)]
struct SingleResponse {
    data: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchRequest<'a> {
    texts: &'a [String],
    source_language: &'a str,
    target_language: &'a str,
    prompt: &'a str,
    flag: bool,
}

#[derive(Deserialize)]
struct BatchResponse {
    data: BatchData,
}

#[derive(Deserialize)]
struct BatchData {
    translations: Vec<IndexedTranslation>,
}

#[derive(Deserialize)]
struct IndexedTranslation {
    index: usize,
    content: String,
}
