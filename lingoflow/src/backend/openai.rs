//! Chat-completion client (OpenAI-compatible API).
//!
//! One request per text; batching is done by the scheduler fanning out
//! concurrent calls.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{Backend, http_client, read_success_body};
use crate::{error::Error, lang::AUTO, types::TranslationParams};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const TEMPERATURE: f64 = 0.3;

const SYSTEM_PROMPT: &str = "You are a professional translator for software localization files. \
Translate faithfully, keep placeholders such as {name}, %s, %1$d and HTML tags unchanged, \
and never add explanations.";

pub struct ChatCompletionClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ChatCompletionClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: http_client(timeout)?,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait]
impl Backend for ChatCompletionClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn translate_one(&self, text: &str, params: &TranslationParams) -> Result<String, Error> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": build_user_prompt(text, params)}
            ],
            "temperature": TEMPERATURE
        });

        debug!(model = %self.model, chars = text.len(), "chat completion request");
        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let body = read_success_body(response).await?;

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            Error::data_integrity(format!("malformed chat completion response: {e}"))
        })?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| Error::data_integrity("chat completion response has no content"))
    }
}

fn build_user_prompt(text: &str, params: &TranslationParams) -> String {
    let source = if params.source_lang == AUTO {
        "the source language".to_string()
    } else {
        params.source_lang.clone()
    };
    let mut prompt = format!(
        "Translate the following text from {source} to {}.\n\
         Preserve all formatting, line breaks, variables and placeholders.",
        params.target_lang
    );
    if params.ui_safe {
        prompt.push_str(
            "\nThe text is shown in a user interface: \
             keep the translation no longer than the original.",
        );
    }
    if !params.prompt.is_empty() {
        prompt.push_str("\nAdditional instructions: ");
        prompt.push_str(&params.prompt);
    }
    prompt.push_str("\nReturn only the translated text.\n\nText to translate:\n");
    prompt.push_str(text);
    prompt
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
