//! Remote translation backends.
//!
//! A [`Backend`] turns texts into translations over HTTP. Single-text
//! providers only implement [`Backend::translate_one`]; providers with a
//! native batch endpoint also override [`Backend::translate_many`] and
//! report [`Backend::supports_batch`].

pub mod algebras;
pub mod openai;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;

use crate::{config::ApiSettings, error::Error, types::TranslationParams};

pub use algebras::AlgebrasClient;
pub use openai::ChatCompletionClient;

/// Environment variable holding the chat-completion API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable holding the translation platform API key.
pub const ALGEBRAS_API_KEY_ENV: &str = "ALGEBRAS_API_KEY";

#[async_trait]
pub trait Backend: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Whether [`Backend::translate_many`] is a single native call.
    fn supports_batch(&self) -> bool {
        false
    }

    async fn translate_one(&self, text: &str, params: &TranslationParams) -> Result<String, Error>;

    /// Translates `texts` in order. The default issues one request per text.
    async fn translate_many(
        &self,
        texts: &[String],
        params: &TranslationParams,
    ) -> Result<Vec<String>, Error> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.translate_one(text, params).await?);
        }
        Ok(out)
    }
}

/// Supported translation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Chat-completion style LLM endpoint.
    OpenAi,
    /// Dedicated translation platform with a batch endpoint.
    Algebras,
}

impl Display for Provider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAi => write!(f, "openai"),
            Provider::Algebras => write!(f, "algebras-ai"),
        }
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "open-ai" => Ok(Provider::OpenAi),
            "algebras-ai" | "algebras" => Ok(Provider::Algebras),
            other => Err(Error::configuration(format!(
                "unsupported provider `{other}` (expected `openai` or `algebras-ai`)"
            ))),
        }
    }
}

/// API keys available to [`build_backend`].
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub algebras_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            openai_api_key: read(OPENAI_API_KEY_ENV),
            algebras_api_key: read(ALGEBRAS_API_KEY_ENV),
        }
    }
}

/// Builds the backend selected by `settings`.
///
/// Fails with [`Error::Configuration`] before any network call when the
/// provider is unknown or its credential is missing.
pub fn build_backend(
    settings: &ApiSettings,
    credentials: &Credentials,
) -> Result<Arc<dyn Backend>, Error> {
    let timeout = Duration::from_secs(settings.request_timeout_secs.max(1));
    match settings.provider()? {
        Provider::OpenAi => {
            let key = credentials.openai_api_key.clone().ok_or_else(|| {
                Error::configuration(format!("missing credential: set {OPENAI_API_KEY_ENV}"))
            })?;
            let client = ChatCompletionClient::new(
                key,
                settings.model.clone(),
                settings.base_url.clone(),
                timeout,
            )?;
            Ok(Arc::new(client))
        }
        Provider::Algebras => {
            let key = credentials.algebras_api_key.clone().ok_or_else(|| {
                Error::configuration(format!("missing credential: set {ALGEBRAS_API_KEY_ENV}"))
            })?;
            let client = AlgebrasClient::new(key, settings.base_url.clone(), timeout)?;
            Ok(Arc::new(client))
        }
    }
}

/// Reads the response body and turns non-2xx statuses into [`Error::Transport`].
pub(crate) async fn read_success_body(response: reqwest::Response) -> Result<String, Error> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(Error::Transport {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, Error> {
    Ok(reqwest::Client::builder()
        .pool_max_idle_per_host(8)
        .timeout(timeout)
        .build()?)
}
