#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use lingoflow::{Backend, Error, TranslationParams};
use parking_lot::Mutex;

/// Scriptable in-process backend.
///
/// Translations come from a fixed dictionary when present, otherwise the
/// text is wrapped as `[target] text`.
#[derive(Default)]
pub struct MockBackend {
    pub batch: bool,
    pub dictionary: HashMap<String, String>,
    /// Any text listed here makes its request fail.
    pub failing: Vec<String>,
    /// Delay applied before answering, derived from the first text of a call.
    pub jitter: bool,
    pub single_calls: AtomicUsize,
    pub batch_calls: AtomicUsize,
    pub seen: Mutex<Vec<String>>,
    pub seen_params: Mutex<Vec<TranslationParams>>,
}

impl MockBackend {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn batching() -> Self {
        Self {
            batch: true,
            ..Self::default()
        }
    }

    pub fn with_dictionary(mut self, pairs: &[(&str, &str)]) -> Self {
        self.dictionary = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    pub fn with_failure(mut self, text: &str) -> Self {
        self.failing.push(text.to_string());
        self
    }

    pub fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }

    pub fn into_arc(self) -> Arc<MockBackend> {
        Arc::new(self)
    }

    pub fn total_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst) + self.batch_calls.load(Ordering::SeqCst)
    }

    fn answer(&self, text: &str, params: &TranslationParams) -> Result<String, Error> {
        self.seen.lock().push(text.to_string());
        self.seen_params.lock().push(params.clone());
        if self.failing.iter().any(|f| f == text) {
            return Err(Error::Transport {
                status: 500,
                body: format!("cannot translate {text}"),
            });
        }
        Ok(self
            .dictionary
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", params.target_lang, text)))
    }

    async fn pause(&self, seed: &str) {
        if self.jitter {
            // Deterministic pseudo-random delay so later batches can finish first.
            let millis = seed
                .bytes()
                .fold(7u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
                % 25;
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn supports_batch(&self) -> bool {
        self.batch
    }

    async fn translate_one(&self, text: &str, params: &TranslationParams) -> Result<String, Error> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.pause(text).await;
        self.answer(text, params)
    }

    async fn translate_many(
        &self,
        texts: &[String],
        params: &TranslationParams,
    ) -> Result<Vec<String>, Error> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.pause(texts.first().map(String::as_str).unwrap_or_default())
            .await;
        texts.iter().map(|text| self.answer(text, params)).collect()
    }
}

pub fn backend(mock: &Arc<MockBackend>) -> Arc<dyn Backend> {
    Arc::clone(mock) as Arc<dyn Backend>
}
