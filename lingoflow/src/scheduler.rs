//! Concurrent batch dispatch.
//!
//! Texts are cut into contiguous batches and sent to the backend with at
//! most `max_concurrency` batches in flight. Output order always matches
//! input order. The first failing batch fails the whole call: the other
//! batches are aborted and no partial result is returned.

use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, info};

use crate::{backend::Backend, error::Error, types::TranslationParams};

pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchScheduler {
    batch_size: usize,
    max_concurrency: usize,
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE, DEFAULT_MAX_CONCURRENCY)
    }
}

impl BatchScheduler {
    /// Both limits are clamped to at least 1.
    pub fn new(batch_size: usize, max_concurrency: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Translates `texts` batch by batch and returns the results in input order.
    ///
    /// # Errors
    ///
    /// [`Error::Batch`] with the index of the first batch that failed, or
    /// [`Error::Scheduler`] if a worker task panicked.
    pub async fn translate_batches(
        &self,
        backend: &Arc<dyn Backend>,
        texts: &[String],
        params: &TranslationParams,
    ) -> Result<Vec<String>, Error> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let batches: Vec<Vec<String>> = texts
            .chunks(self.batch_size)
            .map(<[String]>::to_vec)
            .collect();
        let batch_count = batches.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, batch) in batches.into_iter().enumerate() {
            let backend = Arc::clone(backend);
            let params = params.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        debug!(
                            batch = index,
                            size = batch.len(),
                            backend = backend.name(),
                            "dispatching batch"
                        );
                        dispatch_batch(backend, batch, &params).await
                    }
                    Err(e) => Err(Error::Scheduler(e.to_string())),
                };
                (index, result)
            });
        }

        let mut slots: Vec<Option<Vec<String>>> = vec![None; batch_count];
        while let Some(joined) = tasks.join_next().await {
            // Returning early drops the set, which aborts the remaining batches.
            let (index, result) =
                joined.map_err(|e| Error::Scheduler(format!("batch worker failed: {e}")))?;
            match result {
                Ok(translated) => slots[index] = Some(translated),
                Err(e) => {
                    tasks.abort_all();
                    return Err(e.in_batch(index));
                }
            }
        }

        let mut out = Vec::with_capacity(texts.len());
        for (index, slot) in slots.into_iter().enumerate() {
            let translated = slot.ok_or_else(|| {
                Error::Scheduler(format!("batch {index} finished without a result"))
            })?;
            out.extend(translated);
        }
        info!(texts = texts.len(), batches = batch_count, "batches translated");
        Ok(out)
    }
}

/// Sends one batch, natively or as concurrent single-text calls.
async fn dispatch_batch(
    backend: Arc<dyn Backend>,
    batch: Vec<String>,
    params: &TranslationParams,
) -> Result<Vec<String>, Error> {
    let translated = if backend.supports_batch() {
        backend.translate_many(&batch, params).await?
    } else {
        fan_out(&backend, &batch, params).await?
    };

    if translated.len() != batch.len() {
        return Err(Error::data_integrity(format!(
            "backend returned {} translations for {} texts",
            translated.len(),
            batch.len()
        )));
    }
    Ok(translated)
}

async fn fan_out(
    backend: &Arc<dyn Backend>,
    batch: &[String],
    params: &TranslationParams,
) -> Result<Vec<String>, Error> {
    let mut tasks = JoinSet::new();
    for (index, text) in batch.iter().cloned().enumerate() {
        let backend = Arc::clone(backend);
        let params = params.clone();
        tasks.spawn(async move { (index, backend.translate_one(&text, &params).await) });
    }

    let mut slots: Vec<Option<String>> = vec![None; batch.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, result) =
            joined.map_err(|e| Error::Scheduler(format!("translation worker failed: {e}")))?;
        slots[index] = Some(result?);
    }
    slots
        .into_iter()
        .map(|slot| slot.ok_or_else(|| Error::Scheduler("missing single-text result".into())))
        .collect()
}
