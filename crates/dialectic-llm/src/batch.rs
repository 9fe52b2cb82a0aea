//! Bounded-concurrency batch completion

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::envelope::CompletionEnvelope;
use crate::metrics::global_metrics;
use crate::provider::{ChatMessage, CompletionParams, LlmProvider, LlmRequest};

/// Default cap on simultaneous in-flight requests
pub const DEFAULT_MAX_CONCURRENCY: usize = 100;

/// Run one completion per conversation, at most `max_concurrency` at a time.
///
/// Results keep the input order. A failed request yields `None` in its slot
/// and never aborts the rest of the batch. A `max_concurrency` of zero is
/// treated as one.
pub async fn complete_batch<P>(
    provider: &P,
    conversations: Vec<Vec<ChatMessage>>,
    params: &CompletionParams,
    max_concurrency: usize,
) -> Vec<Option<CompletionEnvelope>>
where
    P: LlmProvider + ?Sized,
{
    let limit = max_concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(limit));
    let metrics = global_metrics();

    debug!(
        provider = provider.name(),
        requests = conversations.len(),
        max_concurrency = limit,
        "Starting batch completion"
    );

    let futures = conversations.into_iter().enumerate().map(|(index, messages)| {
        let semaphore = semaphore.clone();
        let metrics = metrics.clone();
        let request = LlmRequest::new(messages, params.clone());
        async move {
            // acquire only fails on a closed semaphore
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!(index, error = %e, "Batch gate closed, returning None");
                    metrics.record_batch_item(false);
                    return None;
                }
            };

            match provider.complete(request).await {
                Ok(envelope) => {
                    metrics.record_llm_call(envelope.tokens_used() as u64, false);
                    metrics.record_batch_item(true);
                    Some(envelope)
                }
                Err(e) => {
                    warn!(index, error = %e, "Batch completion failed, returning None");
                    metrics.record_llm_call(0, true);
                    metrics.record_batch_item(false);
                    None
                }
            }
        }
    });

    futures::future::join_all(futures).await
}
