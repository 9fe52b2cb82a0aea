//! Blocking wrapper around an async provider

use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

use crate::envelope::CompletionEnvelope;
use crate::provider::{LlmError, LlmProvider, LlmRequest};

/// Drives an [`LlmProvider`] on a private current-thread runtime.
///
/// Must not be called from inside another Tokio runtime.
#[derive(Debug)]
pub struct BlockingProvider {
    inner: Arc<dyn LlmProvider>,
    runtime: Runtime,
}

impl BlockingProvider {
    pub fn new(inner: Arc<dyn LlmProvider>) -> Result<Self, LlmError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Runtime(e.to_string()))?;
        Ok(Self { inner, runtime })
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Generate a completion, blocking until it finishes
    pub fn complete(&self, request: LlmRequest) -> Result<CompletionEnvelope, LlmError> {
        self.runtime.block_on(self.inner.complete(request))
    }

    /// Blocking form of [`LlmProvider::ask`]
    pub fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        self.runtime.block_on(self.inner.ask(prompt))
    }
}
