//! Mock LLM provider for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::envelope::{CompletionEnvelope, Usage};
use crate::provider::{LlmError, LlmProvider, LlmRequest};

/// A mock LLM provider that returns predefined responses.
///
/// Also records every request it receives and the highest number of requests
/// it saw in flight at once, so tests can assert on prompts and concurrency.
#[derive(Debug)]
pub struct MockProvider {
    /// Name of this mock
    pub name: String,
    /// Canned responses (cycles through them)
    responses: Vec<String>,
    /// Current response index
    index: AtomicUsize,
    /// Simulated latency in ms
    latency_ms: u64,
    /// Fail any request whose last user prompt contains this marker
    fail_marker: Option<String>,
    /// Fail every request
    always_fail: bool,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with given responses
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            name: "mock".to_string(),
            responses,
            index: AtomicUsize::new(0),
            latency_ms: 10,
            fail_marker: None,
            always_fail: false,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns the same response
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Create a smart mock that answers debate, rebuttal and judging prompts
    pub fn smart() -> Self {
        let mut mock = Self::new(vec![]);
        mock.name = "smart-mock".to_string();
        mock
    }

    /// Create a mock whose every request fails
    pub fn failing() -> Self {
        let mut mock = Self::new(vec![]);
        mock.always_fail = true;
        mock
    }

    /// Fail requests whose last user prompt contains `marker`
    pub fn fail_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    /// Set simulated latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_ms = latency.as_millis() as u64;
        self
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.lock_requests().len()
    }

    /// Copy of every request received so far, in arrival order
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.lock_requests().clone()
    }

    /// Last user prompt of every request received so far
    pub fn prompts(&self) -> Vec<String> {
        self.lock_requests()
            .iter()
            .filter_map(|r| r.last_user_prompt().map(str::to_string))
            .collect()
    }

    /// Highest number of concurrently running requests observed
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<LlmRequest>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn should_fail(&self, request: &LlmRequest) -> bool {
        if self.always_fail {
            return true;
        }
        match (&self.fail_marker, request.last_user_prompt()) {
            (Some(marker), Some(prompt)) => prompt.contains(marker.as_str()),
            _ => false,
        }
    }

    fn generate_smart_response(&self, prompt: &str) -> String {
        let prompt_lower = prompt.to_lowercase();

        if prompt_lower.contains("impartial judge") {
            return "SCORES:\n\
                 Evidence Quality: 7/10\n\
                 Logical Consistency: 8/10\n\
                 Counterargument Handling: 6/10\n\
                 Clarity: 9/10\n\n\
                 EXPLANATIONS:\n\
                 Both sides cited evidence; Agent A tied it more closely to the claim.\n\n\
                 VERDICT: Agent A (supporting) presented the stronger case\n\
                 Agent A's evidence was more specific and better defended."
                .to_string();
        }

        if prompt_lower.contains("respond to the following argument") {
            return "Direct response: the argument overstates its evidence.\n\
                 New evidence: independent studies show mixed results.\n\
                 Logical challenge: correlation is presented as causation.\n\
                 Reinforcement: my original position stands."
                .to_string();
        }

        if prompt_lower.contains("your stance: supporting") {
            return "Main claim: the proposition holds.\n\
                 Supporting evidence: measured outcomes improved after adoption.\n\
                 Counterarguments: critics cite costs, which were offset by gains.\n\
                 Conclusion: the evidence favours the proposition."
                .to_string();
        }

        if prompt_lower.contains("your stance: opposing") {
            return "Main claim: the proposition does not hold.\n\
                 Supporting evidence: gains faded once external factors are controlled for.\n\
                 Counterarguments: early improvements were real but temporary.\n\
                 Conclusion: the evidence does not support the proposition."
                .to_string();
        }

        let preview: String = prompt.chars().take(50).collect();
        format!(
            "I understand you're asking about: \"{}\"\n\n\
             - The request has been processed\n\
             - Analysis complete",
            preview
        )
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn complete(&self, request: LlmRequest) -> Result<CompletionEnvelope, LlmError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        self.lock_requests().push(request.clone());

        // Simulate latency
        tokio::time::sleep(Duration::from_millis(self.latency_ms)).await;

        if self.should_fail(&request) {
            return Err(LlmError::RequestFailed("mock failure".to_string()));
        }

        let prompt = request.last_user_prompt().unwrap_or_default();
        let content = if self.responses.is_empty() {
            self.generate_smart_response(prompt)
        } else {
            // Cycle through canned responses
            let idx = self.index.fetch_add(1, Ordering::Relaxed);
            self.responses[idx % self.responses.len()].clone()
        };

        let usage = Usage {
            input_tokens: (prompt.len() / 4) as u32,
            output_tokens: (content.len() / 4) as u32,
        };
        Ok(CompletionEnvelope::from_text(&self.name, content).with_usage(usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider() {
        let mock = MockProvider::constant("Hello, world!");
        let response = mock.ask("test").await.unwrap();
        assert_eq!(response, "Hello, world!");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_smart_mock_judges() {
        let mock = MockProvider::smart();
        let response = mock
            .ask("You are serving as an impartial judge for the following debate")
            .await
            .unwrap();
        assert!(response.contains("VERDICT:"));
        assert!(response.contains("Evidence Quality: 7/10"));
    }

    #[tokio::test]
    async fn test_fail_marker() {
        let mock = MockProvider::constant("ok").fail_on("boom");
        assert!(mock.ask("fine").await.is_ok());
        assert!(matches!(
            mock.ask("this goes boom").await,
            Err(LlmError::RequestFailed(_))
        ));
        assert_eq!(mock.prompts(), vec!["fine".to_string(), "this goes boom".to_string()]);
    }

    #[tokio::test]
    async fn test_canned_responses_cycle() {
        let mock = MockProvider::new(vec!["one".into(), "two".into()]);
        assert_eq!(mock.ask("a").await.unwrap(), "one");
        assert_eq!(mock.ask("b").await.unwrap(), "two");
        assert_eq!(mock.ask("c").await.unwrap(), "one");
    }
}
