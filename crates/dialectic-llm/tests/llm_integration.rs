//! Provider integration tests
//!
//! Tests against real APIs are marked with #[ignore] and require:
//! - ANTHROPIC_API_KEY for Anthropic tests
//! - OPENAI_API_KEY for OpenAI tests
//!
//! Run with: cargo test -p dialectic-llm --test llm_integration -- --ignored

use std::sync::Arc;
use std::time::Duration;

use dialectic_llm::{
    complete_batch, extract_text, AnthropicProvider, BlockingProvider, ChatMessage,
    CompletionParams, LlmConfig, LlmProvider, LlmRequest, MockProvider, OpenAIProvider,
};

fn conversation(prompt: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(prompt)]
}

/// One failing request among five leaves the other four intact
#[tokio::test]
async fn test_batch_isolates_failures() {
    let mock = MockProvider::constant("fine").fail_on("poison");
    let batch = vec![
        conversation("one"),
        conversation("two"),
        conversation("poison pill"),
        conversation("four"),
        conversation("five"),
    ];

    let results = complete_batch(&mock, batch, &CompletionParams::default(), 2).await;

    assert_eq!(results.len(), 5);
    assert_eq!(results.iter().filter(|r| r.is_none()).count(), 1);
    assert!(results[2].is_none(), "failure should stay in its own slot");
    for index in [0, 1, 3, 4] {
        assert_eq!(extract_text(results[index].as_ref()).as_deref(), Some("fine"));
    }
}

/// A batch larger than the gate never exceeds the gate in flight
#[tokio::test]
async fn test_batch_respects_max_concurrency() {
    let mock = MockProvider::constant("ok").with_latency(Duration::from_millis(30));
    let batch: Vec<_> = (0..12).map(|i| conversation(&format!("q{}", i))).collect();

    let results = complete_batch(&mock, batch, &CompletionParams::default(), 3).await;

    assert!(results.iter().all(Option::is_some));
    assert_eq!(mock.call_count(), 12);
    assert!(
        mock.peak_concurrency() <= 3,
        "peak concurrency {} exceeded gate",
        mock.peak_concurrency()
    );
    assert!(mock.peak_concurrency() >= 2, "requests should overlap");
}

/// Batch requests carry the shared sampling parameters
#[tokio::test]
async fn test_batch_forwards_params() {
    let mock = MockProvider::constant("ok");
    let params = CompletionParams::new("claude-3-haiku-20240307", 256, 0.1);

    complete_batch(&mock, vec![conversation("a")], &params, 1).await;

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].params, params);
}

/// Blocking form works through a trait object
#[test]
fn test_blocking_provider_with_mock() {
    let provider = BlockingProvider::new(Arc::new(MockProvider::smart())).unwrap();
    let envelope = provider
        .complete(LlmRequest::simple("Your stance: opposing"))
        .unwrap();
    assert!(extract_text(Some(&envelope)).unwrap().contains("does not hold"));
}

/// Missing credentials fail before any request is made
#[test]
fn test_missing_credentials_fail_eagerly() {
    let config = LlmConfig::default();
    assert!(AnthropicProvider::from_config(&config).is_err());
    assert!(OpenAIProvider::from_config(&config).is_err());
}

/// Test Anthropic provider with real API
#[tokio::test]
#[ignore = "Requires ANTHROPIC_API_KEY"]
async fn test_anthropic_real_request() {
    let config = LlmConfig::load().expect("config should load");
    let provider = AnthropicProvider::from_config(&config).expect("ANTHROPIC_API_KEY must be set");

    let request = LlmRequest::new(
        vec![
            ChatMessage::system("You are a helpful assistant. Be extremely concise."),
            ChatMessage::user("What is 2 + 2? Answer with just the number."),
        ],
        CompletionParams::new("claude-3-haiku-20240307", 10, 0.0),
    );

    let envelope = provider.complete(request).await.expect("request should succeed");
    let text = extract_text(Some(&envelope)).expect("response should have text");
    assert!(text.contains('4'));
}

/// Test OpenAI provider with real API
#[tokio::test]
#[ignore = "Requires OPENAI_API_KEY"]
async fn test_openai_real_request() {
    let config = LlmConfig::load().expect("config should load");
    let provider = OpenAIProvider::from_config(&config).expect("OPENAI_API_KEY must be set");

    let content = provider.ask("Say 'hello' in one word").await.unwrap();
    assert!(!content.is_empty());
}
