//! Anthropic Messages API provider

use async_trait::async_trait;
use serde::Serialize;
use std::time::Instant;

use crate::config::{ConfigError, LlmConfig, ANTHROPIC_BASE_URL};
use crate::envelope::CompletionEnvelope;
use crate::provider::{split_system, ChatMessage, LlmError, LlmProvider, LlmRequest, DEFAULT_MODEL};

const API_VERSION: &str = "2023-06-01";

/// Anthropic API request format
#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

/// Anthropic provider
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    /// API key
    api_key: String,
    /// Model used when a request leaves it empty
    default_model: String,
    /// HTTP client
    client: reqwest::Client,
    /// Base URL
    base_url: String,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            client: reqwest::Client::new(),
            base_url: ANTHROPIC_BASE_URL.to_string(),
        }
    }

    /// Create from configuration; fails before any network call if the key
    /// is missing
    pub fn from_config(config: &LlmConfig) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key("anthropic")?;
        Ok(Self {
            api_key: api_key.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            client: config.http_client()?,
            base_url: config.anthropic_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_default_model(mut self, model: &str) -> Self {
        self.default_model = model.to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_body<'a>(&'a self, request: &'a LlmRequest) -> Result<AnthropicRequest<'a>, LlmError> {
        let (system, messages) = split_system(&request.messages);

        if messages.is_empty() {
            return Err(LlmError::RequestFailed(
                "Request has no user or assistant messages".to_string(),
            ));
        }

        Ok(AnthropicRequest {
            model: request.params.model_or(&self.default_model),
            max_tokens: request.params.max_tokens,
            temperature: request.params.temperature,
            messages,
            system,
        })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/v1/models", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    async fn complete(&self, request: LlmRequest) -> Result<CompletionEnvelope, LlmError> {
        let start = Instant::now();
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_body(&request)?;

        tracing::debug!(
            model = body.model,
            messages = body.messages.len(),
            max_tokens = body.max_tokens,
            "Sending Anthropic request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::RequestFailed(format!(
                "Status: {}, Body: {}",
                status, body
            )));
        }

        let envelope: CompletionEnvelope = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            model = %envelope.model,
            tokens = envelope.tokens_used(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Anthropic request complete"
        );

        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::CompletionParams;

    #[test]
    fn test_from_config_requires_key() {
        let err = AnthropicProvider::from_config(&LlmConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_body_moves_system_prompt() {
        let provider = AnthropicProvider::new("sk-ant-test");
        let request = LlmRequest::new(
            vec![
                ChatMessage::system("You are a debate judge."),
                ChatMessage::user("Score this."),
            ],
            CompletionParams::new("claude-3-haiku-20240307", 500, 0.2),
        );

        let body = provider.build_body(&request).unwrap();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["system"], "You are a debate judge.");
        assert_eq!(json["model"], "claude-3-haiku-20240307");
        assert_eq!(json["max_tokens"], 500);
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_body_omits_absent_system_and_uses_default_model() {
        let provider = AnthropicProvider::new("sk-ant-test").with_default_model("claude-3-opus");
        let request = LlmRequest::new(
            vec![ChatMessage::user("Hi")],
            CompletionParams::new("", 10, 1.0),
        );

        let json = serde_json::to_value(provider.build_body(&request).unwrap()).unwrap();
        assert!(json.get("system").is_none());
        assert_eq!(json["model"], "claude-3-opus");
    }

    #[test]
    fn test_body_drops_later_system_messages() {
        let provider = AnthropicProvider::new("sk-ant-test");
        let request = LlmRequest::new(
            vec![
                ChatMessage::user("Opening"),
                ChatMessage::system("Mid-conversation note"),
                ChatMessage::assistant("Reply"),
            ],
            CompletionParams::default(),
        );

        let json = serde_json::to_value(provider.build_body(&request).unwrap()).unwrap();

        assert!(json.get("system").is_none());
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[1]["content"], "Reply");
    }

    #[test]
    fn test_body_rejects_system_only_request() {
        let provider = AnthropicProvider::new("sk-ant-test");
        let request = LlmRequest::new(
            vec![ChatMessage::system("alone")],
            CompletionParams::default(),
        );
        assert!(matches!(
            provider.build_body(&request),
            Err(LlmError::RequestFailed(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires valid API key
    async fn test_anthropic() {
        let api_key = std::env::var("ANTHROPIC_API_KEY").expect("ANTHROPIC_API_KEY not set");
        let provider = AnthropicProvider::new(&api_key);

        let response = provider.ask("Say hello in one word").await.unwrap();
        assert!(!response.is_empty());
    }
}
