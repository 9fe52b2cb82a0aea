//! OpenAI LLM provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{ConfigError, LlmConfig, OPENAI_BASE_URL};
use crate::envelope::{CompletionEnvelope, ContentBlock, Usage};
use crate::provider::{LlmError, LlmProvider, LlmRequest, Role};

/// OpenAI API request format
#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: Role,
    content: &'a str,
}

/// OpenAI API response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    id: Option<String>,
    choices: Vec<Choice>,
    model: String,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl From<OpenAIResponse> for CompletionEnvelope {
    fn from(response: OpenAIResponse) -> Self {
        let first = response.choices.into_iter().next();
        let stop_reason = first.as_ref().and_then(|c| c.finish_reason.clone());
        let content = first
            .and_then(|c| c.message.content)
            .map(|text| vec![ContentBlock::Text { text }])
            .unwrap_or_default();

        CompletionEnvelope {
            id: response.id,
            model: response.model,
            content,
            stop_reason,
            usage: response.usage.map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        }
    }
}

/// OpenAI provider
#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    /// API key
    api_key: String,
    /// Organization header (optional)
    organization: Option<String>,
    /// Model used when a request leaves it empty
    default_model: String,
    /// HTTP client
    client: reqwest::Client,
    /// Base URL
    base_url: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            organization: None,
            default_model: model.to_string(),
            client: reqwest::Client::new(),
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    /// Create with GPT-4
    pub fn gpt4(api_key: &str) -> Self {
        Self::new(api_key, "gpt-4")
    }

    /// Create from configuration; fails before any network call if the key
    /// is missing
    pub fn from_config(config: &LlmConfig) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key("openai")?;
        Ok(Self {
            api_key: api_key.to_string(),
            organization: config.openai_org.clone(),
            default_model: "gpt-4".to_string(),
            client: config.http_client()?,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_body<'a>(&'a self, request: &'a LlmRequest) -> OpenAIRequest<'a> {
        // Chat completions take system turns inline
        OpenAIRequest {
            model: request.params.model_or(&self.default_model),
            messages: request
                .messages
                .iter()
                .map(|m| Message {
                    role: m.role,
                    content: &m.content,
                })
                .collect(),
            temperature: request.params.temperature,
            max_tokens: request.params.max_tokens,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/v1/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    async fn complete(&self, request: LlmRequest) -> Result<CompletionEnvelope, LlmError> {
        let start = Instant::now();
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_body(&request);

        let mut builder = self.client.post(&url).bearer_auth(&self.api_key);
        if let Some(org) = &self.organization {
            builder = builder.header("OpenAI-Organization", org);
        }

        let response = builder
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

        let api_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let envelope = CompletionEnvelope::from(api_response);
        tracing::debug!(
            model = %envelope.model,
            tokens = envelope.tokens_used(),
            latency_ms = start.elapsed().as_millis() as u64,
            "OpenAI request complete"
        );

        Ok(envelope)
    }
}
