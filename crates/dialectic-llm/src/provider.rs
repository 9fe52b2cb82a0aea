//! LLM Provider trait and common types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::envelope::{extract_text, CompletionEnvelope};

/// Model used when a request does not name one
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";

/// Errors from LLM providers
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Provider not available")]
    NotAvailable,
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl LlmError {
    /// Whether this error was raised before any request was attempted
    pub fn is_configuration(&self) -> bool {
        matches!(self, LlmError::Configuration(_))
    }
}

/// Conversational role of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters shared by every message sequence of a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionParams {
    /// Model identifier; empty means "provider default"
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Temperature (0.0 = deterministic, 1.0 = creative)
    pub temperature: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

impl CompletionParams {
    pub fn new(model: &str, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model: model.to_string(),
            max_tokens,
            temperature,
        }
    }

    /// Resolve the model to send, falling back to the provider default
    pub fn model_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.model.trim().is_empty() {
            fallback
        } else {
            &self.model
        }
    }
}

/// A request to an LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRequest {
    /// Role-tagged conversation
    pub messages: Vec<ChatMessage>,
    /// Model and sampling parameters
    pub params: CompletionParams,
}

impl LlmRequest {
    pub fn new(messages: Vec<ChatMessage>, params: CompletionParams) -> Self {
        Self { messages, params }
    }

    /// Create a simple single-turn request with default settings
    pub fn simple(prompt: &str) -> Self {
        Self::new(vec![ChatMessage::user(prompt)], CompletionParams::default())
    }

    /// Create a single-turn request with a system instruction
    pub fn with_role(system: &str, prompt: &str) -> Self {
        Self::new(
            vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            CompletionParams::default(),
        )
    }

    /// Text of the last user message, if any
    pub fn last_user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// Split a conversation into the system instruction and the remaining turns.
///
/// Only a system message in first position becomes the instruction; system
/// messages are never forwarded as conversation turns.
pub fn split_system(messages: &[ChatMessage]) -> (Option<String>, Vec<ChatMessage>) {
    let system = messages
        .first()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.clone());

    let turns = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .cloned()
        .collect();

    (system, turns)
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Check if the provider is available
    async fn is_available(&self) -> bool;

    /// Generate a completion
    async fn complete(&self, request: LlmRequest) -> Result<CompletionEnvelope, LlmError>;

    /// Generate with a simple prompt (convenience method)
    async fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        let envelope = self.complete(LlmRequest::simple(prompt)).await?;
        Ok(extract_text(Some(&envelope)).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_system_extracts_leading_instruction() {
        let messages = vec![
            ChatMessage::system("Be terse."),
            ChatMessage::user("Hello"),
            ChatMessage::assistant("Hi"),
        ];

        let (system, turns) = split_system(&messages);
        assert_eq!(system.as_deref(), Some("Be terse."));
        assert_eq!(turns.len(), 2);
        assert!(turns.iter().all(|m| m.role != Role::System));
    }

    #[test]
    fn test_split_system_ignores_late_system_message() {
        let messages = vec![ChatMessage::user("Hello"), ChatMessage::system("late")];

        let (system, turns) = split_system(&messages);
        assert!(system.is_none());
        assert_eq!(turns, vec![ChatMessage::user("Hello")]);
    }

    #[test]
    fn test_model_fallback() {
        let params = CompletionParams::new("", 10, 0.0);
        assert_eq!(params.model_or("gpt-4"), "gpt-4");

        let params = CompletionParams::new("claude-3-haiku-20240307", 10, 0.0);
        assert_eq!(params.model_or("gpt-4"), "claude-3-haiku-20240307");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::user("x")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"x"}"#);
    }
}
