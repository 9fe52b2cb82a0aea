//! Completion envelope returned by providers
//!
//! Mirrors the content-block shape of the Anthropic Messages API; other
//! providers map their responses into it.

use serde::{Deserialize, Serialize};

/// A typed block of generated content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain generated text
    Text { text: String },
    /// A tool invocation requested by the model
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },
    /// Any block type this crate does not understand
    #[serde(other)]
    Unknown,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

impl Usage {
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Raw structured response of a completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEnvelope {
    /// Provider-assigned message id
    #[serde(default)]
    pub id: Option<String>,
    /// Model that produced the response
    #[serde(default)]
    pub model: String,
    /// Zero or more typed content blocks
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Why generation stopped
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// Tokens used (if available)
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl CompletionEnvelope {
    /// Envelope holding a single text block
    pub fn from_text(model: &str, text: impl Into<String>) -> Self {
        Self {
            id: None,
            model: model.to_string(),
            content: vec![ContentBlock::text(text)],
            stop_reason: Some("end_turn".to_string()),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn tokens_used(&self) -> u32 {
        self.usage.map(|u| u.total()).unwrap_or(0)
    }
}

/// Text of the first content block, if that block is text.
///
/// Missing envelopes, empty content and non-text first blocks all yield
/// `None`.
pub fn extract_text(envelope: Option<&CompletionEnvelope>) -> Option<String> {
    envelope?
        .content
        .first()
        .and_then(ContentBlock::as_text)
        .map(str::to_string)
}
