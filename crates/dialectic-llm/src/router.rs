//! Provider selection by model name

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::anthropic::AnthropicProvider;
use crate::config::{ConfigError, LlmConfig};
use crate::mock::MockProvider;
use crate::openai::OpenAIProvider;
use crate::provider::{LlmError, LlmProvider};

/// Known provider backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    OpenAI,
    Mock,
}

impl ProviderKind {
    /// Infer the backend from a model identifier
    pub fn from_model(model: &str) -> Option<Self> {
        let model = model.to_lowercase();
        if model.contains("claude") {
            Some(ProviderKind::Anthropic)
        } else if model.starts_with("gpt") || model.starts_with("o1") || model.starts_with("o3") {
            Some(ProviderKind::OpenAI)
        } else if model.starts_with("mock") {
            Some(ProviderKind::Mock)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAI => "openai",
            ProviderKind::Mock => "mock",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(ProviderKind::Anthropic),
            "openai" => Ok(ProviderKind::OpenAI),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(ConfigError::Invalid(format!("Unknown provider: {}", other))),
        }
    }
}

/// Construct a fresh provider of the given kind.
///
/// Each call returns an independent instance, so the handles of a debate never
/// share client state.
pub fn build_provider(
    kind: ProviderKind,
    config: &LlmConfig,
) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider: Arc<dyn LlmProvider> = match kind {
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::from_config(config)?),
        ProviderKind::OpenAI => Arc::new(OpenAIProvider::from_config(config)?),
        ProviderKind::Mock => Arc::new(MockProvider::smart()),
    };
    Ok(provider)
}

/// Construct the provider serving `model`
pub fn provider_for_model(model: &str, config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let kind = ProviderKind::from_model(model).ok_or_else(|| {
        ConfigError::Invalid(format!("No provider known for model '{}'", model))
    })?;
    build_provider(kind, config)
}
