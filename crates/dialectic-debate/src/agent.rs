//! Debate roles and the provider handle bound to each

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use dialectic_llm::{
    extract_text, global_metrics, ChatMessage, CompletionParams, LlmError, LlmProvider,
    LlmRequest,
};

use crate::prompts::Stance;

/// Transcript label of a debater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentTag {
    A,
    B,
}

impl fmt::Display for AgentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentTag::A => f.write_str("A"),
            AgentTag::B => f.write_str("B"),
        }
    }
}

/// Conversational role an agent plays in a debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Agent A, argues the supporting side
    Proponent,
    /// Agent B, argues the opposing side
    Opponent,
    Judge,
}

impl AgentRole {
    /// Transcript tag, `None` for the judge
    pub fn tag(&self) -> Option<AgentTag> {
        match self {
            AgentRole::Proponent => Some(AgentTag::A),
            AgentRole::Opponent => Some(AgentTag::B),
            AgentRole::Judge => None,
        }
    }

    /// Opening stance, `None` for the judge
    pub fn stance(&self) -> Option<Stance> {
        match self {
            AgentRole::Proponent => Some(Stance::Supporting),
            AgentRole::Opponent => Some(Stance::Opposing),
            AgentRole::Judge => None,
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentRole::Proponent => f.write_str("proponent (A)"),
            AgentRole::Opponent => f.write_str("opponent (B)"),
            AgentRole::Judge => f.write_str("judge"),
        }
    }
}

/// A completion provider bound to one role
#[derive(Debug, Clone)]
pub struct AgentHandle {
    role: AgentRole,
    provider: Arc<dyn LlmProvider>,
}

impl AgentHandle {
    pub fn new(role: AgentRole, provider: Arc<dyn LlmProvider>) -> Self {
        Self { role, provider }
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Send a single-turn prompt and return the generated text.
    ///
    /// A response without a leading text block degrades to an empty string.
    pub async fn respond(&self, prompt: &str, params: &CompletionParams) -> Result<String, LlmError> {
        let metrics = global_metrics();
        let request = LlmRequest::new(vec![ChatMessage::user(prompt)], params.clone());

        let envelope = match self.provider.complete(request).await {
            Ok(envelope) => envelope,
            Err(e) => {
                metrics.record_llm_call(0, true);
                return Err(e);
            }
        };
        metrics.record_llm_call(envelope.tokens_used() as u64, false);

        match extract_text(Some(&envelope)) {
            Some(text) => Ok(text),
            None => {
                tracing::warn!(
                    role = %self.role,
                    provider = self.provider.name(),
                    "Response carried no text, using empty content"
                );
                metrics.record_parse_degradation();
                Ok(String::new())
            }
        }
    }
}
