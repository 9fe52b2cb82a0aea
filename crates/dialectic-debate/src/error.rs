//! Error types for debate orchestration

use thiserror::Error;

use dialectic_llm::LlmError;

use crate::agent::AgentRole;
use crate::orchestrator::DebatePhase;
use crate::transcript::TranscriptEntry;

/// Errors reading or writing transcript files
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that can occur while running a debate
#[derive(Debug, Error)]
pub enum DebateError {
    /// Configuration rejected before any call was made
    #[error("Invalid debate configuration: {0}")]
    InvalidConfig(String),

    #[error("Debate topic must not be empty")]
    EmptyTopic,

    /// An agent call failed; the rounds completed before it are kept
    #[error("{role} failed during {phase}: {source}")]
    AgentFailed {
        phase: DebatePhase,
        role: AgentRole,
        #[source]
        source: LlmError,
        partial_history: Vec<TranscriptEntry>,
    },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Nothing to save because no debate has been started
    #[error("No debate has been conducted yet")]
    NoDebate,

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl DebateError {
    /// Transcript entries collected before the failure, if any
    pub fn partial_history(&self) -> Option<&[TranscriptEntry]> {
        match self {
            DebateError::AgentFailed {
                partial_history, ..
            } => Some(partial_history),
            _ => None,
        }
    }

    /// Number of rounds fully recorded before the failure
    pub fn completed_rounds(&self) -> u32 {
        self.partial_history()
            .map(|history| (history.len() / 2) as u32)
            .unwrap_or(0)
    }
}
