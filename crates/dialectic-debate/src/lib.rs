//! # Dialectic Debate
//!
//! Structured debates between two LLM agents, scored by a third.
//!
//! Agent A argues for a topic and agent B against it. After the configured
//! number of rounds a judge agent scores the exchange on four criteria and
//! names a winner.
//!
//! ## Key Types
//!
//! - [`DebateOrchestrator`] - runs rounds, judging and transcript saving
//! - [`DebateConfig`] - rounds, sampling parameters, rubric, scheduling
//! - [`JudgmentResult`] - parsed scores and verdict
//! - [`DebateRecord`] - the JSON transcript written to disk
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use dialectic_debate::{DebateConfig, DebateOrchestrator};
//! use dialectic_llm::MockProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let config = DebateConfig::default().with_rounds(2);
//! let mut orchestrator =
//!     DebateOrchestrator::with_shared_provider(config, Arc::new(MockProvider::smart())).unwrap();
//!
//! let result = orchestrator
//!     .conduct_debate("Was congestion pricing successful in London?")
//!     .await
//!     .unwrap();
//!
//! assert_eq!(result.debate_history.len(), 4);
//! assert!(result.judgment.final_judgment.is_found());
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod parsing;
pub mod prompts;
pub mod transcript;

pub use agent::{AgentHandle, AgentRole, AgentTag};
pub use config::{DebateConfig, ExecutionMode};
pub use error::{DebateError, TranscriptError};
pub use orchestrator::{DebateOrchestrator, DebatePhase};
pub use parsing::{
    extract_scores, extract_text, extract_verdict, parse_judgment, CriteriaScores, Criterion,
    JudgmentResult, Verdict, NO_VERDICT_FOUND, VERDICT_PARSE_ERROR,
};
pub use prompts::{
    debate_summary, judgment_prompt, rebuttal_prompt, stance_prompt, Stance,
    DEFAULT_JUDGE_CRITERIA,
};
pub use transcript::{
    DebateRecord, DebateResult, JudgmentRecord, RecordMetadata, RecordStatus, TranscriptEntry,
};
