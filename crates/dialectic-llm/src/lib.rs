//! # Dialectic LLM
//!
//! Completion providers used by Dialectic debate agents.
//!
//! ## Supported Backends
//!
//! | Provider | Type | Key Required |
//! |----------|------|--------------|
//! | Anthropic | API | `ANTHROPIC_API_KEY` |
//! | OpenAI | API | `OPENAI_API_KEY` |
//! | Mock | Testing | None |
//!
//! ## Quick Start
//!
//! ```rust
//! use dialectic_llm::{MockProvider, LlmProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Use mock provider for testing
//!     let llm = MockProvider::smart();
//!
//!     let response = llm.ask("Your stance: supporting").await.unwrap();
//!     println!("{}", response);
//! }
//! ```
//!
//! ## With Anthropic
//!
//! ```rust,ignore
//! use dialectic_llm::{AnthropicProvider, LlmConfig};
//!
//! let config = LlmConfig::load()?;
//! let llm = AnthropicProvider::from_config(&config)?;
//!
//! let response = llm.ask("Explain congestion pricing").await?;
//! ```
//!
//! ## Batches
//!
//! ```rust
//! use dialectic_llm::{complete_batch, ChatMessage, CompletionParams, MockProvider};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let llm = MockProvider::constant("ok");
//! let batch = vec![vec![ChatMessage::user("a")], vec![ChatMessage::user("b")]];
//! let results = complete_batch(&llm, batch, &CompletionParams::default(), 8).await;
//! assert!(results.iter().all(Option::is_some));
//! # }
//! ```

pub mod anthropic;
pub mod batch;
pub mod blocking;
pub mod config;
pub mod envelope;
pub mod metrics;
pub mod mock;
pub mod openai;
pub mod provider;
pub mod router;

pub use anthropic::AnthropicProvider;
pub use batch::{complete_batch, DEFAULT_MAX_CONCURRENCY};
pub use blocking::BlockingProvider;
pub use config::{ConfigError, LlmConfig};
pub use envelope::{extract_text, CompletionEnvelope, ContentBlock, Usage};
pub use metrics::{global_metrics, Metrics, MetricsSnapshot};
pub use mock::MockProvider;
pub use openai::OpenAIProvider;
pub use provider::{
    split_system, ChatMessage, CompletionParams, LlmError, LlmProvider, LlmRequest, Role,
    DEFAULT_MODEL,
};
pub use router::{build_provider, provider_for_model, ProviderKind};
