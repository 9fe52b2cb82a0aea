//! Debate orchestration: rounds, judging and transcript persistence

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use uuid::Uuid;

use dialectic_llm::{
    global_metrics, provider_for_model, CompletionParams, LlmConfig, LlmError, LlmProvider,
};

use crate::agent::{AgentHandle, AgentRole, AgentTag};
use crate::config::{DebateConfig, ExecutionMode};
use crate::error::DebateError;
use crate::parsing::parse_judgment;
use crate::prompts::{debate_summary, judgment_prompt, rebuttal_prompt, stance_prompt};
use crate::transcript::{DebateRecord, DebateResult, TranscriptEntry};

/// Where an orchestrator is in its current debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebatePhase {
    #[default]
    NotStarted,
    /// Round in progress (1-based)
    Round(u32),
    Judging,
    Done,
    Failed,
}

impl DebatePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DebatePhase::Done | DebatePhase::Failed)
    }
}

impl fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebatePhase::NotStarted => f.write_str("not started"),
            DebatePhase::Round(n) => write!(f, "round {}", n),
            DebatePhase::Judging => f.write_str("judging"),
            DebatePhase::Done => f.write_str("done"),
            DebatePhase::Failed => f.write_str("failed"),
        }
    }
}

/// Runs proponent/opponent debates and has a third agent judge them.
///
/// The config and the three agent handles are fixed for the orchestrator's
/// lifetime. History is cleared at the start of every debate.
#[derive(Debug)]
pub struct DebateOrchestrator {
    config: DebateConfig,
    params: CompletionParams,
    proponent: AgentHandle,
    opponent: AgentHandle,
    judge: AgentHandle,
    topic: Option<String>,
    history: Vec<TranscriptEntry>,
    last_result: Option<DebateResult>,
    phase: DebatePhase,
}

impl DebateOrchestrator {
    /// Create an orchestrator from three independently built providers
    pub fn new(
        config: DebateConfig,
        proponent: Arc<dyn LlmProvider>,
        opponent: Arc<dyn LlmProvider>,
        judge: Arc<dyn LlmProvider>,
    ) -> Result<Self, DebateError> {
        config.validate()?;
        let params = config.completion_params();

        Ok(Self {
            config,
            params,
            proponent: AgentHandle::new(AgentRole::Proponent, proponent),
            opponent: AgentHandle::new(AgentRole::Opponent, opponent),
            judge: AgentHandle::new(AgentRole::Judge, judge),
            topic: None,
            history: Vec::new(),
            last_result: None,
            phase: DebatePhase::NotStarted,
        })
    }

    /// Build one provider per role for the configured model.
    ///
    /// Fails immediately when the provider's credentials are missing.
    pub fn from_llm_config(config: DebateConfig, llm: &LlmConfig) -> Result<Self, DebateError> {
        config.validate()?;
        let model = config.model_name.clone();
        let proponent = provider_for_model(&model, llm)?;
        let opponent = provider_for_model(&model, llm)?;
        let judge = provider_for_model(&model, llm)?;
        tracing::debug!(model = %model, provider = proponent.name(), "Built debate agents");
        Self::new(config, proponent, opponent, judge)
    }

    /// Use one provider for all three roles
    pub fn with_shared_provider(
        config: DebateConfig,
        provider: Arc<dyn LlmProvider>,
    ) -> Result<Self, DebateError> {
        Self::new(config, provider.clone(), provider.clone(), provider)
    }

    pub fn config(&self) -> &DebateConfig {
        &self.config
    }

    pub fn phase(&self) -> DebatePhase {
        self.phase
    }

    /// Topic of the current or most recent debate
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Entries of the current or most recent debate, complete or partial
    pub fn history(&self) -> &[TranscriptEntry] {
        &self.history
    }

    /// Result of the most recent debate that reached judging
    pub fn last_result(&self) -> Option<&DebateResult> {
        self.last_result.as_ref()
    }

    /// Run a full debate on `topic` and judge it
    pub async fn conduct_debate(&mut self, topic: &str) -> Result<DebateResult, DebateError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(DebateError::EmptyTopic);
        }

        self.topic = Some(topic.to_string());
        self.history.clear();
        self.last_result = None;
        self.phase = DebatePhase::NotStarted;

        let debate_id = Uuid::new_v4();
        tracing::info!(
            %debate_id,
            topic,
            rounds = self.config.num_rounds,
            mode = %self.config.execution_mode,
            proponent = self.proponent.provider_name(),
            opponent = self.opponent.provider_name(),
            judge = self.judge.provider_name(),
            "Starting debate"
        );

        match self.run(debate_id, topic).await {
            Ok(result) => {
                self.phase = DebatePhase::Done;
                self.last_result = Some(result.clone());
                global_metrics().record_debate(true);
                tracing::info!(
                    %debate_id,
                    verdict = %result.judgment.final_judgment,
                    total_score = result.judgment.criteria_scores.total(),
                    "Debate completed"
                );
                Ok(result)
            }
            Err((role, source)) => {
                let phase = self.phase;
                self.phase = DebatePhase::Failed;
                global_metrics().record_debate(false);
                tracing::error!(
                    %debate_id,
                    %phase,
                    %role,
                    error = %source,
                    entries = self.history.len(),
                    "Debate failed"
                );
                Err(DebateError::AgentFailed {
                    phase,
                    role,
                    source,
                    partial_history: self.history.clone(),
                })
            }
        }
    }

    /// [`conduct_debate`](Self::conduct_debate) on a private current-thread
    /// runtime. Must not be called from inside an async context.
    pub fn conduct_debate_blocking(&mut self, topic: &str) -> Result<DebateResult, DebateError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DebateError::Runtime(e.to_string()))?;
        runtime.block_on(self.conduct_debate(topic))
    }

    async fn run(
        &mut self,
        debate_id: Uuid,
        topic: &str,
    ) -> Result<DebateResult, (AgentRole, LlmError)> {
        let rounds = self.config.num_rounds;

        for round in 1..=rounds {
            self.phase = DebatePhase::Round(round);

            let (prompt_a, prompt_b) = if round == 1 {
                (
                    opening_prompt(&self.proponent, topic),
                    opening_prompt(&self.opponent, topic),
                )
            } else {
                let (prev_a, prev_b) = self.previous_pair();
                (rebuttal_prompt(prev_b), rebuttal_prompt(prev_a))
            };

            let (content_a, content_b) = match self.config.execution_mode {
                ExecutionMode::Concurrent => {
                    let (response_a, response_b) = tokio::join!(
                        self.proponent.respond(&prompt_a, &self.params),
                        self.opponent.respond(&prompt_b, &self.params)
                    );
                    (
                        response_a.map_err(|e| (AgentRole::Proponent, e))?,
                        response_b.map_err(|e| (AgentRole::Opponent, e))?,
                    )
                }
                ExecutionMode::Sequential => {
                    let content_a = self
                        .proponent
                        .respond(&prompt_a, &self.params)
                        .await
                        .map_err(|e| (AgentRole::Proponent, e))?;
                    let content_b = self
                        .opponent
                        .respond(&prompt_b, &self.params)
                        .await
                        .map_err(|e| (AgentRole::Opponent, e))?;
                    (content_a, content_b)
                }
            };

            // a round is recorded only once both sides have answered
            self.history.push(TranscriptEntry::new(round, AgentTag::A, content_a));
            self.history.push(TranscriptEntry::new(round, AgentTag::B, content_b));
            tracing::info!(%debate_id, round, "Round complete");
        }

        self.phase = DebatePhase::Judging;
        let prompt = judgment_prompt(
            topic,
            &self.config.judge_criteria,
            &debate_summary(&self.history),
        );
        let raw = self
            .judge
            .respond(&prompt, &self.params)
            .await
            .map_err(|e| (AgentRole::Judge, e))?;

        let judgment = parse_judgment(&raw);
        if !judgment.final_judgment.is_found() || judgment.criteria_scores.is_empty() {
            global_metrics().record_parse_degradation();
            tracing::warn!(
                %debate_id,
                verdict = %judgment.final_judgment,
                "Judgment only partially parsed"
            );
        }

        Ok(DebateResult {
            debate_id,
            topic: topic.to_string(),
            debate_history: self.history.clone(),
            judgment,
        })
    }

    /// A and B responses of the last committed round
    fn previous_pair(&self) -> (&str, &str) {
        match self.history.rchunks_exact(2).next() {
            Some([a, b]) => (a.content.as_str(), b.content.as_str()),
            _ => ("", ""),
        }
    }

    /// Transcript of the current debate.
    ///
    /// Completed debates carry the judgment; failed ones are marked partial.
    pub fn debate_record(&self) -> Result<DebateRecord, DebateError> {
        match (&self.last_result, self.phase) {
            (Some(result), DebatePhase::Done) => Ok(DebateRecord::completed(&self.config, result)),
            (_, DebatePhase::NotStarted) => Err(DebateError::NoDebate),
            _ => {
                let topic = self.topic.as_deref().ok_or(DebateError::NoDebate)?;
                Ok(DebateRecord::partial(&self.config, topic, &self.history))
            }
        }
    }

    /// Write the current transcript as indented JSON
    pub async fn save_debate_record(&self, path: impl AsRef<Path>) -> Result<(), DebateError> {
        self.debate_record()?.save(path).await?;
        Ok(())
    }

    /// Read a transcript; the result is not attached to any orchestrator
    pub async fn load_debate_record(path: impl AsRef<Path>) -> Result<DebateRecord, DebateError> {
        Ok(DebateRecord::load(path).await?)
    }
}

/// Round-one prompt for a debater, taking the stance of its role
fn opening_prompt(handle: &AgentHandle, topic: &str) -> String {
    handle
        .role()
        .stance()
        .map(|stance| stance_prompt(topic, stance))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialectic_llm::MockProvider;

    fn smart_orchestrator(rounds: u32) -> DebateOrchestrator {
        DebateOrchestrator::with_shared_provider(
            DebateConfig::default().with_rounds(rounds),
            Arc::new(MockProvider::smart()),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_zero_rounds() {
        let result = DebateOrchestrator::with_shared_provider(
            DebateConfig::default().with_rounds(0),
            Arc::new(MockProvider::smart()),
        );
        assert!(matches!(result, Err(DebateError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_empty_topic_rejected() {
        let mut orchestrator = smart_orchestrator(1);
        let err = orchestrator.conduct_debate("   ").await.unwrap_err();
        assert!(matches!(err, DebateError::EmptyTopic));
        assert_eq!(orchestrator.phase(), DebatePhase::NotStarted);
    }

    #[tokio::test]
    async fn test_phase_done_after_debate() {
        let mut orchestrator = smart_orchestrator(2);
        orchestrator.conduct_debate("Cats are better than dogs").await.unwrap();
        assert_eq!(orchestrator.phase(), DebatePhase::Done);
        assert_eq!(orchestrator.topic(), Some("Cats are better than dogs"));
        assert!(orchestrator.last_result().is_some());
    }

    #[test]
    fn test_record_before_debate() {
        let orchestrator = smart_orchestrator(1);
        assert!(matches!(
            orchestrator.debate_record(),
            Err(DebateError::NoDebate)
        ));
    }

    #[test]
    fn test_blocking_debate() {
        let mut orchestrator = smart_orchestrator(1);
        let result = orchestrator.conduct_debate_blocking("Tea beats coffee").unwrap();
        assert_eq!(result.debate_history.len(), 2);
    }

    #[test]
    fn test_opening_prompt_follows_role() {
        let provider: Arc<dyn LlmProvider> = Arc::new(MockProvider::smart());
        let pro = AgentHandle::new(AgentRole::Proponent, provider.clone());
        let con = AgentHandle::new(AgentRole::Opponent, provider.clone());
        let judge = AgentHandle::new(AgentRole::Judge, provider);

        assert!(opening_prompt(&pro, "Zoos").contains("Your stance: supporting"));
        assert!(opening_prompt(&con, "Zoos").contains("Your stance: opposing"));
        assert!(opening_prompt(&judge, "Zoos").is_empty());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(DebatePhase::Round(2).to_string(), "round 2");
        assert!(DebatePhase::Failed.is_terminal());
        assert!(!DebatePhase::Judging.is_terminal());
    }
}
