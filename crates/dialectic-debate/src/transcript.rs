//! Debate history and the persisted transcript format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::agent::AgentTag;
use crate::config::{DebateConfig, ExecutionMode};
use crate::error::TranscriptError;
use crate::parsing::{CriteriaScores, JudgmentResult, Verdict};

/// One agent response in one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// 1-based round number
    pub round: u32,
    pub agent: AgentTag,
    pub content: String,
}

impl TranscriptEntry {
    pub fn new(round: u32, agent: AgentTag, content: impl Into<String>) -> Self {
        Self {
            round,
            agent,
            content: content.into(),
        }
    }
}

/// Outcome of a completed debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateResult {
    pub debate_id: Uuid,
    pub topic: String,
    pub debate_history: Vec<TranscriptEntry>,
    pub judgment: JudgmentResult,
}

impl DebateResult {
    /// Number of full rounds in the history
    pub fn rounds(&self) -> u32 {
        self.debate_history
            .iter()
            .map(|entry| entry.round)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Debate ran through judging
    #[default]
    Completed,
    /// Debate stopped at a failed agent call
    Partial,
}

/// Judge section of a transcript; empty for partial records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentRecord {
    pub result: Option<Verdict>,
    pub scores: Option<CriteriaScores>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_judgment: Option<String>,
}

impl JudgmentRecord {
    pub fn from_judgment(judgment: &JudgmentResult) -> Self {
        Self {
            result: Some(judgment.final_judgment.clone()),
            scores: Some(judgment.criteria_scores),
            timestamp: judgment.judged_at,
            raw_judgment: Some(judgment.raw_judgment.clone()),
        }
    }

    pub fn pending() -> Self {
        Self {
            result: None,
            scores: None,
            timestamp: Utc::now(),
            raw_judgment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub num_rounds: u32,
    pub model_name: String,
    pub temperature: f32,
    #[serde(default)]
    pub execution_mode: ExecutionMode,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debate_id: Option<Uuid>,
}

impl RecordMetadata {
    pub fn from_config(config: &DebateConfig, status: RecordStatus) -> Self {
        Self {
            num_rounds: config.num_rounds,
            model_name: config.model_name.clone(),
            temperature: config.temperature,
            execution_mode: config.execution_mode,
            status,
            debate_id: None,
        }
    }
}

/// Self-contained JSON transcript of one debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateRecord {
    pub topic: String,
    pub debate_history: Vec<TranscriptEntry>,
    pub judge_criteria: String,
    pub judgment: JudgmentRecord,
    pub metadata: RecordMetadata,
}

impl DebateRecord {
    /// Record of a debate that reached a verdict
    pub fn completed(config: &DebateConfig, result: &DebateResult) -> Self {
        let mut metadata = RecordMetadata::from_config(config, RecordStatus::Completed);
        metadata.debate_id = Some(result.debate_id);

        Self {
            topic: result.topic.clone(),
            debate_history: result.debate_history.clone(),
            judge_criteria: config.judge_criteria.clone(),
            judgment: JudgmentRecord::from_judgment(&result.judgment),
            metadata,
        }
    }

    /// Record of a debate that stopped before judging completed
    pub fn partial(config: &DebateConfig, topic: &str, history: &[TranscriptEntry]) -> Self {
        Self {
            topic: topic.to_string(),
            debate_history: history.to_vec(),
            judge_criteria: config.judge_criteria.clone(),
            judgment: JudgmentRecord::pending(),
            metadata: RecordMetadata::from_config(config, RecordStatus::Partial),
        }
    }

    pub fn is_partial(&self) -> bool {
        self.metadata.status == RecordStatus::Partial
    }

    pub fn to_json(&self) -> Result<String, TranscriptError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the record as indented JSON, replacing any existing file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), TranscriptError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, self.to_json()?).await?;
        tracing::info!(path = %path.display(), status = ?self.metadata.status, "Saved debate transcript");
        Ok(())
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TranscriptError> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_judgment;

    fn sample_result() -> DebateResult {
        DebateResult {
            debate_id: Uuid::new_v4(),
            topic: "Remote work improves productivity".to_string(),
            debate_history: vec![
                TranscriptEntry::new(1, AgentTag::A, "pro"),
                TranscriptEntry::new(1, AgentTag::B, "con"),
            ],
            judgment: parse_judgment("Clarity: 8/10\nVERDICT: Agent A (supporting)"),
        }
    }

    #[test]
    fn test_completed_record_shape() {
        let config = DebateConfig::default().with_rounds(1);
        let record = DebateRecord::completed(&config, &sample_result());
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();

        assert_eq!(value["topic"], "Remote work improves productivity");
        assert_eq!(value["debate_history"][1]["agent"], "B");
        assert_eq!(value["debate_history"][0]["round"], 1);
        assert_eq!(value["judgment"]["result"]["status"], "found");
        assert_eq!(value["judgment"]["result"]["verdict"], "Agent A (supporting)");
        assert_eq!(value["judgment"]["scores"]["clarity"], 8);
        assert_eq!(value["metadata"]["num_rounds"], 1);
        assert_eq!(value["metadata"]["status"], "completed");
        assert_eq!(value["metadata"]["execution_mode"], "concurrent");
        assert!(value["judgment"]["timestamp"].is_string());
    }

    #[test]
    fn test_partial_record_has_null_judgment() {
        let config = DebateConfig::default();
        let history = vec![TranscriptEntry::new(1, AgentTag::A, "pro")];
        let record = DebateRecord::partial(&config, "t", &history);
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();

        assert!(record.is_partial());
        assert!(value["judgment"]["result"].is_null());
        assert!(value["judgment"]["scores"].is_null());
        assert!(value["judgment"].get("raw_judgment").is_none());
        assert_eq!(value["metadata"]["status"], "partial");
    }

    #[test]
    fn test_minimal_record_deserializes() {
        let json = r#"{
            "topic": "t",
            "debate_history": [],
            "judge_criteria": "c",
            "judgment": {"result": null, "scores": null, "timestamp": "2024-03-01T12:00:00Z"},
            "metadata": {"num_rounds": 2, "model_name": "m", "temperature": 0.5}
        }"#;
        let record: DebateRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.metadata.status, RecordStatus::Completed);
        assert_eq!(record.metadata.execution_mode, ExecutionMode::Concurrent);
        assert_eq!(record.metadata.debate_id, None);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("debate.json");
        let record = DebateRecord::completed(&DebateConfig::default(), &sample_result());

        record.save(&path).await.unwrap();
        let loaded = DebateRecord::load(&path).await.unwrap();

        assert_eq!(loaded, record);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"topic\""));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DebateRecord::load(dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscriptError::Io(_)));
    }
}
