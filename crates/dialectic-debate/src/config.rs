//! Debate configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

use dialectic_llm::{CompletionParams, DEFAULT_MODEL};

use crate::error::DebateError;
use crate::prompts::DEFAULT_JUDGE_CRITERIA;

/// How the two debaters of a round are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Both calls of a round are in flight together
    #[default]
    Concurrent,
    /// Agent A finishes before agent B starts
    Sequential,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Concurrent => f.write_str("concurrent"),
            ExecutionMode::Sequential => f.write_str("sequential"),
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = DebateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concurrent" | "async" | "parallel" => Ok(ExecutionMode::Concurrent),
            "sequential" | "sync" => Ok(ExecutionMode::Sequential),
            other => Err(DebateError::InvalidConfig(format!(
                "Unknown execution mode: {}",
                other
            ))),
        }
    }
}

/// Settings fixed for the lifetime of an orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateConfig {
    /// Number of rounds (at least one)
    pub num_rounds: u32,
    /// Token cap for each agent response
    pub max_tokens_per_response: u32,
    /// Sampling temperature passed to every agent
    pub temperature: f32,
    /// Model identifier passed to every agent
    pub model_name: String,
    /// Rubric given to the judge
    pub judge_criteria: String,
    /// Round scheduling
    pub execution_mode: ExecutionMode,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            num_rounds: 3,
            max_tokens_per_response: 1000,
            temperature: 0.7,
            model_name: DEFAULT_MODEL.to_string(),
            judge_criteria: DEFAULT_JUDGE_CRITERIA.to_string(),
            execution_mode: ExecutionMode::Concurrent,
        }
    }
}

impl DebateConfig {
    /// Defaults overridden by `DIALECTIC_*` environment variables.
    ///
    /// Unparsable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(rounds) = parse_var::<u32>("DIALECTIC_ROUNDS") {
            config.num_rounds = rounds;
        }
        if let Some(tokens) = parse_var::<u32>("DIALECTIC_MAX_TOKENS") {
            config.max_tokens_per_response = tokens;
        }
        if let Some(temperature) = parse_var::<f32>("DIALECTIC_TEMPERATURE") {
            config.temperature = temperature;
        }
        if let Ok(model) = env::var("DIALECTIC_MODEL") {
            if !model.trim().is_empty() {
                config.model_name = model;
            }
        }
        if let Ok(mode) = env::var("DIALECTIC_EXECUTION_MODE") {
            match mode.parse() {
                Ok(mode) => config.execution_mode = mode,
                Err(e) => tracing::warn!(error = %e, "Ignoring DIALECTIC_EXECUTION_MODE"),
            }
        }

        config
    }

    pub fn with_rounds(mut self, num_rounds: u32) -> Self {
        self.num_rounds = num_rounds;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens_per_response = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model_name = model.to_string();
        self
    }

    pub fn with_judge_criteria(mut self, criteria: &str) -> Self {
        self.judge_criteria = criteria.to_string();
        self
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    /// Reject settings no debate can run with.
    ///
    /// Temperature and model are left to the provider.
    pub fn validate(&self) -> Result<(), DebateError> {
        if self.num_rounds == 0 {
            return Err(DebateError::InvalidConfig(
                "num_rounds must be at least 1".to_string(),
            ));
        }
        if self.max_tokens_per_response == 0 {
            return Err(DebateError::InvalidConfig(
                "max_tokens_per_response must be positive".to_string(),
            ));
        }
        if self.judge_criteria.trim().is_empty() {
            return Err(DebateError::InvalidConfig(
                "judge_criteria must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Sampling parameters for every agent request
    pub fn completion_params(&self) -> CompletionParams {
        CompletionParams::new(
            &self.model_name,
            self.max_tokens_per_response,
            self.temperature,
        )
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparsable environment variable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DebateConfig::default();
        assert_eq!(config.num_rounds, 3);
        assert_eq!(config.max_tokens_per_response, 1000);
        assert_eq!(config.model_name, "claude-3-sonnet-20240229");
        assert_eq!(config.execution_mode, ExecutionMode::Concurrent);
        assert!(config.judge_criteria.contains("VERDICT:"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let config = DebateConfig::default().with_rounds(0);
        assert!(matches!(config.validate(), Err(DebateError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_tokens_rejected() {
        let config = DebateConfig::default().with_max_tokens(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_execution_mode_parse() {
        assert_eq!(
            "Sequential".parse::<ExecutionMode>().unwrap(),
            ExecutionMode::Sequential
        );
        assert_eq!(
            "async".parse::<ExecutionMode>().unwrap(),
            ExecutionMode::Concurrent
        );
        assert!("later".parse::<ExecutionMode>().is_err());
    }

    #[test]
    fn test_completion_params() {
        let params = DebateConfig::default()
            .with_model("claude-3-haiku-20240307")
            .with_temperature(0.2)
            .completion_params();
        assert_eq!(params.model, "claude-3-haiku-20240307");
        assert_eq!(params.max_tokens, 1000);
        assert_eq!(params.temperature, 0.2);
    }
}
