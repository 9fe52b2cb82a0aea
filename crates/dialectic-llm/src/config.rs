//! Configuration management for Dialectic providers
//!
//! Handles API keys, endpoints and HTTP timeouts. Values are loaded into an
//! explicit [`LlmConfig`] that callers pass to provider constructors.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Failed to read env file: {0}")]
    EnvFile(String),
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Anthropic API key (env: ANTHROPIC_API_KEY)
    pub anthropic_api_key: Option<String>,
    /// OpenAI API key (env: OPENAI_API_KEY)
    pub openai_api_key: Option<String>,
    /// OpenAI organization (env: OPENAI_API_ORG)
    pub openai_org: Option<String>,
    /// Anthropic endpoint (env: ANTHROPIC_BASE_URL)
    pub anthropic_base_url: String,
    /// OpenAI endpoint (env: OPENAI_BASE_URL)
    pub openai_base_url: String,
    /// HTTP timeout per request (env: DIALECTIC_REQUEST_TIMEOUT_SECS)
    pub request_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            openai_api_key: None,
            openai_org: None,
            anthropic_base_url: ANTHROPIC_BASE_URL.to_string(),
            openai_base_url: OPENAI_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_org: non_empty_var("OPENAI_API_ORG"),
            anthropic_base_url: non_empty_var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|| ANTHROPIC_BASE_URL.to_string()),
            openai_base_url: non_empty_var("OPENAI_BASE_URL")
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            request_timeout: env::var("DIALECTIC_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Load a `.env` file from the working directory (if present), then read
    /// the process environment. Variables already set in the process win.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded env file"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::EnvFile(e.to_string())),
        }
        Ok(Self::from_env())
    }

    /// Like [`LlmConfig::load`] but with an explicit env file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref()).map_err(|e| ConfigError::EnvFile(e.to_string()))?;
        Ok(Self::from_env())
    }

    /// Get API key for a provider
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        match provider.to_lowercase().as_str() {
            "anthropic" => self.anthropic_api_key.as_deref(),
            "openai" => self.openai_api_key.as_deref(),
            _ => None,
        }
    }

    /// Get API key for a provider or fail with the variable that is missing
    pub fn require_api_key(&self, provider: &str) -> Result<&str, ConfigError> {
        match provider.to_lowercase().as_str() {
            "anthropic" => self
                .anthropic_api_key
                .as_deref()
                .ok_or_else(|| ConfigError::MissingEnvVar("ANTHROPIC_API_KEY".to_string())),
            "openai" => self
                .openai_api_key
                .as_deref()
                .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string())),
            other => Err(ConfigError::Invalid(format!("Unknown provider: {}", other))),
        }
    }

    /// Check if a provider is configured
    pub fn is_configured(&self, provider: &str) -> bool {
        match provider.to_lowercase().as_str() {
            "anthropic" => self.anthropic_api_key.is_some(),
            "openai" => self.openai_api_key.is_some(),
            "mock" => true,
            _ => false,
        }
    }

    /// List available providers
    pub fn available_providers(&self) -> Vec<&str> {
        let mut providers = vec!["mock"];
        if self.anthropic_api_key.is_some() {
            providers.push("anthropic");
        }
        if self.openai_api_key.is_some() {
            providers.push("openai");
        }
        providers
    }

    /// Build the HTTP client shared by the network providers
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("HTTP client: {}", e)))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();
        assert_eq!(config.anthropic_base_url, ANTHROPIC_BASE_URL);
        assert!(config.is_configured("mock"));
        assert!(!config.is_configured("anthropic"));
    }

    #[test]
    fn test_available_providers() {
        let config = LlmConfig {
            anthropic_api_key: Some("sk-ant-test".to_string()),
            ..LlmConfig::default()
        };
        let providers = config.available_providers();
        assert!(providers.contains(&"mock"));
        assert!(providers.contains(&"anthropic"));
        assert!(!providers.contains(&"openai"));
    }

    #[test]
    fn test_require_api_key_names_missing_variable() {
        let config = LlmConfig::default();
        match config.require_api_key("anthropic") {
            Err(ConfigError::MissingEnvVar(var)) => assert_eq!(var, "ANTHROPIC_API_KEY"),
            other => panic!("expected missing key, got {:?}", other),
        }
        assert!(matches!(
            config.require_api_key("cohere"),
            Err(ConfigError::Invalid(_))
        ));
    }
}
