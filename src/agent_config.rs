//! Language-model agent presets.

use crate::llm_client::{LlmClient, LlmConfig, LlmProvider};
use crate::players::{CoordinateParser, LanguageModelProvider, PromptBuilder};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for one language-model player.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent name (shown in the UI and used to select presets).
    name: String,

    /// LLM provider (openai or anthropic).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name (e.g., "gpt-4o-mini", "deepseek-ai/DeepSeek-R1").
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// API base for OpenAI-compatible endpoints.
    #[serde(default)]
    base_url: Option<String>,

    /// Environment variable holding the API key.
    #[serde(default)]
    api_key_env: Option<String>,

    /// Only text after the last occurrence of this marker is parsed.
    #[serde(default)]
    final_answer_marker: Option<String>,

    /// Thinking-time hint included in the prompt, in seconds.
    #[serde(default)]
    think_limit_secs: Option<u32>,
}

#[instrument]
fn default_provider() -> LlmProvider {
    LlmProvider::OpenAI
}

#[instrument]
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

#[instrument]
fn default_max_tokens() -> u32 {
    2048
}

impl AgentConfig {
    /// Creates an agent configuration with default model settings.
    #[instrument(skip(name), fields(agent_name = %name))]
    pub fn new(name: String) -> Self {
        Self::with_llm(name, default_provider(), default_model(), default_max_tokens())
    }

    /// Creates an agent configuration with explicit LLM settings.
    #[instrument(skip(name), fields(agent_name = %name))]
    pub fn with_llm(
        name: String,
        llm_provider: LlmProvider,
        llm_model: String,
        llm_max_tokens: u32,
    ) -> Self {
        Self {
            name,
            llm_provider,
            llm_model,
            llm_max_tokens,
            base_url: None,
            api_key_env: None,
            final_answer_marker: None,
            think_limit_secs: None,
        }
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ConfigError::new(format!("Failed to parse config: {}", e))
        })?;

        info!(agent_name = %config.name, "Config loaded successfully");
        Ok(config)
    }

    /// Name of the environment variable holding the API key.
    pub fn api_key_var(&self) -> &str {
        match (&self.api_key_env, self.llm_provider) {
            (Some(var), _) => var,
            (None, LlmProvider::OpenAI) => "OPENAI_API_KEY",
            (None, LlmProvider::Anthropic) => "ANTHROPIC_API_KEY",
        }
    }

    /// Creates LLM configuration from this agent config.
    ///
    /// Reads the API key from the environment (see [`AgentConfig::api_key_var`]).
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");

        let var = self.api_key_var();
        let api_key = std::env::var(var).map_err(|_| {
            ConfigError::new(format!("{} environment variable not set", var))
        })?;

        let config = LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
        );
        let config = match &self.base_url {
            Some(base_url) => config.with_base_url(base_url.clone()),
            None => config,
        };
        Ok(match &self.final_answer_marker {
            Some(marker) => config.with_final_answer_marker(marker.clone()),
            None => config,
        })
    }

    /// Response parser configured for this agent.
    pub fn parser(&self) -> CoordinateParser {
        match &self.final_answer_marker {
            Some(marker) => CoordinateParser::with_final_answer_marker(marker.clone()),
            None => CoordinateParser::new(),
        }
    }

    /// Prompt builder configured for this agent.
    pub fn prompt_builder(&self) -> PromptBuilder {
        match self.think_limit_secs {
            Some(secs) => PromptBuilder::new().with_think_limit(secs),
            None => PromptBuilder::new(),
        }
    }

    /// Builds a move provider for this agent.
    #[instrument(skip(self), fields(agent_name = %self.name))]
    pub fn create_provider(&self) -> Result<LanguageModelProvider, ConfigError> {
        let client = LlmClient::new(self.create_llm_config()?);
        Ok(LanguageModelProvider::new(
            self.name.clone(),
            client,
            self.prompt_builder(),
            self.parser(),
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
