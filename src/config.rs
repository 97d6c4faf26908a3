//! Configuration for the evaluator.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.

use crate::error::{EvaluatorError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Minimum number of characters accepted for model outputs.
pub const MIN_MODEL_OUTPUTS: usize = 50;

/// LLM configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL for the LLM API (e.g., "https://api.openai.com")
    pub api_base: String,

    /// API key for authentication
    pub api_key: String,

    /// Model name (e.g., "gpt-4o", "claude-3-opus")
    pub model: String,

    /// Maximum tokens for response (optional)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for generation (optional)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds. `None` leaves the HTTP client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Send the report output schema as `response_format`.
    #[serde(default = "default_structured_output")]
    pub structured_output: bool,
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.7
}

fn default_structured_output() -> bool {
    true
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: None,
            structured_output: default_structured_output(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the web app listens on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:9002".to_string(),
        }
    }
}

/// Input bounds shared by the form and the request handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum number of characters accepted for model outputs.
    pub max_model_outputs: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_model_outputs: 5000,
        }
    }
}

impl Limits {
    /// Whether `len` characters fall inside the accepted range.
    pub fn accepts_len(&self, len: usize) -> bool {
        (MIN_MODEL_OUTPUTS..=self.max_model_outputs).contains(&len)
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM settings
    pub llm: LlmConfig,
    /// Web server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Validation bounds
    #[serde(default)]
    pub limits: Limits,
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    llm: Option<LlmFileSection>,
    server: Option<ServerFileSection>,
    limits: Option<LimitsFileSection>,
}

#[derive(Debug, Deserialize)]
struct LlmFileSection {
    api_base: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
    structured_output: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ServerFileSection {
    bind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LimitsFileSection {
    max_model_outputs: Option<usize>,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (LLM_API_BASE, LLM_API_KEY, LLM_MODEL, EVALUATOR_BIND, ...)
    /// 2. Config file (~/.config/ai-model-evaluator/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        config.apply_env(|key| env::var(key).ok());

        Ok(config)
    }

    /// Override fields from environment-style lookups.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(api_base) = var("LLM_API_BASE") {
            self.llm.api_base = api_base;
        }

        if let Some(api_key) = var("LLM_API_KEY") {
            self.llm.api_key = api_key;
        }

        if let Some(model) = var("LLM_MODEL") {
            self.llm.model = model;
        }

        if let Some(tokens) = var("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.llm.max_tokens = tokens;
        }

        if let Some(temp) = var("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.llm.temperature = temp;
        }

        if let Some(secs) = var("LLM_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.llm.timeout_secs = Some(secs);
        }

        if let Some(enabled) = var("LLM_STRUCTURED_OUTPUT").and_then(|v| v.parse().ok()) {
            self.llm.structured_output = enabled;
        }

        if let Some(bind) = var("EVALUATOR_BIND") {
            self.server.bind = bind;
        }

        if let Some(max) = var("EVALUATOR_MAX_MODEL_OUTPUTS").and_then(|v| v.parse().ok()) {
            self.limits.max_model_outputs = max;
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EvaluatorError::io(path, e))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text, filling gaps with defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file_config: ConfigFile = serde_yaml::from_str(content)
            .map_err(|e| EvaluatorError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Config::default();

        if let Some(llm) = file_config.llm {
            if let Some(api_base) = llm.api_base {
                config.llm.api_base = api_base;
            }
            if let Some(api_key) = llm.api_key {
                config.llm.api_key = api_key;
            }
            if let Some(model) = llm.model {
                config.llm.model = model;
            }
            if let Some(max_tokens) = llm.max_tokens {
                config.llm.max_tokens = max_tokens;
            }
            if let Some(temperature) = llm.temperature {
                config.llm.temperature = temperature;
            }
            if llm.timeout_secs.is_some() {
                config.llm.timeout_secs = llm.timeout_secs;
            }
            if let Some(structured) = llm.structured_output {
                config.llm.structured_output = structured;
            }
        }

        if let Some(bind) = file_config.server.and_then(|s| s.bind) {
            config.server.bind = bind;
        }

        if let Some(max) = file_config.limits.and_then(|l| l.max_model_outputs) {
            config.limits.max_model_outputs = max;
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ai-model-evaluator")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate that required configuration is present.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_base.is_empty() {
            return Err(EvaluatorError::Config(
                "LLM API base URL is required. Set LLM_API_BASE environment variable or add to config file.".to_string()
            ));
        }

        if self.llm.api_key.is_empty() {
            return Err(EvaluatorError::Config(
                "LLM API key is required. Set LLM_API_KEY environment variable or add to config file.".to_string()
            ));
        }

        if self.llm.model.is_empty() {
            return Err(EvaluatorError::Config(
                "LLM model is required. Set LLM_MODEL environment variable or add to config file."
                    .to_string(),
            ));
        }

        if self.limits.max_model_outputs < MIN_MODEL_OUTPUTS {
            return Err(EvaluatorError::InvalidConfig(format!(
                "limits.max_model_outputs must be at least {}, got {}",
                MIN_MODEL_OUTPUTS, self.limits.max_model_outputs
            )));
        }

        Ok(())
    }

    /// Create a config from explicit values (useful for testing).
    pub fn with_llm(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            llm: LlmConfig {
                api_base: api_base.into(),
                api_key: api_key.into(),
                model: model.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.llm.api_base.is_empty());
        assert!(config.llm.api_key.is_empty());
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, 4096);
        assert!(config.llm.structured_output);
        assert!(config.llm.timeout_secs.is_none());
        assert_eq!(config.server.bind, "127.0.0.1:9002");
        assert_eq!(config.limits.max_model_outputs, 5000);
    }

    #[test]
    fn test_validate_fails_without_required_fields() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_tiny_max() {
        let mut config = Config::with_llm("https://api.example.com", "key", "gpt-4");
        assert!(config.validate().is_ok());

        config.limits.max_model_outputs = 10;
        assert!(matches!(
            config.validate(),
            Err(EvaluatorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_with_llm() {
        let config = Config::with_llm("https://api.example.com", "test-key", "gpt-4");
        assert_eq!(config.llm.api_base, "https://api.example.com");
        assert_eq!(config.llm.api_key, "test-key");
        assert_eq!(config.llm.model, "gpt-4");
    }

    #[test]
    fn test_limits_bounds() {
        let limits = Limits::default();
        assert!(!limits.accepts_len(49));
        assert!(limits.accepts_len(50));
        assert!(limits.accepts_len(5000));
        assert!(!limits.accepts_len(5001));
    }

    #[test]
    fn test_load_from_file_partial_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "llm:\n  api_base: http://localhost:4000\n  model: llama3\n  timeout_secs: 30\nlimits:\n  max_model_outputs: 50000\n",
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.llm.api_base, "http://localhost:4000");
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.timeout_secs, Some(30));
        assert!(config.llm.api_key.is_empty());
        assert_eq!(config.server.bind, "127.0.0.1:9002");
        assert_eq!(config.limits.max_model_outputs, 50000);
    }

    #[test]
    fn test_bad_yaml_is_config_error() {
        let result = Config::from_yaml("llm: [not, a, map");
        assert!(matches!(result, Err(EvaluatorError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("LLM_API_KEY", "sk-env"),
            ("LLM_STRUCTURED_OUTPUT", "false"),
            ("LLM_TEMPERATURE", "not-a-number"),
            ("EVALUATOR_BIND", "0.0.0.0:8080"),
            ("EVALUATOR_MAX_MODEL_OUTPUTS", "1200"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.llm.api_key, "sk-env");
        assert!(!config.llm.structured_output);
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.limits.max_model_outputs, 1200);
    }
}
