use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable consulted when the answer provider's API key is left empty
pub const API_KEY_ENV: &str = "PERPLEXITY_API_KEY";

/// Answer provider selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum AnswerProviderConfig {
    /// Perplexity-style chat completions endpoint that returns citations
    Perplexity {
        /// API key for authentication (falls back to `PERPLEXITY_API_KEY`)
        #[serde(default)]
        api_key: String,
        /// Model name (e.g., "sonar")
        #[serde(default = "default_model")]
        model: String,
        /// Base URL for the API
        #[serde(default = "default_base_url")]
        base_url: String,
    },
    /// Scripted responses for offline runs and tests
    Mock {
        /// TOML file with `[[responses]]` entries
        #[serde(default)]
        responses_file: Option<PathBuf>,
    },
}

impl AnswerProviderConfig {
    pub fn name(&self) -> &'static str {
        match self {
            AnswerProviderConfig::Perplexity { .. } => "perplexity",
            AnswerProviderConfig::Mock { .. } => "mock",
        }
    }

    /// Fill an empty API key from the environment
    fn apply_env_key(&mut self, env_key: Option<String>) {
        if let AnswerProviderConfig::Perplexity { api_key, .. } = self
            && api_key.trim().is_empty()
            && let Some(key) = env_key.filter(|k| !k.trim().is_empty())
        {
            *api_key = key;
        }
    }
}

impl Default for AnswerProviderConfig {
    fn default() -> Self {
        AnswerProviderConfig::Perplexity { api_key: String::new(), model: default_model(), base_url: default_base_url() }
    }
}

fn default_model() -> String {
    "sonar".to_string()
}

fn default_base_url() -> String {
    "https://api.perplexity.ai".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    30
}

/// `[answer]` section: how the AI chat surface reaches its answer service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerConfig {
    /// Sampling temperature sent with every request
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Deadline for one request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Overrides the built-in system instruction
    #[serde(default)]
    pub system_prompt: Option<String>,

    #[serde(default)]
    pub provider: AnswerProviderConfig,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            system_prompt: None,
            provider: AnswerProviderConfig::default(),
        }
    }
}

/// Messaging network implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessagingBackend {
    /// In-process network, no external service
    #[default]
    Loopback,
}

impl MessagingBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessagingBackend::Loopback => "loopback",
        }
    }
}

impl std::fmt::Display for MessagingBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_true() -> bool {
    true
}

/// `[messaging]` section: wallet and decentralized messaging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessagingConfig {
    #[serde(default)]
    pub backend: MessagingBackend,

    /// Wallet address to connect as (generated when absent)
    #[serde(default)]
    pub wallet_address: Option<String>,

    /// Register a peer that answers every direct message
    #[serde(default = "default_true")]
    pub echo_peer: bool,

    /// Make wallet connection fail with this message
    #[serde(default)]
    pub fail_connect: Option<String>,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self { backend: MessagingBackend::default(), wallet_address: None, echo_peer: true, fail_connect: None }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_file_log_level() -> String {
    "debug".to_string()
}

/// `[logging.file]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileLoggingConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_file_log_level")]
    pub level: String,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self { enabled: false, level: default_file_log_level() }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty`, `json` or `compact`
    #[serde(default = "default_log_format")]
    pub format: String,

    #[serde(default)]
    pub file: FileLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: default_log_format(), file: FileLoggingConfig::default() }
    }
}

/// Root configuration structure for duet.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub answer: AnswerConfig,

    #[serde(default)]
    pub messaging: MessagingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Default location of the config file (./duet.toml)
    pub fn default_path() -> PathBuf {
        PathBuf::from("duet.toml")
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(toml_str)?;
        config.answer.provider.apply_env_key(std::env::var(API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.answer.temperature) {
            return Err(Error::Config(
                ConfigError::OutOfRange(format!("answer.temperature = {}", self.answer.temperature)).to_string(),
            ));
        }

        if self.answer.timeout_secs == 0 {
            return Err(Error::Config(
                ConfigError::OutOfRange("answer.timeout_secs must be positive".to_string()).to_string(),
            ));
        }

        if let AnswerProviderConfig::Perplexity { base_url, .. } = &self.answer.provider
            && !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        {
            return Err(Error::Config(ConfigError::InvalidUrl(base_url.clone()).to_string()));
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# duet configuration
# Copy this file to duet.toml and customize as needed

[answer]
# Sampling temperature for the answer service (0.0 - 2.0)
temperature = 0.7
# Seconds to wait for an answer before giving up
timeout_secs = 30
# Override the built-in system instruction (optional)
# system_prompt = "You are a helpful assistant."

[answer.provider]
# Provider type: "perplexity" or "mock"
provider = "perplexity"
# API key; leave empty to read PERPLEXITY_API_KEY from the environment
api_key = ""
model = "sonar"
# base_url = "https://api.perplexity.ai"

[messaging]
# Messaging backend: "loopback" (in-process network)
backend = "loopback"
# Wallet address to connect as (optional, generated when absent)
# wallet_address = "0x0000000000000000000000000000000000000001"
# Register a peer that answers direct messages
echo_peer = true

[logging]
level = "warn"
format = "pretty"

[logging.file]
enabled = false
level = "debug"
"#
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Numeric setting outside its allowed range
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// Base URL is not http(s)
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// Required secret missing
    #[error("missing API key: set answer.provider.api_key or {API_KEY_ENV}")]
    MissingApiKey,
}
