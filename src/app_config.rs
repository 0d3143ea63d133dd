use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language tag, passed through to the prompt (e.g. "en", "English")
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language tag
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Model name to request from the LLM server
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the LLM server
    #[serde(default = "default_server")]
    pub server: String,

    /// Backend protocol selection
    #[serde(default)]
    pub llm_mode: LlmMode,

    /// Whether to consume responses as a line stream
    #[serde(default)]
    pub stream: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum subtitle characters per batched request
    #[serde(default = "default_max_chars_per_request")]
    pub max_chars_per_request: usize,

    /// Whether bracketed annotations like [music] should be translated
    #[serde(default = "default_translate_bracketed")]
    pub translate_bracketed: bool,

    /// Output path template
    #[serde(default = "default_output_template")]
    pub output_template: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Which endpoint/payload shape to use against the LLM server
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmMode {
    // @mode: Pick the chat protocol
    #[default]
    Auto,
    // @mode: /api/chat with a messages array
    Chat,
    // @mode: /api/generate with a plain prompt
    Generate,
}

impl LlmMode {
    // @returns: Lowercase mode identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Auto => "auto".to_string(),
            Self::Chat => "chat".to_string(),
            Self::Generate => "generate".to_string(),
        }
    }
}

impl std::fmt::Display for LlmMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for LlmMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "chat" => Ok(Self::Chat),
            "generate" => Ok(Self::Generate),
            _ => Err(anyhow!("Invalid llm mode: {}", s)),
        }
    }
}

/// Logging verbosity, stored alongside the rest of the configuration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            model: default_model(),
            server: default_server(),
            llm_mode: LlmMode::default(),
            stream: false,
            timeout_secs: default_timeout_secs(),
            max_chars_per_request: default_max_chars_per_request(),
            translate_bracketed: default_translate_bracketed(),
            output_template: default_output_template(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write config to file: {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.trim().is_empty() {
            return Err(anyhow!("Server endpoint cannot be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(anyhow!("Model name cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("Timeout must be at least 1 second"));
        }
        if self.max_chars_per_request == 0 {
            return Err(anyhow!("Character budget must be positive"));
        }
        Ok(())
    }
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_server() -> String {
    "http://localhost:11434".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_chars_per_request() -> usize {
    4000
}

fn default_translate_bracketed() -> bool {
    true
}

fn default_output_template() -> String {
    "{basename}.{dst}.{fmt}".to_string()
}
