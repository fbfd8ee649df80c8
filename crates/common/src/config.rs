use crate::error::TextBriefError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MISTRAL_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";
pub const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// TextBrief application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Client state directory (settings.json, history.json)
    pub data_dir: PathBuf,

    /// Deadline for a single upstream provider call
    pub request_timeout_secs: u64,

    /// Deadline for parsing one uploaded document
    pub extraction_timeout_secs: u64,

    /// Largest accepted upload
    pub max_upload_bytes: usize,

    pub openai_api_url: String,
    pub openai_model: String,
    pub mistral_api_url: String,
    pub mistral_model: String,
    pub anthropic_api_url: String,
    pub anthropic_model: String,
    pub anthropic_version: String,

    /// Sampling temperature for summaries (grammar checks send none)
    pub summary_temperature: f32,

    /// Fixed output budget for grammar checks
    pub grammar_max_tokens: u32,

    /// Lower bound for the length-derived output budget
    pub min_output_tokens: u32,

    /// Upper bound for the length-derived output budget
    pub max_output_tokens: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            log_dir: PathBuf::from("./data/log"),
            log_level: "info".to_string(),
            data_dir: PathBuf::from("./data"),
            request_timeout_secs: 120,
            extraction_timeout_secs: 30,
            max_upload_bytes: 10 * 1024 * 1024,
            openai_api_url: DEFAULT_OPENAI_API_URL.to_string(),
            openai_model: "gpt-3.5-turbo".to_string(),
            mistral_api_url: DEFAULT_MISTRAL_API_URL.to_string(),
            mistral_model: "mistral-tiny".to_string(),
            anthropic_api_url: DEFAULT_ANTHROPIC_API_URL.to_string(),
            anthropic_model: "claude-2".to_string(),
            anthropic_version: "2023-06-01".to_string(),
            summary_temperature: 0.7,
            grammar_max_tokens: 1024,
            min_output_tokens: 1,
            max_output_tokens: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, TextBriefError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let config = Self {
            server_host: Self::get_env("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: Self::parse_env("SERVER_PORT")?.unwrap_or(defaults.server_port),
            log_dir: Self::get_env("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: Self::get_env("LOG_LEVEL").unwrap_or(defaults.log_level),
            data_dir: Self::get_env("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            request_timeout_secs: Self::parse_env("REQUEST_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout_secs),
            extraction_timeout_secs: Self::parse_env("EXTRACTION_TIMEOUT_SECS")?
                .unwrap_or(defaults.extraction_timeout_secs),
            max_upload_bytes: Self::parse_env("MAX_UPLOAD_BYTES")?
                .unwrap_or(defaults.max_upload_bytes),
            openai_api_url: Self::get_env("OPENAI_API_URL").unwrap_or(defaults.openai_api_url),
            openai_model: Self::get_env("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            mistral_api_url: Self::get_env("MISTRAL_API_URL").unwrap_or(defaults.mistral_api_url),
            mistral_model: Self::get_env("MISTRAL_MODEL").unwrap_or(defaults.mistral_model),
            anthropic_api_url: Self::get_env("ANTHROPIC_API_URL")
                .unwrap_or(defaults.anthropic_api_url),
            anthropic_model: Self::get_env("ANTHROPIC_MODEL").unwrap_or(defaults.anthropic_model),
            anthropic_version: Self::get_env("ANTHROPIC_VERSION")
                .unwrap_or(defaults.anthropic_version),
            summary_temperature: Self::parse_env("SUMMARY_TEMPERATURE")?
                .unwrap_or(defaults.summary_temperature),
            grammar_max_tokens: Self::parse_env("GRAMMAR_MAX_TOKENS")?
                .unwrap_or(defaults.grammar_max_tokens),
            min_output_tokens: Self::parse_env("MIN_OUTPUT_TOKENS")?
                .unwrap_or(defaults.min_output_tokens),
            max_output_tokens: Self::parse_env("MAX_OUTPUT_TOKENS")?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Get non-empty environment variable
    fn get_env(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    /// Parse environment variable, rejecting values that do not parse
    fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, TextBriefError> {
        match Self::get_env(key) {
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
                TextBriefError::config(format!("{} has an invalid value: {}", key, raw))
            }),
            None => Ok(None),
        }
    }

    /// Ensure the client state and log directories exist
    pub fn ensure_directories(&self) -> Result<(), TextBriefError> {
        for dir in [&self.data_dir, &self.log_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    TextBriefError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), TextBriefError> {
        for (name, url) in [
            ("OPENAI_API_URL", &self.openai_api_url),
            ("MISTRAL_API_URL", &self.mistral_api_url),
            ("ANTHROPIC_API_URL", &self.anthropic_api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TextBriefError::config(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        if self.server_port == 0 {
            return Err(TextBriefError::config("Server port cannot be 0"));
        }

        if self.request_timeout_secs == 0 || self.extraction_timeout_secs == 0 {
            return Err(TextBriefError::config("Timeouts must be at least one second"));
        }

        if !(0.0..=2.0).contains(&self.summary_temperature) {
            return Err(TextBriefError::config(
                "Summary temperature must be between 0 and 2",
            ));
        }

        if let Some(max) = self.max_output_tokens {
            if max < self.min_output_tokens {
                return Err(TextBriefError::config(
                    "MAX_OUTPUT_TOKENS cannot be lower than MIN_OUTPUT_TOKENS",
                ));
            }
        }

        Ok(())
    }
}
