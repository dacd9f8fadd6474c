use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::timecode::SubtitleFormat;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Output subtitle format
    #[serde(default)]
    pub output_format: SubtitleFormat,

    /// Cap on generated cue durations in seconds
    #[serde(default = "default_max_chunk_seconds")]
    pub max_chunk_seconds: u32,

    /// Deadline for the whole transcript fetch, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Upload size limit in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    /// Proofreading input cap in characters
    #[serde(default = "default_max_suggest_chars")]
    pub max_suggest_chars: usize,

    /// Language candidates for the timed-text fallback, in preference
    /// order; an "a." prefix marks the auto-generated variant
    #[serde(default = "default_language_hints")]
    pub language_hints: Vec<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: log crate filter for this level
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_max_chunk_seconds() -> u32 {
    crate::segmenter::DEFAULT_MAX_CHUNK_SECONDS
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_max_upload_bytes() -> u64 {
    25 * 1024 * 1024
}

fn default_max_suggest_chars() -> usize {
    crate::correction::MAX_SUGGEST_INPUT_CHARS
}

fn default_language_hints() -> Vec<String> {
    [
        "en", "a.en", "ar", "a.ar", "es", "a.es", "fr", "a.fr", "de", "a.de", "pt", "a.pt", "ja",
        "a.ja",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            output_format: SubtitleFormat::default(),
            max_chunk_seconds: default_max_chunk_seconds(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            max_upload_bytes: default_max_upload_bytes(),
            max_suggest_chars: default_max_suggest_chars(),
            language_hints: default_language_hints(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to a JSON file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Default location for the config file, under the platform config
    /// directory when one exists
    pub fn default_path() -> std::path::PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("yascap").join("conf.json"))
            .unwrap_or_else(|| std::path::PathBuf::from("conf.json"))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if self.max_chunk_seconds < 2 {
            return Err(anyhow!(
                "max_chunk_seconds must be at least 2, got {}",
                self.max_chunk_seconds
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(anyhow!("fetch_timeout_secs must be greater than zero"));
        }
        if self.language_hints.is_empty() {
            return Err(anyhow!("language_hints must not be empty"));
        }

        Ok(())
    }
}
