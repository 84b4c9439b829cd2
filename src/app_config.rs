use anyhow::{anyhow, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and sanitizing configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Modpack name used as the first key segment and output folder
    #[serde(default)]
    pub modpack_name: String,

    /// Directory holding the chapter files
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Root of the output tree; files land in `<output_dir>/<modpack_name>`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Number of chapters processed at the same time
    #[serde(default = "default_concurrent_chapters")]
    pub concurrent_chapters: usize,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: DeepL API, requires an auth key
    DeepL,
    // @provider: Google Translate web endpoint, no key
    #[default]
    Google,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::DeepL => "DeepL",
            Self::Google => "Google Translate",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::DeepL => "deepl".to_string(),
            Self::Google => "google".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deepl" => Ok(Self::DeepL),
            "google" => Ok(Self::Google),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Whether a machine-translated catalog and resource pack are produced
    #[serde(default)]
    pub enabled: bool,

    /// Translation backend to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Target language code (e.g. "ko", "es", "zh-CN")
    #[serde(default)]
    pub target_language: String,

    /// Target locale code (e.g. "kr", "es"); free text
    #[serde(default)]
    pub target_locale: String,

    /// DeepL auth key; usually supplied through DEEPL_AUTH_KEY instead
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Service URL override; empty selects the backend default
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Max concurrent requests per field kind
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl TranslationConfig {
    /// Language file stem, e.g. `ko_kr`
    pub fn language_file_stem(&self) -> String {
        format!("{}_{}", self.target_language, self.target_locale)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: TranslationProvider::default(),
            target_language: String::new(),
            target_locale: String::new(),
            api_key: String::new(),
            endpoint: String::new(),
            concurrent_requests: default_concurrent_requests(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
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

/// Characters that cannot appear in a key segment or a folder name
const ILLEGAL_NAME_CHARS: &[char] = &['~', '"', '#', '%', '&', '*', ':', '<', '>', '?', '/', '\\', '{', '|', '}'];

/// Strip characters that are illegal in a key segment or path
pub fn sanitize_modpack_name(name: &str) -> String {
    name.trim().chars().filter(|c| !ILLEGAL_NAME_CHARS.contains(c)).collect()
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("ftbquests/quests/chapters")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_concurrent_chapters() -> usize {
    4
}

fn default_concurrent_requests() -> usize {
    8
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Sanitize user-provided values in place
    pub fn normalize(&mut self) {
        self.modpack_name = sanitize_modpack_name(&self.modpack_name);
        self.translation.target_language = self.translation.target_language.trim().to_string();
        self.translation.target_locale = self.translation.target_locale.trim().to_lowercase();
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if sanitize_modpack_name(&self.modpack_name).is_empty() {
            return Err(anyhow!("Modpack name is required"));
        }

        if self.concurrent_chapters == 0 {
            return Err(anyhow!("concurrent_chapters must be at least 1"));
        }

        if !self.translation.enabled {
            return Ok(());
        }

        crate::language_utils::validate_target_language(&self.translation.target_language)?;

        let locale = &self.translation.target_locale;
        if locale.is_empty() {
            return Err(anyhow!("Target locale is required when translation is enabled"));
        }
        if !locale.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(anyhow!("Invalid target locale: {}", locale));
        }

        if self.translation.provider == TranslationProvider::DeepL && self.translation.api_key.is_empty() {
            // Not fatal: every string falls back to its source text
            warn!("No DeepL auth key configured (set DEEPL_AUTH_KEY); translations will keep the source text");
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            modpack_name: String::new(),
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            concurrent_chapters: default_concurrent_chapters(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
