use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::providers::ProviderKind;
use crate::providers::google::DEFAULT_ENDPOINT as DEFAULT_GOOGLE_ENDPOINT;

/// Application configuration module
/// This module handles the process-wide configuration: which translation
/// provider to use, how to reach it, and where session data lives.
/// Per-session settings are kept in `session::config`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Translation provider to use
    #[serde(default)]
    pub provider: ProviderKind,

    /// Settings for every provider
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Root of session configs and caches; platform data dir when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Frequency dictionary for spell correction (`word count` per line)
    #[serde(default)]
    pub spell_dictionary: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Provider settings, one section per backend
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub google: GoogleConfig,
}

/// Ollama service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OllamaConfig {
    /// Service endpoint URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// Model name (e.g., "llama3", "mistral")
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub max_retries: u32,

    /// Backoff base for retries (in milliseconds), doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ollama_endpoint(),
            model: default_ollama_model(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Google web translation configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GoogleConfig {
    /// Service endpoint URL
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_google_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            endpoint: default_google_endpoint(),
            timeout_secs: default_google_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_google_timeout_secs() -> u64 {
    10
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

fn default_google_endpoint() -> String {
    DEFAULT_GOOGLE_ENDPOINT.to_string()
}

/// Name of the data directory under the platform data dir
const APP_DIR_NAME: &str = "overlay-translator";

impl Config {
    /// Load the configuration, writing defaults if the file does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path));
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        match self.provider {
            ProviderKind::Ollama => {
                let ollama = &self.providers.ollama;
                if ollama.model.trim().is_empty() {
                    return Err(anyhow!("Ollama model name cannot be empty"));
                }
                validate_endpoint("Ollama", &ollama.endpoint)?;
                validate_timeout("Ollama", ollama.timeout_secs)?;
            }
            ProviderKind::Google => {
                let google = &self.providers.google;
                validate_endpoint("Google", &google.endpoint)?;
                validate_timeout("Google", google.timeout_secs)?;
            }
            ProviderKind::Mock => {}
        }

        if let Some(dictionary) = &self.spell_dictionary {
            if !dictionary.is_file() {
                warn!("Spelling dictionary {:?} does not exist; spell correction will stay off", dictionary);
            }
        }

        Ok(())
    }

    /// Effective data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_local_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or_else(|| anyhow!("No platform data directory; set data_dir in the config")),
        }
    }

    /// Upper bound on one translation call, retries included
    pub fn call_timeout(&self) -> Duration {
        let secs = match self.provider {
            ProviderKind::Ollama => {
                let ollama = &self.providers.ollama;
                ollama.timeout_secs * (u64::from(ollama.max_retries) + 1)
                    + ollama.retry_backoff_ms * ((1u64 << ollama.max_retries.min(16)) - 1) / 1000
            }
            ProviderKind::Google => self.providers.google.timeout_secs,
            ProviderKind::Mock => default_timeout_secs(),
        };
        Duration::from_secs(secs.max(1))
    }
}

/// Endpoints without a scheme are accepted with `http://` assumed
fn validate_endpoint(provider: &str, endpoint: &str) -> Result<()> {
    let candidate = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    };
    Url::parse(&candidate)
        .map(|_| ())
        .map_err(|e| anyhow!("Invalid {} endpoint '{}': {}", provider, endpoint, e))
}

fn validate_timeout(provider: &str, timeout_secs: u64) -> Result<()> {
    if timeout_secs == 0 {
        return Err(anyhow!("{} timeout must be greater than zero", provider));
    }
    Ok(())
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            provider: ProviderKind::default(),
            providers: ProvidersConfig::default(),
            data_dir: None,
            spell_dictionary: None,
            log_level: LogLevel::default(),
        }
    }
}
