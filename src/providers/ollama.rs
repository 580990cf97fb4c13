use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{Provider, ProviderKind};

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// Model used for translation
    model: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    pub done: bool,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: None,
        }
    }

    /// Set the system message
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }

    /// Ask for a single JSON object instead of a stream
    pub fn no_stream(mut self) -> Self {
        self.stream = Some(false);
        self
    }
}

const SYSTEM_PROMPT: &str = "You are a translator of short on-screen text. \
Reply with the translation only, without quotes, notes or explanations.";

/// Build the translation prompt for one sentence
pub fn build_prompt(sentence: &str, src_name: &str, dest_name: &str) -> String {
    format!(
        "Translate the following {} text to {}:\n\n{}",
        src_name, dest_name, sentence
    )
}

/// Add a scheme and port to a bare host
fn normalize_base_url(endpoint: &str, default_port: u16) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');

    let (scheme, host) = match endpoint.split_once("://") {
        Some((scheme, host)) => (scheme, host),
        None => ("http", endpoint),
    };

    if host.contains(':') {
        format!("{}://{}", scheme, host)
    } else {
        format!("{}://{}:{}", scheme, host, default_port)
    }
}

impl Ollama {
    /// Default port of a local Ollama server
    pub const DEFAULT_PORT: u16 = 11434;

    /// Create a new Ollama client with configuration
    ///
    /// Ollama speaks HTTP/1.1; connections are kept alive between sentences.
    pub fn new_with_config(
        endpoint: impl AsRef<str>,
        model: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        Self {
            base_url: normalize_base_url(endpoint.as_ref(), Self::DEFAULT_PORT),
            model: model.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate text from the Ollama API with retry logic
    ///
    /// Server errors and network failures are retried with exponential
    /// backoff; client errors fail immediately.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            match self.client.post(&url).json(request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text().await.map_err(|e| {
                            ProviderError::ParseError(format!("Failed to read Ollama response: {}", e))
                        })?;
                        return serde_json::from_str::<GenerationResponse>(&body).map_err(|e| {
                            error!(
                                "Failed to parse Ollama API response: {}. Raw response (first 500 chars): {}",
                                e,
                                body.chars().take(500).collect::<String>()
                            );
                            ProviderError::ParseError(e.to_string())
                        });
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());

                    if status.is_server_error() {
                        error!(
                            "Ollama API error ({}): {} - attempt {}/{}",
                            status,
                            error_text,
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    } else {
                        error!("Ollama API error ({}): {}", status, error_text);
                        return Err(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    }
                }
                Err(e) => {
                    error!(
                        "Ollama API network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(ProviderError::ConnectionError(e.to_string()));
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "Ollama API request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        response["version"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }
}

#[async_trait]
impl Provider for Ollama {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    /// Ollama prompts use English language names rather than codes
    fn provider_code(&self, canonical: &str) -> Result<String, ProviderError> {
        language_utils::get_language_name(canonical).map_err(|_| ProviderError::UnsupportedLanguage {
            provider: self.kind().to_string(),
            code: canonical.to_string(),
        })
    }

    async fn translate(
        &self,
        sentence: &str,
        src_code: &str,
        dest_code: &str,
    ) -> Result<String, ProviderError> {
        let request = GenerationRequest::new(&self.model, build_prompt(sentence, src_code, dest_code))
            .system(SYSTEM_PROMPT)
            .temperature(0.1)
            .no_stream();

        let response = self.generate(&request).await?;
        debug!(
            "Ollama translated {} chars with {} ({:?} tokens)",
            sentence.chars().count(),
            response.model,
            response.eval_count
        );

        let translated = response.response.trim();
        if translated.is_empty() {
            return Err(ProviderError::ParseError("Ollama returned an empty translation".to_string()));
        }
        Ok(translated.to_string())
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let version = self.version().await?;
        debug!("Connected to Ollama {} at {}", version, self.base_url);
        Ok(())
    }
}
