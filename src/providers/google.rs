/*!
 * Google web translation provider.
 *
 * Uses the keyless `translate_a/single` endpoint of the public web client.
 * The response is a nested JSON array whose first element lists translated
 * segments; the segments are concatenated in order.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{Provider, ProviderKind, code_from_table};

/// Canonical code to Google code
pub const GOOGLE_LANGUAGES: &[(&str, &str)] = &[
    ("eng", "en"),
    ("fra", "fr"),
    ("deu", "de"),
    ("jpn", "ja"),
    ("kor", "ko"),
    ("rus", "ru"),
    ("zho", "zh-cn"),
    ("ukr", "uk"),
    ("zht", "zh-tw"),
];

/// Default endpoint of the web client
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Google web translation client
#[derive(Debug)]
pub struct Google {
    /// Endpoint URL, without query
    endpoint: String,
    /// HTTP client for making requests
    client: Client,
}

impl Google {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    fn request_url(&self, sentence: &str, src_code: &str, dest_code: &str) -> Result<Url, ProviderError> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", src_code),
                ("tl", dest_code),
                ("dt", "t"),
                ("q", sentence),
            ],
        )
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid Google endpoint {}: {}", self.endpoint, e)))
    }
}

/// Concatenate the translated segments of a web-client response
pub fn parse_response(value: &serde_json::Value) -> Result<String, ProviderError> {
    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| ProviderError::ParseError("Missing translation segments".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|s| s.as_str()))
        .collect();

    if text.is_empty() {
        return Err(ProviderError::ParseError("Google returned an empty translation".to_string()));
    }

    Ok(text.replace(" -", "-"))
}

#[async_trait]
impl Provider for Google {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn provider_code(&self, canonical: &str) -> Result<String, ProviderError> {
        code_from_table(self.kind(), GOOGLE_LANGUAGES, canonical)
    }

    async fn translate(
        &self,
        sentence: &str,
        src_code: &str,
        dest_code: &str,
    ) -> Result<String, ProviderError> {
        let url = self.request_url(sentence, src_code, dest_code)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded(format!("Google responded {}", status)));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google API error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let translated = parse_response(&value)?;
        debug!("Google translated {} -> {} chars", sentence.chars().count(), translated.chars().count());
        Ok(translated)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate("test", "en", "de").await.map(|_| ())
    }
}
