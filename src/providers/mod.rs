/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported backends:
 * - Ollama: Local LLM server
 * - Google: Public web translation endpoint
 * - Mock: Deterministic in-process provider for tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

use crate::errors::ProviderError;

/// Supported translation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local model served by Ollama
    #[default]
    Ollama,
    /// Google web translation
    Google,
    /// In-process mock (testing only)
    Mock,
}

impl ProviderKind {
    /// Identifier used in cache namespaces and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Google => "google",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "google" => Ok(Self::Google),
            "mock" => Ok(Self::Mock),
            other => Err(anyhow::anyhow!("Unknown provider: {}", other)),
        }
    }
}

/// Common trait for all translation providers
///
/// One implementation is selected when the application starts and shared
/// as `Arc<dyn Provider>`; callers never branch on the concrete backend.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Which backend this is
    fn kind(&self) -> ProviderKind;

    /// Provider-specific code for a canonical ISO 639-3 code
    ///
    /// # Returns
    /// * `ProviderError::UnsupportedLanguage` if the backend has no such language
    fn provider_code(&self, canonical: &str) -> Result<String, ProviderError>;

    /// Translate one sentence between two provider-specific codes
    ///
    /// # Arguments
    /// * `sentence` - The text to translate
    /// * `src_code` - Source language, as returned by `provider_code`
    /// * `dest_code` - Destination language, as returned by `provider_code`
    async fn translate(
        &self,
        sentence: &str,
        src_code: &str,
        dest_code: &str,
    ) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Look up `canonical` in a provider table, failing closed
pub(crate) fn code_from_table(
    kind: ProviderKind,
    table: &[(&str, &str)],
    canonical: &str,
) -> Result<String, ProviderError> {
    crate::language_utils::lookup_provider_code(table, canonical)
        .map(str::to_string)
        .ok_or_else(|| ProviderError::UnsupportedLanguage {
            provider: kind.to_string(),
            code: canonical.to_string(),
        })
}

pub mod google;
pub mod mock;
pub mod ollama;

pub use google::Google;
pub use mock::{MockBehavior, MockProvider};
pub use ollama::Ollama;
