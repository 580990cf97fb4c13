/*!
 * Error types for the overlay-translator application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with translation providers
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider has no code for the requested language
    #[error("Provider '{provider}' does not support language '{code}'")]
    UnsupportedLanguage {
        /// Provider identifier
        provider: String,
        /// Canonical language code that was requested
        code: String,
    },

    /// The provider did not answer within the configured time
    #[error("Provider call timed out after {seconds}s")]
    Timeout {
        /// Configured timeout
        seconds: u64,
    },
}

/// Errors raised by the persistent translation cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store could not be opened, read or written
    #[error("Translation cache unavailable: {0}")]
    Unavailable(String),

    /// Two different sentences produced the same digest
    #[error("Cache key collision for digest {hash}")]
    HashCollision {
        /// Hex digest shared by both sentences
        hash: String,
    },
}

impl From<rusqlite::Error> for CacheError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Unavailable(error.to_string())
    }
}

impl From<anyhow::Error> for CacheError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unavailable(format!("{:#}", error))
    }
}

/// Errors caused by invalid caller input; never retried
#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    /// Overlay rectangle is empty or inverted
    #[error("Invalid translation or output area: {0}")]
    InvalidRect(String),

    /// Nothing to translate
    #[error("No text recognized")]
    EmptyText,

    /// Session identifier cannot be used as a file name
    #[error("Invalid session identifier: {0}")]
    InvalidSession(String),

    /// Configuration patch failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Caller supplied unusable input
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// The provider rejected the request before any sentence was sent
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A sentence could not be translated
    #[error("Failed to translate sentence {index} ('{sentence}'): {source}")]
    SentenceFailed {
        /// Position of the sentence in segmentation order
        index: usize,
        /// The sentence that failed
        sentence: String,
        /// Underlying provider failure
        #[source]
        source: ProviderError,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the translation cache
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Error from caller input
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Whether this error was caused by the caller rather than the system
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Input(_) | Self::Translation(TranslationError::Input(_))
        )
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(format!("{:#}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
