/*!
 * # overlay-translator
 *
 * Translation core of a screen-overlay translator: recognized text from a
 * captured screen region goes in, a word-wrapped, size-fitted text block for
 * drawing back over that region comes out.
 *
 * ## Features
 *
 * - Sentence segmentation with ellipsis normalization
 * - CJK detection driving wrapping and glyph-width estimates
 * - Persistent first-write-wins translation cache per session, language
 *   pair and provider
 * - Versioned per-session configuration with archive-and-reset on upgrade
 * - Largest-font layout search for a target rectangle
 * - Translation providers:
 *   - Ollama (local LLM)
 *   - Google web translation
 * - Optional dictionary spell correction of recognized text
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Process-level configuration
 * - `app_controller`: Composition root exposing `fit_and_translate`
 * - `text`: Script classification, segmentation and spell correction
 * - `translation`: Sentence orchestration and the translation cache:
 *   - `translation::core`: Cache-then-provider translation of sentences
 *   - `translation::cache`: SQLite-backed cache stores
 * - `session`: Session identity, config store and on-disk layout
 * - `layout`: Layout fitting and the overlay payload
 * - `database`: SQLite connection and schema plumbing
 * - `language_utils`: ISO language code utilities
 * - `providers`: Translation backends behind the `Provider` trait
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod language_utils;
pub mod layout;
pub mod providers;
pub mod session;
pub mod text;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, CacheError, InputError, ProviderError, TranslationError};
pub use language_utils::{canonicalize, get_language_name, language_codes_match};
pub use layout::{LayoutPlan, OverlayPayload, Rect, fit};
pub use session::{SessionConfig, SessionConfigPatch, SessionId};
pub use text::{aspect_ratio, is_cjk_dominant, split_into_sentences};
pub use translation::{TranslationCache, TranslationService};
