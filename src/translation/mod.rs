/*!
 * Translation of recognized text.
 *
 * - `cache`: persistent first-write-wins cache, one store per namespace
 * - `core`: sentence-by-sentence orchestration over a provider and the cache
 */

pub use self::cache::{PutOutcome, TranslationCache, content_hash};
pub use self::core::{
    Origin, SentenceOutcome, SentenceResult, TranslatedText, TranslationService, TranslationStats,
};

pub mod cache;
pub mod core;
