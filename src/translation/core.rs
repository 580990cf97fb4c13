/*!
 * Core translation service implementation.
 *
 * This module contains the `TranslationService`, which turns recognized text
 * into translated text one sentence at a time: cache first, provider on a
 * miss, and a conditional write-back of fresh results.
 */

use log::{debug, error, warn};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::errors::{InputError, ProviderError, TranslationError};
use crate::providers::Provider;
use crate::session::config::{CachingConfig, SessionConfig};
use crate::session::models::{CacheNamespace, SessionId};
use crate::text::segmenter::{is_bare_terminal, split_into_sentences};

use super::cache::{PutOutcome, TranslationCache};

/// Where a translation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Provider,
}

/// Outcome of translating one sentence
#[derive(Debug)]
pub enum SentenceOutcome {
    /// A translation that differs from the input
    Translated { text: String, origin: Origin },
    /// The provider returned the input unchanged; nothing is cached
    Unchanged,
    /// The provider failed; nothing is cached
    Failed(ProviderError),
}

/// One translated sentence
#[derive(Debug)]
pub struct SentenceResult {
    /// Sentence as segmented
    pub source: String,
    /// What happened to it
    pub outcome: SentenceOutcome,
}

impl SentenceResult {
    /// Text to place in the joined output
    pub fn output(&self) -> &str {
        match &self.outcome {
            SentenceOutcome::Translated { text, .. } => text,
            SentenceOutcome::Unchanged | SentenceOutcome::Failed(_) => &self.source,
        }
    }
}

/// Per-call statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationStats {
    /// Sentences answered from the cache
    pub cache_hits: usize,
    /// Sentences sent to the provider
    pub provider_calls: usize,
    /// Sentences the provider returned unchanged
    pub unchanged: usize,
    /// Sentences dropped before translation (bare punctuation)
    pub skipped: usize,
    /// Fresh translations written to the cache
    pub cached_writes: usize,
    /// Wall time of the whole call
    pub duration: Duration,
}

impl fmt::Display for TranslationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cached, {} translated ({} unchanged), {} skipped, {} stored in {:.2?}",
            self.cache_hits,
            self.provider_calls,
            self.unchanged,
            self.skipped,
            self.cached_writes,
            self.duration
        )
    }
}

/// Result of `translate_text`
#[derive(Debug)]
pub struct TranslatedText {
    /// Sentence outputs joined with single spaces
    pub text: String,
    /// Per-sentence results in segmentation order
    pub sentences: Vec<SentenceResult>,
    pub stats: TranslationStats,
}

/// Provider-specific codes for one request
#[derive(Debug, Clone)]
struct LanguageCodes {
    src: String,
    dest: String,
}

/// Main translation service
#[derive(Clone)]
pub struct TranslationService {
    /// Backend chosen at startup
    provider: Arc<dyn Provider>,

    /// Translation cache shared by every session
    cache: TranslationCache,

    /// Upper bound on a single provider call
    call_timeout: Duration,
}

impl TranslationService {
    /// Create a new translation service
    pub fn new(provider: Arc<dyn Provider>, cache: TranslationCache, call_timeout: Duration) -> Self {
        Self {
            provider,
            cache,
            call_timeout,
        }
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Cache namespace used for `session` under `config`
    pub fn namespace(&self, session: &SessionId, config: &SessionConfig) -> CacheNamespace {
        CacheNamespace::new(
            session.clone(),
            &config.translation.src_lang,
            &config.translation.dest_lang,
            self.provider.kind().as_str(),
        )
    }

    /// Translate recognized text for a session.
    ///
    /// Sentences are translated in order, one at a time. The first provider
    /// failure aborts the call; no partially translated text is returned.
    pub async fn translate_text(
        &self,
        full_text: &str,
        config: &SessionConfig,
        session: &SessionId,
    ) -> Result<TranslatedText, TranslationError> {
        let start = Instant::now();

        if full_text.trim().is_empty() {
            return Err(InputError::EmptyText.into());
        }

        let codes = LanguageCodes {
            src: self.provider.provider_code(&config.translation.src_lang)?,
            dest: self.provider.provider_code(&config.translation.dest_lang)?,
        };
        let namespace = self.namespace(session, config);

        let candidates = if config.text_processing.split_sentences {
            split_into_sentences(full_text)
        } else {
            vec![full_text.trim().to_string()]
        };

        let mut stats = TranslationStats::default();
        let mut sentences = Vec::with_capacity(candidates.len());

        for (index, sentence) in candidates.into_iter().enumerate() {
            if sentence.is_empty() || is_bare_terminal(&sentence) {
                stats.skipped += 1;
                continue;
            }

            let outcome = self
                .translate_sentence(&namespace, &sentence, &codes, &config.caching, &mut stats)
                .await;

            if let SentenceOutcome::Failed(source) = outcome {
                return Err(TranslationError::SentenceFailed {
                    index,
                    sentence,
                    source,
                });
            }

            sentences.push(SentenceResult {
                source: sentence,
                outcome,
            });
        }

        let text = sentences
            .iter()
            .map(SentenceResult::output)
            .collect::<Vec<_>>()
            .join(" ");

        stats.duration = start.elapsed();
        debug!("Translated for {}: {}", namespace, stats);

        Ok(TranslatedText {
            text,
            sentences,
            stats,
        })
    }

    async fn translate_sentence(
        &self,
        namespace: &CacheNamespace,
        sentence: &str,
        codes: &LanguageCodes,
        caching: &CachingConfig,
        stats: &mut TranslationStats,
    ) -> SentenceOutcome {
        if caching.use_cache {
            match self.cache.get(namespace, sentence).await {
                Ok(Some(text)) => {
                    stats.cache_hits += 1;
                    return SentenceOutcome::Translated {
                        text,
                        origin: Origin::Cache,
                    };
                }
                Ok(None) => {}
                Err(e) => warn!("Cache lookup failed, treating as miss: {}", e),
            }
        }

        stats.provider_calls += 1;
        let translated = match self.call_provider(sentence, codes).await {
            Ok(translated) => translated,
            Err(e) => {
                error!("Translation failed for '{}': {}", sentence, e);
                return SentenceOutcome::Failed(e);
            }
        };

        if translated.trim() == sentence.trim() {
            stats.unchanged += 1;
            return SentenceOutcome::Unchanged;
        }

        if caching.cache_translation {
            match self.cache.put(namespace, sentence, &translated).await {
                Ok(PutOutcome::Inserted) => stats.cached_writes += 1,
                Ok(PutOutcome::AlreadyPresent) => {}
                Err(e) => warn!("Failed to cache translation: {}", e),
            }
        }

        SentenceOutcome::Translated {
            text: translated,
            origin: Origin::Provider,
        }
    }

    async fn call_provider(&self, sentence: &str, codes: &LanguageCodes) -> Result<String, ProviderError> {
        match tokio::time::timeout(
            self.call_timeout,
            self.provider.translate(sentence, &codes.src, &codes.dest),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                seconds: self.call_timeout.as_secs(),
            }),
        }
    }
}
