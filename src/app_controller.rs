use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

use crate::app_config::Config;
use crate::database::DatabaseStats;
use crate::errors::{AppError, InputError};
use crate::layout::{self, LayoutPlan, Rect};
use crate::providers::{Google, MockProvider, Ollama, Provider, ProviderKind};
use crate::session::{SessionConfig, SessionConfigPatch, SessionId, SessionManager};
use crate::text::{SpellingResource, aspect_ratio};
use crate::translation::TranslationService;

// @module: Application controller for overlay translation

/// Main application controller: recognized text in, layout plan out
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Session configs and caches
    sessions: SessionManager,

    // @field: Sentence translation over the selected provider
    translator: TranslationService,

    // @field: Spell checker shared by every session
    spelling: Arc<SpellingResource>,
}

impl Controller {
    // @method: Create a controller, building the provider named in the config
    pub fn with_config(config: Config) -> Result<Self> {
        let provider = Self::build_provider(&config);
        let data_dir = config.data_dir()?;
        Self::with_provider(config, provider, data_dir)
    }

    /// Create a controller around an already built provider
    pub fn with_provider<P: AsRef<Path>>(config: Config, provider: Arc<dyn Provider>, data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

        let spelling = Arc::new(SpellingResource::new(config.spell_dictionary.clone()));
        let sessions = SessionManager::new(data_dir).with_config_hook(spelling.clone());
        let translator = TranslationService::new(provider, sessions.cache().clone(), config.call_timeout());

        info!(
            "Using {} provider, session data in {:?}",
            translator.provider().kind(),
            data_dir
        );

        Ok(Self {
            config,
            sessions,
            translator,
            spelling,
        })
    }

    /// Create a controller for tests around a mock provider
    pub fn new_for_test<P: AsRef<Path>>(data_dir: P, provider: MockProvider) -> Result<Self> {
        let config = Config {
            provider: ProviderKind::Mock,
            ..Config::default()
        };
        Self::with_provider(config, Arc::new(provider), data_dir)
    }

    /// Select the provider once; nothing downstream branches on its kind
    pub fn build_provider(config: &Config) -> Arc<dyn Provider> {
        match config.provider {
            ProviderKind::Ollama => {
                let ollama = &config.providers.ollama;
                Arc::new(Ollama::new_with_config(
                    &ollama.endpoint,
                    &ollama.model,
                    ollama.timeout_secs,
                    ollama.max_retries,
                    ollama.retry_backoff_ms,
                ))
            }
            ProviderKind::Google => {
                let google = &config.providers.google;
                Arc::new(Google::new(&google.endpoint, google.timeout_secs))
            }
            ProviderKind::Mock => Arc::new(MockProvider::working()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn translator(&self) -> &TranslationService {
        &self.translator
    }

    /// Translate recognized text and fit it into the overlay rectangle
    pub async fn fit_and_translate(
        &self,
        session: &SessionId,
        raw_text: &str,
        rect: &Rect,
    ) -> Result<LayoutPlan, AppError> {
        if raw_text.trim().is_empty() {
            return Err(InputError::EmptyText.into());
        }

        let config = self.sessions.load_config(session).await?;

        let text = if config.text_processing.enable_spell_correction {
            let corrected = self.spelling.correct(raw_text);
            if corrected != raw_text {
                debug!("Spell-corrected input: {}", corrected);
            }
            corrected
        } else {
            raw_text.to_string()
        };

        let translated = self.translator.translate_text(&text, &config, session).await?;
        info!("Session {}: {}", session, translated.stats);

        let ratio = aspect_ratio(&translated.text);
        Ok(layout::fit(&translated.text, rect, ratio))
    }

    /// Current config of a session, created with defaults on first use
    pub async fn session_config(&self, session: &SessionId) -> Result<SessionConfig, AppError> {
        Ok(self.sessions.load_config(session).await?)
    }

    /// Apply a validated patch to a session's config
    pub async fn update_session_config(
        &self,
        session: &SessionId,
        patch: SessionConfigPatch,
    ) -> Result<SessionConfig, AppError> {
        let updated = self.sessions.update_config(session, patch).await.map_err(|e| {
            match e.downcast::<InputError>() {
                Ok(input) => AppError::Input(input),
                Err(other) => AppError::from(other),
            }
        })?;
        info!("Session {} config updated", session);
        Ok(updated)
    }

    /// Cache stores of a session with their statistics
    pub fn cache_summary(&self, session: &SessionId) -> Result<Vec<(String, DatabaseStats)>, AppError> {
        Ok(self.sessions.cache_summary(session)?)
    }

    /// Check that the provider is reachable
    pub async fn test_connection(&self) -> Result<(), AppError> {
        Ok(self.translator.provider().test_connection().await?)
    }
}
