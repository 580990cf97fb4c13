/*!
 * Session manager for per-session state on disk.
 *
 * A session owns one config file and any number of cache stores:
 *
 * ```text
 * <data_dir>/<session>.json
 * <data_dir>/<session>/cache/<src>_<dest>_<provider>.sqlite3
 * ```
 *
 * Sessions are created implicitly on first use and never deleted here.
 */

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::database::DatabaseStats;
use crate::errors::CacheError;
use crate::session::config::{ConfigHook, ConfigStore, SessionConfig, SessionConfigPatch};
use crate::session::models::SessionId;
use crate::translation::cache::TranslationCache;

/// Session manager for config and cache storage of every session
#[derive(Clone)]
pub struct SessionManager {
    /// Root of all session data
    data_dir: PathBuf,
    /// Versioned config files
    configs: ConfigStore,
    /// Cache stores, rooted at `data_dir`
    cache: TranslationCache,
}

impl SessionManager {
    /// Create a session manager rooted at `data_dir`
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            configs: ConfigStore::new(&data_dir),
            cache: TranslationCache::new(&data_dir),
            data_dir,
        }
    }

    /// Register a config side effect
    pub fn with_config_hook(mut self, hook: Arc<dyn ConfigHook>) -> Self {
        self.configs = self.configs.with_hook(hook);
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn configs(&self) -> &ConfigStore {
        &self.configs
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Load a session's config off the async runtime threads
    pub async fn load_config(&self, session: &SessionId) -> Result<SessionConfig> {
        let configs = self.configs.clone();
        let session = session.clone();
        tokio::task::spawn_blocking(move || configs.load(&session))
            .await
            .context("Config load task panicked")?
    }

    /// Patch and persist a session's config
    pub async fn update_config(&self, session: &SessionId, patch: SessionConfigPatch) -> Result<SessionConfig> {
        let configs = self.configs.clone();
        let session = session.clone();
        tokio::task::spawn_blocking(move || configs.update(&session, &patch))
            .await
            .context("Config update task panicked")?
    }

    /// Cache stores of a session with their statistics
    pub fn cache_summary(&self, session: &SessionId) -> Result<Vec<(String, DatabaseStats)>, CacheError> {
        self.cache.list_session_stores(session)
    }

    /// Sessions that have a config file
    pub fn list_sessions(&self) -> Result<Vec<SessionId>> {
        if !self.data_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut sessions = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir)
            .with_context(|| format!("Failed to list data directory: {:?}", self.data_dir))?
        {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match SessionId::new(stem) {
                Ok(session) => sessions.push(session),
                Err(e) => debug!("Ignoring {:?}: {}", path, e),
            }
        }
        sessions.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        Ok(sessions)
    }
}
