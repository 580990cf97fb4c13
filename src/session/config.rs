/*!
 * Versioned per-session configuration.
 *
 * Each session keeps one JSON file `<data_dir>/<session>.json`. A file
 * written by a different major version is archived next to itself with a
 * `.v<version>` suffix and replaced by defaults; old values are never
 * migrated field by field.
 */

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::InputError;
use crate::language_utils;
use crate::session::models::SessionId;
use crate::text::SpellingResource;

/// Version written into fresh session configs
pub const CONFIG_VERSION: &str = "5.0.0";

/// Version assumed for files that predate the `version` field
const LEGACY_VERSION: &str = "1.0.0";

/// Per-session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Schema version, `major.minor.patch`
    pub version: String,

    /// Language pair, as canonical ISO 639-3 codes
    #[serde(default)]
    pub translation: LanguagePair,

    /// Cache behavior
    #[serde(default)]
    pub caching: CachingConfig,

    /// Recognized-text processing
    #[serde(default)]
    pub text_processing: TextProcessingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub src_lang: String,
    pub dest_lang: String,
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            src_lang: "eng".to_string(),
            dest_lang: "rus".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachingConfig {
    /// Store fresh translations in the cache
    #[serde(default = "default_true")]
    pub cache_translation: bool,

    /// Consult the cache before calling the provider
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

impl Default for CachingConfig {
    fn default() -> Self {
        Self {
            cache_translation: true,
            use_cache: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProcessingConfig {
    /// Translate sentence by sentence instead of the whole text at once
    #[serde(default = "default_true")]
    pub split_sentences: bool,

    /// Run dictionary spell correction on recognized text
    #[serde(default)]
    pub enable_spell_correction: bool,
}

impl Default for TextProcessingConfig {
    fn default() -> Self {
        Self {
            split_sentences: true,
            enable_spell_correction: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            translation: LanguagePair::default(),
            caching: CachingConfig::default(),
            text_processing: TextProcessingConfig::default(),
        }
    }
}

/// Partial update of a session config; absent fields keep their value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfigPatch {
    pub translation: Option<LanguagePairPatch>,
    pub caching: Option<CachingPatch>,
    pub text_processing: Option<TextProcessingPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguagePairPatch {
    pub src_lang: Option<String>,
    pub dest_lang: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CachingPatch {
    pub cache_translation: Option<bool>,
    pub use_cache: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextProcessingPatch {
    pub split_sentences: Option<bool>,
    pub enable_spell_correction: Option<bool>,
}

impl SessionConfigPatch {
    /// Parse a JSON patch, rejecting keys outside the schema
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        serde_json::from_str(json).map_err(|e| InputError::InvalidConfig(e.to_string()))
    }
}

impl SessionConfig {
    /// Major component of the stored version
    pub fn major_version(&self) -> &str {
        major_of(&self.version)
    }

    /// Apply a patch. On error `self` is left unchanged.
    pub fn apply_patch(&mut self, patch: &SessionConfigPatch) -> Result<(), InputError> {
        let mut updated = self.clone();

        if let Some(translation) = &patch.translation {
            if let Some(src) = &translation.src_lang {
                updated.translation.src_lang = canonical_language(src)?;
            }
            if let Some(dest) = &translation.dest_lang {
                updated.translation.dest_lang = canonical_language(dest)?;
            }
        }

        if let Some(caching) = &patch.caching {
            if let Some(value) = caching.cache_translation {
                updated.caching.cache_translation = value;
            }
            if let Some(value) = caching.use_cache {
                updated.caching.use_cache = value;
            }
        }

        if let Some(text) = &patch.text_processing {
            if let Some(value) = text.split_sentences {
                updated.text_processing.split_sentences = value;
            }
            if let Some(value) = text.enable_spell_correction {
                updated.text_processing.enable_spell_correction = value;
            }
        }

        *self = updated;
        Ok(())
    }
}

fn canonical_language(code: &str) -> Result<String, InputError> {
    language_utils::canonicalize(code).map_err(|e| InputError::InvalidConfig(e.to_string()))
}

fn major_of(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

/// Side effect run whenever a session config is loaded or saved
pub trait ConfigHook: Send + Sync {
    fn apply(&self, session: &SessionId, config: &SessionConfig);
}

impl ConfigHook for SpellingResource {
    fn apply(&self, session: &SessionId, config: &SessionConfig) {
        if config.text_processing.enable_spell_correction {
            debug!("Session {} enables spell correction", session);
            self.ensure_loaded();
        }
    }
}

/// Loads and saves session configs under one directory
#[derive(Clone)]
pub struct ConfigStore {
    /// Directory holding `<session>.json` files
    dir: PathBuf,
    /// Hooks run after every load and save
    hooks: Vec<Arc<dyn ConfigHook>>,
}

impl ConfigStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            hooks: Vec::new(),
        }
    }

    /// Register a side effect gated by config flags
    pub fn with_hook(mut self, hook: Arc<dyn ConfigHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Path of a session's config file
    pub fn path(&self, session: &SessionId) -> PathBuf {
        self.dir.join(format!("{}.json", session))
    }

    /// Load a session's config, creating or resetting it as needed
    pub fn load(&self, session: &SessionId) -> Result<SessionConfig> {
        let path = self.path(session);

        let config = if path.exists() {
            self.read_existing(session, &path)?
        } else {
            debug!("No config for session {}, writing defaults", session);
            let config = SessionConfig::default();
            self.write(&path, &config)?;
            config
        };

        self.run_hooks(session, &config);
        Ok(config)
    }

    /// Persist a session's config and re-run flag-gated side effects
    pub fn save(&self, session: &SessionId, config: &SessionConfig) -> Result<()> {
        self.write(&self.path(session), config)?;
        self.run_hooks(session, config);
        Ok(())
    }

    /// Load, patch and save in one step
    pub fn update(&self, session: &SessionId, patch: &SessionConfigPatch) -> Result<SessionConfig> {
        let mut config = self.load(session)?;
        config.apply_patch(patch)?;
        self.save(session, &config)?;
        Ok(config)
    }

    fn read_existing(&self, session: &SessionId, path: &Path) -> Result<SessionConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session config: {:?}", path))?;

        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!("Session config {:?} is not valid JSON ({}), resetting", path, e);
                return self.archive_and_reset(path, "invalid");
            }
        };

        let stored_version = value
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or(LEGACY_VERSION)
            .to_string();

        if major_of(&stored_version) != major_of(CONFIG_VERSION) {
            info!(
                "Session {} config is v{}, current is v{}; archiving and resetting",
                session, stored_version, CONFIG_VERSION
            );
            return self.archive_and_reset(path, &format!("v{}", stored_version));
        }

        match serde_json::from_value::<SessionConfig>(value) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Session config {:?} does not match the schema ({}), resetting", path, e);
                self.archive_and_reset(path, "invalid")
            }
        }
    }

    /// Rename the file with `.<suffix>` appended and write defaults in its place
    fn archive_and_reset(&self, path: &Path, suffix: &str) -> Result<SessionConfig> {
        let mut archived = path.as_os_str().to_owned();
        archived.push(".");
        archived.push(suffix);
        let archived = PathBuf::from(archived);

        std::fs::rename(path, &archived)
            .with_context(|| format!("Failed to archive session config to {:?}", archived))?;
        warn!("Archived old session config to {:?}", archived);

        let config = SessionConfig::default();
        self.write(path, &config)?;
        Ok(config)
    }

    fn write(&self, path: &Path, config: &SessionConfig) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(config)
            .context("Failed to serialize session config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write session config: {:?}", path))
    }

    fn run_hooks(&self, session: &SessionId, config: &SessionConfig) {
        for hook in &self.hooks {
            hook.apply(session, config);
        }
    }
}
