/*!
 * Persistent translation cache.
 *
 * Every (session, source language, destination language, provider)
 * namespace owns its own SQLite store. Entries are keyed by the SHA-256
 * digest of the trimmed sentence and are append-only: the first
 * translation written for a sentence is kept forever.
 */

use log::{debug, info, warn};
use parking_lot::Mutex;
use rusqlite::{OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::database::{DatabaseConnection, DatabaseStats};
use crate::errors::CacheError;
use crate::session::models::{CacheNamespace, SessionId};

/// Directory under a session's folder that holds its cache stores
const CACHE_DIRNAME: &str = "cache";

/// Result of a `put`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// A new entry was written
    Inserted,
    /// An entry for this sentence already existed and was kept
    AlreadyPresent,
}

/// Hex SHA-256 digest of the trimmed sentence
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Where stores are kept
#[derive(Debug, Clone)]
enum StoreLocation {
    /// `<root>/<session>/cache/<namespace file>`
    Directory(PathBuf),
    /// One private in-memory database per namespace
    Memory,
}

/// Translation cache partitioned by namespace
#[derive(Clone)]
pub struct TranslationCache {
    /// Where stores live
    location: StoreLocation,

    /// Open stores, one per namespace
    stores: Arc<Mutex<HashMap<CacheNamespace, DatabaseConnection>>>,

    /// Cache hit counter
    hits: Arc<AtomicUsize>,

    /// Cache miss counter
    misses: Arc<AtomicUsize>,
}

impl TranslationCache {
    /// Cache whose stores live under `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::with_location(StoreLocation::Directory(root.as_ref().to_path_buf()))
    }

    /// Cache backed by in-memory databases (for testing)
    pub fn in_memory() -> Self {
        Self::with_location(StoreLocation::Memory)
    }

    fn with_location(location: StoreLocation) -> Self {
        Self {
            location,
            stores: Arc::new(Mutex::new(HashMap::new())),
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Directory holding every store of a session, if stores live on disk
    pub fn session_dir(&self, session: &SessionId) -> Option<PathBuf> {
        match &self.location {
            StoreLocation::Directory(root) => {
                Some(root.join(session.as_str()).join(CACHE_DIRNAME))
            }
            StoreLocation::Memory => None,
        }
    }

    /// File backing a namespace, if stores live on disk
    pub fn store_path(&self, namespace: &CacheNamespace) -> Option<PathBuf> {
        self.session_dir(&namespace.session)
            .map(|dir| dir.join(namespace.file_name()))
    }

    /// Ensure the store for `namespace` exists, creating it if absent.
    ///
    /// Never truncates an existing store; repeated calls are no-ops.
    pub fn init(&self, namespace: &CacheNamespace) -> Result<(), CacheError> {
        self.store(namespace).map(|_| ())
    }

    fn store(&self, namespace: &CacheNamespace) -> Result<DatabaseConnection, CacheError> {
        let mut stores = self.stores.lock();
        if let Some(db) = stores.get(namespace) {
            return Ok(db.clone());
        }

        let db = match self.store_path(namespace) {
            Some(path) => DatabaseConnection::new(&path)?,
            None => DatabaseConnection::new_in_memory()?,
        };
        info!("Translation cache ready for {}", namespace);

        stores.insert(namespace.clone(), db.clone());
        Ok(db)
    }

    /// Async wrapper around `store` that keeps file I/O off the runtime threads
    async fn store_async(&self, namespace: &CacheNamespace) -> Result<DatabaseConnection, CacheError> {
        if let Some(db) = self.stores.lock().get(namespace) {
            return Ok(db.clone());
        }

        let cache = self.clone();
        let namespace = namespace.clone();
        tokio::task::spawn_blocking(move || cache.store(&namespace))
            .await
            .map_err(|e| CacheError::Unavailable(format!("Cache open task panicked: {}", e)))?
    }

    /// Look up the translation of `text`; `Ok(None)` on a miss
    pub async fn get(&self, namespace: &CacheNamespace, text: &str) -> Result<Option<String>, CacheError> {
        let original = text.trim().to_string();
        let hash = content_hash(&original);
        let db = self.store_async(namespace).await?;

        let key = hash.clone();
        let row: Option<(String, String)> = db
            .execute_async(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT original_text, translated_text FROM translations WHERE hash = ?1",
                        [&key],
                        |row| Ok((row.get(0)?, row.get(1)?)),
                    )
                    .optional()?)
            })
            .await?;

        match row {
            Some((stored, translated)) if stored == original => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for '{}' ({})", truncate_text(&original, 30), namespace);
                Ok(Some(translated))
            }
            Some(_) => {
                warn!("Cache digest {} maps to a different sentence in {}", hash, namespace);
                Err(CacheError::HashCollision { hash })
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache miss for '{}' ({})", truncate_text(&original, 30), namespace);
                Ok(None)
            }
        }
    }

    /// Store a translation unless one already exists for `text`.
    ///
    /// The existence check and the insert run in one immediate transaction,
    /// so concurrent writers cannot both win.
    pub async fn put(
        &self,
        namespace: &CacheNamespace,
        text: &str,
        translated: &str,
    ) -> Result<PutOutcome, CacheError> {
        let original = text.trim().to_string();
        let translated = translated.to_string();
        let hash = content_hash(&original);
        let db = self.store_async(namespace).await?;

        let key = hash.clone();
        let text_for_tx = original.clone();
        // `None` means the digest is already taken by a different sentence
        let outcome: Option<PutOutcome> = db
            .transaction_async(move |tx| {
                let stored: Option<String> = tx
                    .query_row(
                        "SELECT original_text FROM translations WHERE hash = ?1",
                        [&key],
                        |row| row.get(0),
                    )
                    .optional()?;

                match stored {
                    Some(stored) if stored == text_for_tx => Ok(Some(PutOutcome::AlreadyPresent)),
                    Some(_) => Ok(None),
                    None => {
                        let inserted = tx.execute(
                            "INSERT OR IGNORE INTO translations (hash, original_text, translated_text, created_at)
                             VALUES (?1, ?2, ?3, datetime('now'))",
                            params![key, text_for_tx, translated],
                        )?;
                        Ok(Some(if inserted == 1 {
                            PutOutcome::Inserted
                        } else {
                            PutOutcome::AlreadyPresent
                        }))
                    }
                }
            })
            .await?;

        match outcome {
            Some(outcome) => {
                if outcome == PutOutcome::Inserted {
                    debug!("Cached translation for '{}' ({})", truncate_text(&original, 30), namespace);
                }
                Ok(outcome)
            }
            None => {
                warn!(
                    "Refusing to cache '{}': digest {} already used by another sentence",
                    truncate_text(&original, 30),
                    hash
                );
                Err(CacheError::HashCollision { hash })
            }
        }
    }

    /// Number of entries in a namespace
    pub fn len(&self, namespace: &CacheNamespace) -> Result<usize, CacheError> {
        let stats = self.store(namespace)?.stats()?;
        Ok(stats.entry_count.max(0) as usize)
    }

    /// Stores of a session that exist on disk, with their statistics
    pub fn list_session_stores(&self, session: &SessionId) -> Result<Vec<(String, DatabaseStats)>, CacheError> {
        let Some(dir) = self.session_dir(session) else {
            return Ok(Vec::new());
        };
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&dir)
            .map_err(|e| CacheError::Unavailable(format!("Failed to list {:?}: {}", dir, e)))?;

        let mut stores = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| CacheError::Unavailable(e.to_string()))?
                .path();
            if path.extension().is_some_and(|ext| ext == "sqlite3") {
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let stats = DatabaseConnection::new(&path)?.stats()?;
                stores.push((name, stats));
            }
        }
        stores.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(stores)
    }

    /// Get cache statistics
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
