/*!
 * Per-session state.
 *
 * This module provides:
 * - Session identifiers and cache namespaces
 * - The versioned session config store
 * - The session manager tying config and cache storage together
 */

pub mod config;
pub mod manager;
pub mod models;

// Re-export main types
pub use config::{ConfigHook, ConfigStore, SessionConfig, SessionConfigPatch, CONFIG_VERSION};
pub use manager::SessionManager;
pub use models::{CacheNamespace, SessionId};
