/*!
 * Common test utilities for the overlay-translator test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use overlay_translator::session::{CacheNamespace, SessionId};

/// Small frequency dictionary for spell-correction tests
pub const SAMPLE_DICTIONARY: &str = "the 23135851162\nworld 517559\nhello 30109\nthere 4000000\n";

/// Route library logs through env_logger; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Session id that is valid by construction
pub fn session(name: &str) -> SessionId {
    SessionId::new(name).expect("valid test session id")
}

/// Namespace for `session` with the given pair and provider
pub fn namespace(session_name: &str, src: &str, dest: &str, provider: &str) -> CacheNamespace {
    CacheNamespace::new(session(session_name), src, dest, provider)
}
