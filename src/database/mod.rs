/*!
 * Database module for persistent storage of cached translations.
 *
 * Each cache namespace lives in its own SQLite file; this module provides
 * the connection wrapper and the schema shared by all of them.
 */

pub mod connection;
pub mod schema;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
