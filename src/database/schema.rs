/*!
 * Database schema definitions and migrations.
 *
 * This module contains the SQL schema for a translation cache store
 * and handles schema migrations for version upgrades.
 */

use anyhow::{Context, Result};
use rusqlite::Connection;
use log::{debug, info};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
///
/// Idempotent: an existing store is left untouched apart from pending migrations.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // Busy timeout lets concurrent writers on the same file queue instead of failing
    conn.busy_timeout(std::time::Duration::from_secs(5))?;

    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing cache schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        info!(
            "Migrating cache schema from v{} to v{}",
            current_version, SCHEMA_VERSION
        );
        migrate_schema(conn, current_version)?;
    } else {
        debug!("Cache schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .context("Failed to read schema version")?;

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    // WAL keeps readers from blocking the single writer
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // Entries are append-only: the digest and the original text are both unique
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS translations (
            hash TEXT PRIMARY KEY,
            original_text TEXT NOT NULL UNIQUE,
            translated_text TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )?;

    info!("Cache schema created successfully");
    Ok(())
}

/// Migrate the schema from one version to another
fn migrate_schema(conn: &Connection, from_version: i32) -> Result<()> {
    // Per-version steps (migrate_v1_to_v2, ...) go here as the schema evolves
    if from_version < SCHEMA_VERSION {
        return Err(anyhow::anyhow!(
            "Unknown cache schema version: {}. Cannot migrate.",
            from_version
        ));
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!("Cache schema migration completed to v{}", SCHEMA_VERSION);
    Ok(())
}
