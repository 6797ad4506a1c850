//! Schema version management using `PRAGMA user_version`.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Current schema version.
const CURRENT_VERSION: u32 = 1;

/// Applies every migration newer than the stored `user_version`.
///
/// # Errors
///
/// Returns an error if any SQL statement fails.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version")?;

    if version >= CURRENT_VERSION {
        return Ok(());
    }

    if version < 1 {
        migrate_v1(conn).context("migration to v1 failed")?;
    }

    conn.pragma_update(None, "user_version", CURRENT_VERSION)
        .context("failed to update user_version")?;
    tracing::info!(from = version, to = CURRENT_VERSION, "Migrated catalog schema");

    Ok(())
}

/// v1: the `movies` table.
///
/// `tmdb_id` is NULL for movies that are not linked to TMDB;
/// `release_date` is `YYYY-MM-DD` text.
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS movies (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            tmdb_id            INTEGER,
            title              TEXT NOT NULL,
            synopsis           TEXT NOT NULL,
            release_date       TEXT NOT NULL,
            original_language  TEXT NOT NULL,
            rating             REAL NOT NULL DEFAULT 0,
            poster_path        TEXT NOT NULL DEFAULT '',
            latitude           REAL NOT NULL DEFAULT 0,
            longitude          REAL NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_movies_tmdb_id ON movies(tmdb_id);",
    )
    .context("failed to create movies table")?;

    Ok(())
}
