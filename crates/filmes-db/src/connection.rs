//! Catalog database connection.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations::run_migrations;

/// Database file name inside the data directory.
const DB_FILE_NAME: &str = "filmes.db";

/// How long a write waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the catalog database and brings its schema up to date.
///
/// - `dir = Some(d)`: `{d}/filmes.db`.
/// - `dir = None`: `~/.local/share/filmes/filmes.db`.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created, the file
/// cannot be opened, or a migration fails.
pub fn open_db(dir: Option<&Path>) -> Result<Connection> {
    let db_path = match dir {
        Some(d) => d.join(DB_FILE_NAME),
        None => default_db_path()?,
    };

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .context("failed to set busy timeout")?;

    run_migrations(&conn).context("database migration failed")?;
    tracing::debug!(path = %db_path.display(), "Opened catalog database");

    Ok(conn)
}

/// `~/.local/share/filmes/filmes.db`.
fn default_db_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("filmes")
        .join(DB_FILE_NAME))
}
