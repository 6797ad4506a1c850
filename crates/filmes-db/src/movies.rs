//! Movie catalog CRUD operations.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};

/// Storage format of `release_date`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shared column list for every `SELECT`.
const MOVIE_COLUMNS: &str = "id, tmdb_id, title, synopsis, release_date, original_language, \
                             rating, poster_path, latitude, longitude";

/// Date stored when the provider's release date cannot be parsed.
#[must_use]
pub fn release_date_sentinel() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// A stored movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    /// Local ID, assigned on create.
    pub id: i64,
    /// Linked TMDB movie ID (`None` when not linked).
    pub remote_id: Option<u64>,
    /// Title.
    pub title: String,
    /// Synopsis.
    pub synopsis: String,
    /// Release date ([`release_date_sentinel`] when unknown).
    pub release_date: NaiveDate,
    /// Original language code (ISO 639-1).
    pub language: String,
    /// Average rating on the provider's 0-10 scale.
    pub rating: f64,
    /// Poster URL, or the placeholder path.
    pub poster_path: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl MovieRecord {
    /// Returns `(latitude, longitude)` unless both are exactly zero.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        if self.latitude == 0.0 && self.longitude == 0.0 {
            return None;
        }
        Some((self.latitude, self.longitude))
    }
}

/// A movie that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    /// Linked TMDB movie ID (`None` when not linked).
    pub remote_id: Option<u64>,
    /// Title.
    pub title: String,
    /// Synopsis.
    pub synopsis: String,
    /// Release date.
    pub release_date: NaiveDate,
    /// Original language code.
    pub language: String,
    /// Average rating.
    pub rating: f64,
    /// Poster URL, or the placeholder path.
    pub poster_path: String,
    /// Latitude in degrees (0 when unknown).
    pub latitude: f64,
    /// Longitude in degrees (0 when unknown).
    pub longitude: f64,
}

impl NewMovie {
    /// Attaches the assigned local ID.
    #[must_use]
    pub fn into_record(self, id: i64) -> MovieRecord {
        MovieRecord {
            id,
            remote_id: self.remote_id,
            title: self.title,
            synopsis: self.synopsis,
            release_date: self.release_date,
            language: self.language,
            rating: self.rating,
            poster_path: self.poster_path,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Keyed record store for the local catalog.
///
/// `update` and `delete` return the number of affected rows; `0` means
/// the ID did not exist and callers decide whether that is an error.
pub trait CatalogStore {
    /// Stores a new movie and returns it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn create(&self, movie: NewMovie) -> Result<MovieRecord>;

    /// Loads every movie in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    fn read_all(&self) -> Result<Vec<MovieRecord>>;

    /// Loads one movie by local ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    fn get_by_id(&self, id: i64) -> Result<Option<MovieRecord>>;

    /// Overwrites all fields of the movie with `movie.id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn update(&self, movie: &MovieRecord) -> Result<usize>;

    /// Deletes a movie by local ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn delete(&self, id: i64) -> Result<usize>;
}

/// `SQLite`-backed [`CatalogStore`].
#[derive(Debug)]
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Wraps an open, migrated connection (see [`crate::open_db`]).
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl CatalogStore for SqliteCatalog {
    fn create(&self, movie: NewMovie) -> Result<MovieRecord> {
        insert_movie(&self.conn, movie)
    }

    fn read_all(&self) -> Result<Vec<MovieRecord>> {
        load_movies(&self.conn)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<MovieRecord>> {
        load_movie(&self.conn, id)
    }

    fn update(&self, movie: &MovieRecord) -> Result<usize> {
        update_movie(&self.conn, movie)
    }

    fn delete(&self, id: i64) -> Result<usize> {
        delete_movie(&self.conn, id)
    }
}

/// Inserts a movie and returns it with the new row ID.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_movie(conn: &Connection, movie: NewMovie) -> Result<MovieRecord> {
    conn.execute(
        "INSERT INTO movies (
            tmdb_id, title, synopsis, release_date, original_language,
            rating, poster_path, latitude, longitude
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            movie.remote_id.filter(|id| *id > 0),
            movie.title,
            movie.synopsis,
            movie.release_date.format(DATE_FORMAT).to_string(),
            movie.language,
            movie.rating,
            movie.poster_path,
            movie.latitude,
            movie.longitude,
        ],
    )
    .with_context(|| format!("failed to insert movie {:?}", movie.title))?;

    let id = conn.last_insert_rowid();
    tracing::debug!(id, title = %movie.title, "Inserted movie");
    Ok(movie.into_record(id))
}

/// Loads all movies, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_movies(conn: &Connection) -> Result<Vec<MovieRecord>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {MOVIE_COLUMNS} FROM movies ORDER BY id"))
        .context("failed to prepare movies query")?;

    let rows = stmt
        .query_map([], movie_from_row)
        .context("failed to query movies")?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read movies rows")
}

/// Loads one movie by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_movie(conn: &Connection, id: i64) -> Result<Option<MovieRecord>> {
    conn.query_row(
        &format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = ?1"),
        [id],
        movie_from_row,
    )
    .optional()
    .with_context(|| format!("failed to load movie {id}"))
}

/// Overwrites a movie. Returns the number of rows changed (0 or 1).
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn update_movie(conn: &Connection, movie: &MovieRecord) -> Result<usize> {
    conn.execute(
        "UPDATE movies SET
            tmdb_id = ?2, title = ?3, synopsis = ?4, release_date = ?5,
            original_language = ?6, rating = ?7, poster_path = ?8,
            latitude = ?9, longitude = ?10
         WHERE id = ?1",
        rusqlite::params![
            movie.id,
            movie.remote_id.filter(|id| *id > 0),
            movie.title,
            movie.synopsis,
            movie.release_date.format(DATE_FORMAT).to_string(),
            movie.language,
            movie.rating,
            movie.poster_path,
            movie.latitude,
            movie.longitude,
        ],
    )
    .with_context(|| format!("failed to update movie {}", movie.id))
}

/// Deletes a movie. Returns the number of rows deleted (0 or 1).
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_movie(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM movies WHERE id = ?1", [id])
        .with_context(|| format!("failed to delete movie {id}"))
}

/// Maps a row selected with [`MOVIE_COLUMNS`].
fn movie_from_row(row: &Row<'_>) -> rusqlite::Result<MovieRecord> {
    let raw_date: String = row.get(4)?;
    let release_date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    let remote_id: Option<u64> = row.get(1)?;

    Ok(MovieRecord {
        id: row.get(0)?,
        remote_id: remote_id.filter(|id| *id > 0),
        title: row.get(2)?,
        synopsis: row.get(3)?,
        release_date,
        language: row.get(5)?,
        rating: row.get(6)?,
        poster_path: row.get(7)?,
        latitude: row.get(8)?,
        longitude: row.get(9)?,
    })
}
