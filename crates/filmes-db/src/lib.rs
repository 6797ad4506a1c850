//! Local movie catalog.
//!
//! Uses `rusqlite` (bundled `SQLite`) to persist movie records created
//! by hand or imported from TMDB.

mod connection;
mod migrations;
/// Movie CRUD operations.
pub mod movies;

#[allow(clippy::module_name_repetitions)]
pub use connection::open_db;
pub use movies::{CatalogStore, MovieRecord, NewMovie, SqliteCatalog, release_date_sentinel};
