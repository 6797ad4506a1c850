//! Mapping TMDB details onto a new catalog record.

use chrono::NaiveDate;
use filmes_api::tmdb::MovieDetails;
use filmes_db::{NewMovie, release_date_sentinel};

/// Title stored when TMDB sends none.
pub(super) const UNTITLED: &str = "Untitled";

/// Parses a TMDB `YYYY-MM-DD` release date.
///
/// Returns `None` for absent, empty or malformed dates.
#[must_use]
pub fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// Builds the record to store for an imported movie.
///
/// Returns the record and whether the release date fell back to the sentinel.
pub(super) fn new_movie_from_details(
    details: MovieDetails,
    poster_url: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> (NewMovie, bool) {
    let parsed = parse_release_date(details.release_date.as_deref());
    let defaulted = parsed.is_none();

    let movie = NewMovie {
        remote_id: Some(details.remote_id),
        title: details
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| String::from(UNTITLED)),
        synopsis: details.synopsis.unwrap_or_default(),
        release_date: parsed.unwrap_or_else(release_date_sentinel),
        language: details.language.unwrap_or_default(),
        rating: details.rating,
        poster_path: poster_url,
        latitude: latitude.unwrap_or_default(),
        longitude: longitude.unwrap_or_default(),
    };
    (movie, defaulted)
}
