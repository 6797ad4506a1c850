//! Composed results and absence indicators.

use filmes_api::tmdb::{MovieDetails, MovieSummary};
use filmes_api::weather::ForecastResult;
use filmes_db::MovieRecord;

/// Result of a TMDB search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Blank query; no request was sent.
    EmptyQuery,
    /// TMDB did not answer usefully (details are in the log).
    Unavailable,
    /// One page of matches with resolved poster URLs.
    Page {
        /// Current page (1-based).
        page: u32,
        /// Total pages.
        total_pages: u32,
        /// Total matches.
        total_results: u32,
        /// Matches on this page.
        hits: Vec<SearchHit>,
    },
}

/// A search match with a displayable poster URL.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Provider summary as received.
    pub summary: MovieSummary,
    /// Resolved poster URL (or placeholder).
    pub poster_url: String,
}

/// Local side of a details request.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalLookup {
    /// The record exists.
    Found(MovieRecord),
    /// No record has this ID.
    NotFound(i64),
}

impl LocalLookup {
    /// The record, if found.
    #[must_use]
    pub const fn record(&self) -> Option<&MovieRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::NotFound(_) => None,
        }
    }
}

/// Remote side of a details request.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteDetails {
    /// Details fetched; poster resolved against the provider configuration.
    Found {
        /// Provider details as received.
        details: MovieDetails,
        /// Resolved poster URL (relative when configuration is unavailable).
        poster_url: String,
    },
    /// No TMDB ID to look up.
    NotLinked,
    /// TMDB did not answer usefully for this ID.
    Unavailable(u64),
}

/// Forecast side of a details request.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    /// Forecast for the record's coordinates.
    Available(ForecastResult),
    /// No local record, or its coordinates are `(0, 0)`; nothing was requested.
    NoCoordinates,
    /// The provider did not answer usefully.
    Unavailable,
}

/// Everything shown for one movie. Always produced, possibly partial.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsView {
    /// Local record lookup.
    pub local: LocalLookup,
    /// TMDB details lookup.
    pub remote: RemoteDetails,
    /// Forecast lookup.
    pub forecast: ForecastOutcome,
}

/// A movie stored by [`super::CatalogService::import_movie`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedMovie {
    /// The stored record, with its assigned local ID.
    pub record: MovieRecord,
    /// Whether the provider's release date had to be replaced by the sentinel.
    pub release_date_defaulted: bool,
}
