//! TMDB API client module.
//!
//! Handles cached HTTP requests to the TMDB API v3 movie endpoints
//! and resolves relative poster paths into displayable URLs.

mod api;
mod client;
mod poster;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMetadataApi, MetadataApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use poster::{PLACEHOLDER_POSTER, PREFERRED_POSTER_SIZE, resolve_poster_url};
pub use types::{
    ImageItem, MovieDetails, MovieImages, MovieSummary, ProviderImageConfig, SearchPage,
};
