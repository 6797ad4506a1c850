//! `MetadataApi` trait definition.
#![allow(clippy::future_not_send)]

use super::types::{MovieDetails, MovieImages, ProviderImageConfig, SearchPage};

/// Movie metadata provider trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
///
/// Every operation returns `None` when the provider is unreachable, answers
/// with a non-success status, or sends a payload that does not parse.
/// Failures are logged by the implementation and never cached.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(MetadataApi: Send)]
pub trait LocalMetadataApi {
    /// Searches movies by title. `query` must be non-empty; `page` is 1-based.
    async fn search(&self, query: &str, page: u32) -> Option<SearchPage>;

    /// Fetches movie details by TMDB ID.
    async fn details(&self, remote_id: u64) -> Option<MovieDetails>;

    /// Fetches the image listing of a movie by TMDB ID.
    async fn images(&self, remote_id: u64) -> Option<MovieImages>;

    /// Fetches the image-serving configuration.
    async fn configuration(&self) -> Option<ProviderImageConfig>;
}
