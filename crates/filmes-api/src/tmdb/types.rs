//! TMDB response types.
//!
//! Provider field names are mapped here, once; the rest of the crate and
//! its callers only see the semantic names.

use anyhow::Context;
use serde::Deserialize;

// --- Search Movie ---

/// One page of `search/movie` results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchPage {
    /// Current page number (1-based).
    pub page: u32,
    /// Matches on this page, in provider order.
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    /// Total number of matches.
    #[serde(default)]
    pub total_results: u32,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
}

/// A single movie search result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    #[serde(rename = "id")]
    pub remote_id: u64,
    /// Localized title.
    #[serde(default)]
    pub title: Option<String>,
    /// Overview text.
    #[serde(rename = "overview", default)]
    pub synopsis: Option<String>,
    /// Release date as sent by the provider (usually `YYYY-MM-DD`).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(rename = "original_language", default)]
    pub language: Option<String>,
    /// Vote average (0-10).
    #[serde(rename = "vote_average", default)]
    pub rating: f64,
    /// Poster path, relative until resolved.
    #[serde(default)]
    pub poster_path: Option<String>,
}

// --- Movie Details ---

/// Response from `movie/{movie_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetails {
    /// TMDB movie ID.
    #[serde(rename = "id")]
    pub remote_id: u64,
    /// Localized title.
    #[serde(default)]
    pub title: Option<String>,
    /// Overview text.
    #[serde(rename = "overview", default)]
    pub synopsis: Option<String>,
    /// Release date as sent by the provider (usually `YYYY-MM-DD`).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(rename = "original_language", default)]
    pub language: Option<String>,
    /// Vote average (0-10).
    #[serde(rename = "vote_average", default)]
    pub rating: f64,
    /// Poster path, relative until resolved.
    #[serde(default)]
    pub poster_path: Option<String>,
}

// --- Movie Images ---

/// Response from `movie/{movie_id}/images`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieImages {
    /// TMDB movie ID.
    #[serde(rename = "id")]
    pub remote_id: u64,
    /// Backdrop images.
    #[serde(default)]
    pub backdrops: Vec<ImageItem>,
    /// Poster images.
    #[serde(default)]
    pub posters: Vec<ImageItem>,
}

/// A single image entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageItem {
    /// Relative image path.
    pub file_path: String,
    /// Width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels.
    #[serde(default)]
    pub height: Option<u32>,
    /// Image language (ISO 639-1), if any.
    #[serde(rename = "iso_639_1", default)]
    pub language: Option<String>,
}

// --- Configuration ---

/// Image-serving configuration derived from `configuration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderImageConfig {
    /// Image base URL, e.g. `http://image.tmdb.org/t/p/`.
    pub base_url: String,
    /// Supported poster size tokens, smallest first.
    pub poster_sizes: Vec<String>,
}

/// Raw `configuration` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TmdbConfiguration {
    #[serde(default)]
    images: Option<TmdbImagesConfiguration>,
}

/// `images` block of the `configuration` response.
#[derive(Debug, Clone, Deserialize)]
struct TmdbImagesConfiguration {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    poster_sizes: Vec<String>,
}

impl TryFrom<TmdbConfiguration> for ProviderImageConfig {
    type Error = anyhow::Error;

    fn try_from(raw: TmdbConfiguration) -> anyhow::Result<Self> {
        let images = raw.images.context("configuration has no images block")?;
        let base_url = images
            .base_url
            .filter(|url| !url.is_empty())
            .context("configuration has no images.base_url")?;
        Ok(Self {
            base_url,
            poster_sizes: images.poster_sizes,
        })
    }
}

// --- Error ---

/// TMDB error response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TmdbErrorResponse {
    /// TMDB status code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

/// Extracts `code=..., message=...` from a TMDB error body.
pub(crate) fn tmdb_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<TmdbErrorResponse>(body)
        .ok()
        .map(|e| format!("code={}, message={}", e.status_code, e.status_message))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_parse_search_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/search_movie_matrix.json");

        // Act
        let page: SearchPage = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(page.page, 1);
        assert_eq!(page.total_results, 2);
        let first = &page.results[0];
        assert_eq!(first.remote_id, 603);
        assert_eq!(first.title.as_deref(), Some("The Matrix"));
        assert_eq!(first.language.as_deref(), Some("en"));
        assert_eq!(first.poster_path.as_deref(), Some("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg"));
    }

    #[test]
    fn test_parse_details_with_nulls() {
        // Arrange
        let json = r#"{"id":42,"title":null,"overview":null,"release_date":"","original_language":"pt","vote_average":6.5,"poster_path":null}"#;

        // Act
        let details: MovieDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.remote_id, 42);
        assert!(details.title.is_none());
        assert!(details.synopsis.is_none());
        assert_eq!(details.release_date.as_deref(), Some(""));
        assert!(details.poster_path.is_none());
    }

    #[test]
    fn test_parse_images_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_images_603.json");

        // Act
        let images: MovieImages = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(images.remote_id, 603);
        assert_eq!(images.posters.len(), 2);
        assert_eq!(images.posters[0].language.as_deref(), Some("en"));
        assert_eq!(images.backdrops[0].width, Some(1920));
    }

    #[test]
    fn test_configuration_converts_to_image_config() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/configuration.json");
        let raw: TmdbConfiguration = serde_json::from_str(json).unwrap();

        // Act
        let config = ProviderImageConfig::try_from(raw).unwrap();

        // Assert
        assert_eq!(config.base_url, "http://image.tmdb.org/t/p/");
        assert_eq!(
            config.poster_sizes,
            vec!["w92", "w154", "w185", "w342", "w500", "w780", "original"]
        );
    }

    #[test]
    fn test_configuration_without_base_url_is_rejected() {
        // Arrange
        let raw: TmdbConfiguration =
            serde_json::from_str(r#"{"images":{"poster_sizes":["w92"]}}"#).unwrap();

        // Act
        let result = ProviderImageConfig::try_from(raw);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_error_message_extraction() {
        // Arrange
        let body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let message = tmdb_error_message(body).unwrap();

        // Assert
        assert!(message.contains("code=7"));
        assert!(message.contains("Invalid API key"));
        assert!(tmdb_error_message("<html>").is_none());
    }
}
