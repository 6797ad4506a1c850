//! `TmdbClient` - cached TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::MetadataApi;
use super::types::{
    MovieDetails, MovieImages, ProviderImageConfig, SearchPage, TmdbConfiguration,
    tmdb_error_message,
};
use crate::cache::{CacheKey, DETAILS_TTL, Expiry, IMAGES_TTL, ResponseCache, SEARCH_TTL};
use crate::error::UpstreamError;
use crate::http;

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default transport timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TMDB API client.
///
/// Authenticates with the v3 `api_key` query parameter and serves repeated
/// lookups from the shared [`ResponseCache`].
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// v3 API key (may be empty).
    api_key: String,
    /// Response language, if any.
    language: Option<String>,
    /// Shared response cache.
    cache: Arc<ResponseCache>,
    /// Cache lifetimes per endpoint class.
    ttls: TmdbCacheTtls,
}

/// Cache lifetimes for the expiring TMDB endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TmdbCacheTtls {
    search: Duration,
    details: Duration,
    images: Duration,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    timeout: Option<Duration>,
    cache: Option<Arc<ResponseCache>>,
    ttls: TmdbCacheTtls,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            language: None,
            timeout: None,
            cache: None,
            ttls: TmdbCacheTtls {
                search: SEARCH_TTL,
                details: DETAILS_TTL,
                images: IMAGES_TTL,
            },
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the v3 API key. An empty key is accepted with a warning.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language sent with search and details requests.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the transport timeout (default: 30s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Shares an existing response cache (default: a private one).
    #[must_use]
    pub fn cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Overrides the search cache lifetime (default: 5 minutes).
    #[must_use]
    pub const fn search_ttl(mut self, ttl: Duration) -> Self {
        self.ttls.search = ttl;
        self
    }

    /// Overrides the details cache lifetime (default: 10 minutes).
    #[must_use]
    pub const fn details_ttl(mut self, ttl: Duration) -> Self {
        self.ttls.details = ttl;
        self
    }

    /// Overrides the images cache lifetime (default: 10 minutes).
    #[must_use]
    pub const fn images_ttl(mut self, ttl: Duration) -> Self {
        self.ttls.images = ttl;
        self
    }

    /// Builds the client.
    ///
    /// Emits a warning when the API key is missing or empty; requests
    /// are still sent and the provider will reject them.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;
        let api_key = self.api_key.unwrap_or_default();
        if api_key.trim().is_empty() {
            tracing::warn!(
                "TMDB API key is not configured. Set TMDB_API_KEY or tmdb.api_key in config.toml."
            );
        }

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_key,
            language: self.language,
            cache: self.cache.unwrap_or_default(),
            ttls: self.ttls,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns a cached value, logging the hit.
    fn cached<T: Clone + Send + Sync + 'static>(&self, key: &CacheKey) -> Option<T> {
        let hit = self.cache.get(key);
        if hit.is_some() {
            tracing::debug!(key = %key, "TMDB cache hit");
        }
        hit
    }

    /// Sends a GET request with the API key appended to `query`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        mut query: Vec<(&str, String)>,
    ) -> Result<T, UpstreamError> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))
            .map_err(UpstreamError::Unavailable)?;

        query.push(("api_key", self.api_key.clone()));

        tracing::debug!(endpoint = path, "TMDB API request");
        http::get_json(&self.http_client, url, &query, tmdb_error_message).await
    }

    /// Appends the configured `language` parameter, if any.
    fn push_language(&self, query: &mut Vec<(&str, String)>) {
        if let Some(ref language) = self.language {
            query.push(("language", language.clone()));
        }
    }
}

impl MetadataApi for TmdbClient {
    #[instrument(skip_all)]
    async fn search(&self, query: &str, page: u32) -> Option<SearchPage> {
        if query.trim().is_empty() {
            tracing::debug!("Empty search query, skipping TMDB request");
            return None;
        }
        let page = page.max(1);

        let key = CacheKey::search(query, page);
        if let Some(hit) = self.cached(&key) {
            return Some(hit);
        }

        let mut params: Vec<(&str, String)> = vec![
            ("query", String::from(query)),
            ("page", page.to_string()),
        ];
        self.push_language(&mut params);

        match self.get_json::<SearchPage>("search/movie", params).await {
            Ok(result) => {
                self.cache
                    .insert(key, result.clone(), Expiry::after(self.ttls.search));
                Some(result)
            }
            Err(err) => {
                err.log("search/movie");
                None
            }
        }
    }

    #[instrument(skip_all)]
    async fn details(&self, remote_id: u64) -> Option<MovieDetails> {
        if remote_id == 0 {
            return None;
        }

        let key = CacheKey::Details(remote_id);
        if let Some(hit) = self.cached(&key) {
            return Some(hit);
        }

        let path = format!("movie/{remote_id}");
        let mut params = Vec::new();
        self.push_language(&mut params);

        match self.get_json::<MovieDetails>(&path, params).await {
            Ok(details) => {
                self.cache
                    .insert(key, details.clone(), Expiry::after(self.ttls.details));
                Some(details)
            }
            Err(err) => {
                err.log(&path);
                None
            }
        }
    }

    #[instrument(skip_all)]
    async fn images(&self, remote_id: u64) -> Option<MovieImages> {
        if remote_id == 0 {
            return None;
        }

        let key = CacheKey::Images(remote_id);
        if let Some(hit) = self.cached(&key) {
            return Some(hit);
        }

        let path = format!("movie/{remote_id}/images");
        match self.get_json::<MovieImages>(&path, Vec::new()).await {
            Ok(images) => {
                self.cache
                    .insert(key, images.clone(), Expiry::after(self.ttls.images));
                Some(images)
            }
            Err(err) => {
                err.log(&path);
                None
            }
        }
    }

    #[instrument(skip_all)]
    async fn configuration(&self) -> Option<ProviderImageConfig> {
        let key = CacheKey::Configuration;
        if let Some(hit) = self.cached(&key) {
            return Some(hit);
        }

        let result = self
            .get_json::<TmdbConfiguration>("configuration", Vec::new())
            .await
            .and_then(|raw| ProviderImageConfig::try_from(raw).map_err(UpstreamError::Malformed));

        match result {
            Ok(config) => {
                self.cache.insert(key, config.clone(), Expiry::Never);
                Some(config)
            }
            Err(err) => {
                err.log("configuration");
                None
            }
        }
    }
}
