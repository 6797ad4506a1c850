//! `OpenMeteoClient` - cached Open-Meteo forecast client.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::ForecastApi;
use super::types::{ForecastResult, OpenMeteoForecast, open_meteo_error_message};
use crate::cache::{CacheKey, Expiry, FORECAST_TTL, ResponseCache};
use crate::error::UpstreamError;
use crate::http;

/// Default base URL for the Open-Meteo API.
const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/";

/// Forecast endpoint, relative to the base URL.
const FORECAST_PATH: &str = "v1/forecast";

/// Daily variables requested on every call.
const DAILY_VARIABLES: &str = "temperature_2m_max,temperature_2m_min";

/// Default transport timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Open-Meteo forecast client. No API key is needed.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OpenMeteoClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Shared response cache.
    cache: Arc<ResponseCache>,
    /// Forecast cache lifetime.
    ttl: Duration,
}

/// Builder for `OpenMeteoClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OpenMeteoClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    cache: Option<Arc<ResponseCache>>,
    ttl: Duration,
}

impl OpenMeteoClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            timeout: None,
            cache: None,
            ttl: FORECAST_TTL,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
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

    /// Overrides the forecast cache lifetime (default: 10 minutes).
    #[must_use]
    pub const fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OpenMeteoClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(OpenMeteoClient {
            http_client,
            base_url,
            cache: self.cache.unwrap_or_default(),
            ttl: self.ttl,
        })
    }
}

impl OpenMeteoClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OpenMeteoClientBuilder {
        OpenMeteoClientBuilder::new()
    }

    /// Calls `v1/forecast` and converts the response.
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastResult, UpstreamError> {
        let url = self
            .base_url
            .join(FORECAST_PATH)
            .context("failed to join forecast URL")
            .map_err(UpstreamError::Unavailable)?;

        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("daily", String::from(DAILY_VARIABLES)),
            ("timezone", String::from("auto")),
        ];

        tracing::debug!(latitude, longitude, "Open-Meteo API request");
        let raw: OpenMeteoForecast =
            http::get_json(&self.http_client, url, &query, open_meteo_error_message).await?;
        ForecastResult::try_from(raw).map_err(UpstreamError::Malformed)
    }
}

impl ForecastApi for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn forecast(&self, latitude: f64, longitude: f64) -> Option<ForecastResult> {
        let key = CacheKey::forecast(latitude, longitude);
        if let Some(hit) = self.cache.get::<ForecastResult>(&key) {
            tracing::debug!(key = %key, "Forecast cache hit");
            return Some(hit);
        }

        match self.fetch(latitude, longitude).await {
            Ok(forecast) => {
                self.cache
                    .insert(key, forecast.clone(), Expiry::after(self.ttl));
                Some(forecast)
            }
            Err(err) => {
                err.log(FORECAST_PATH);
                None
            }
        }
    }
}
