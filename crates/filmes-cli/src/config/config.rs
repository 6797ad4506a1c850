//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `tmdb.api_key`.
pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Open-Meteo settings.
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// `[tmdb]` section.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// v3 API key. `TMDB_API_KEY` takes precedence when set.
    #[serde(default)]
    pub api_key: String,
    /// API base URL (must end with `/`).
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    /// Response language; empty disables the `language` parameter.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_tmdb_base_url(),
            language: default_language(),
        }
    }
}

/// `[weather]` section.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeatherConfig {
    /// API base URL (must end with `/`).
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
        }
    }
}

/// `[cache]` section.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// Entry count above which the cache evicts.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

/// `[http]` section.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_tmdb_base_url() -> String {
    String::from("https://api.themoviedb.org/3/")
}

fn default_weather_base_url() -> String {
    String::from("https://api.open-meteo.com/")
}

fn default_language() -> String {
    String::from("en-US")
}

const fn default_max_entries() -> usize {
    filmes_api::cache::DEFAULT_MAX_ENTRIES
}

const fn default_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// TMDB API key: `TMDB_API_KEY` if set and non-empty, else the file value.
    #[must_use]
    pub fn tmdb_api_key(&self) -> String {
        select_api_key(std::env::var(TMDB_API_KEY_ENV).ok(), &self.tmdb.api_key)
    }

    /// Response language, or `None` when disabled.
    #[must_use]
    pub fn tmdb_language(&self) -> Option<&str> {
        let language = self.tmdb.language.trim();
        (!language.is_empty()).then_some(language)
    }

    /// HTTP request timeout.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

/// Environment value wins unless it is blank.
fn select_api_key(env_value: Option<String>, file_value: &str) -> String {
    env_value
        .filter(|key| !key.trim().is_empty())
        .unwrap_or_else(|| String::from(file_value))
}
