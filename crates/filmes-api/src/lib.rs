//! API client library for filmes.
//!
//! Provides cached clients for the TMDB movie metadata API and the
//! Open-Meteo forecast API, sharing one in-process response cache.

/// Shared in-memory response cache with per-entry expiry.
pub mod cache;

/// Upstream failure classification.
pub mod error;

mod http;

/// TMDB API client.
pub mod tmdb;

/// Open-Meteo forecast client.
pub mod weather;
