//! `ForecastApi` trait definition.
#![allow(clippy::future_not_send)]

use super::types::ForecastResult;

/// Weather forecast provider trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(ForecastApi: Send)]
pub trait LocalForecastApi {
    /// Fetches the daily forecast for a coordinate pair.
    ///
    /// Coordinates are passed through unvalidated. Returns `None` when the
    /// provider fails or rejects them; the failure is logged, not cached.
    async fn forecast(&self, latitude: f64, longitude: f64) -> Option<ForecastResult>;
}
