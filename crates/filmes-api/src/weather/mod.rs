//! Open-Meteo forecast client module.
//!
//! Fetches cached daily min/max temperature forecasts for a coordinate pair.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{ForecastApi, LocalForecastApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{OpenMeteoClient, OpenMeteoClientBuilder};
pub use types::{DailyTemperature, ForecastResult};
