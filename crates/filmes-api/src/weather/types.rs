//! Open-Meteo response types.

use anyhow::{Context, bail};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;

/// Daily forecast for one coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// Latitude of the grid cell the provider answered for.
    pub latitude: f64,
    /// Longitude of the grid cell the provider answered for.
    pub longitude: f64,
    /// Offset of the resolved timezone from UTC, in seconds.
    pub utc_offset_seconds: i32,
    /// Resolved timezone label (e.g. `America/Sao_Paulo`).
    pub timezone: String,
    /// One entry per forecast day, in date order.
    pub days: Vec<DailyTemperature>,
}

impl ForecastResult {
    /// Forecast for `date`, if it is within the horizon.
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> Option<&DailyTemperature> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Calendar date at the forecast location at instant `now`.
    #[must_use]
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        FixedOffset::east_opt(self.utc_offset_seconds).map_or_else(
            || now.date_naive(),
            |offset| now.with_timezone(&offset).date_naive(),
        )
    }
}

/// Temperature extremes for a single day, in °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTemperature {
    /// Local calendar date.
    pub date: NaiveDate,
    /// Maximum 2 m temperature, if the model has one.
    pub max_celsius: Option<f64>,
    /// Minimum 2 m temperature, if the model has one.
    pub min_celsius: Option<f64>,
}

/// Raw `v1/forecast` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OpenMeteoForecast {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    utc_offset_seconds: i32,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    daily: Option<OpenMeteoDaily>,
}

/// `daily` block: parallel arrays indexed by day.
#[derive(Debug, Clone, Deserialize)]
struct OpenMeteoDaily {
    #[serde(default)]
    time: Vec<String>,
    #[serde(rename = "temperature_2m_max", default)]
    max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min", default)]
    min: Vec<Option<f64>>,
}

impl TryFrom<OpenMeteoForecast> for ForecastResult {
    type Error = anyhow::Error;

    fn try_from(raw: OpenMeteoForecast) -> anyhow::Result<Self> {
        let days = match raw.daily {
            Some(daily) => {
                if daily.max.len() != daily.time.len() || daily.min.len() != daily.time.len() {
                    bail!(
                        "daily arrays differ in length: time={}, max={}, min={}",
                        daily.time.len(),
                        daily.max.len(),
                        daily.min.len()
                    );
                }
                daily
                    .time
                    .iter()
                    .zip(daily.max)
                    .zip(daily.min)
                    .map(|((date, max), min)| {
                        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                            .with_context(|| format!("invalid daily date: {date}"))?;
                        Ok(DailyTemperature {
                            date,
                            max_celsius: max,
                            min_celsius: min,
                        })
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?
            }
            None => Vec::new(),
        };

        Ok(Self {
            latitude: raw.latitude,
            longitude: raw.longitude,
            utc_offset_seconds: raw.utc_offset_seconds,
            timezone: raw.timezone.unwrap_or_else(|| String::from("GMT")),
            days,
        })
    }
}

/// Open-Meteo error body (`{"error": true, "reason": "..."}`).
#[derive(Debug, Clone, Deserialize)]
struct OpenMeteoError {
    reason: String,
}

/// Extracts the `reason` from an Open-Meteo error body.
pub(crate) fn open_meteo_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<OpenMeteoError>(body)
        .ok()
        .map(|e| e.reason)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_parse_forecast_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/weather/forecast_sao_paulo.json");
        let raw: OpenMeteoForecast = serde_json::from_str(json).unwrap();

        // Act
        let forecast = ForecastResult::try_from(raw).unwrap();

        // Assert
        assert_eq!(forecast.timezone, "America/Sao_Paulo");
        assert_eq!(forecast.utc_offset_seconds, -10800);
        assert_eq!(forecast.days.len(), 7);
        assert_eq!(
            forecast.days[0].date,
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
        );
        assert_eq!(forecast.days[0].max_celsius, Some(27.4));
        assert_eq!(forecast.days[0].min_celsius, Some(16.2));
    }

    #[test]
    fn test_day_lookup() {
        // Arrange
        let json = include_str!("../../../../fixtures/weather/forecast_sao_paulo.json");
        let raw: OpenMeteoForecast = serde_json::from_str(json).unwrap();
        let forecast = ForecastResult::try_from(raw).unwrap();

        // Act
        let day = forecast.day(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());

        // Assert
        assert_eq!(day.unwrap().max_celsius, Some(24.8));
        assert!(
            forecast
                .day(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap())
                .is_none()
        );
    }

    #[test]
    fn test_local_date_applies_utc_offset() {
        // Arrange
        let json = include_str!("../../../../fixtures/weather/forecast_sao_paulo.json");
        let raw: OpenMeteoForecast = serde_json::from_str(json).unwrap();
        let forecast = ForecastResult::try_from(raw).unwrap();
        let now = DateTime::parse_from_rfc3339("2026-10-17T01:30:00Z")
            .unwrap()
            .with_timezone(&Utc);

        // Act
        let local = forecast.local_date(now);

        // Assert (UTC-3: still the 16th in Sao Paulo)
        assert_eq!(local, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
    }

    #[test]
    fn test_null_temperatures_are_kept_as_none() {
        // Arrange
        let json = r#"{"latitude":1.0,"longitude":2.0,"utc_offset_seconds":0,"timezone":"GMT",
            "daily":{"time":["2026-10-16"],"temperature_2m_max":[null],"temperature_2m_min":[3.5]}}"#;
        let raw: OpenMeteoForecast = serde_json::from_str(json).unwrap();

        // Act
        let forecast = ForecastResult::try_from(raw).unwrap();

        // Assert
        assert!(forecast.days[0].max_celsius.is_none());
        assert_eq!(forecast.days[0].min_celsius, Some(3.5));
    }

    #[test]
    fn test_mismatched_daily_arrays_are_rejected() {
        // Arrange
        let json = r#"{"latitude":1.0,"longitude":2.0,
            "daily":{"time":["2026-10-16","2026-10-17"],"temperature_2m_max":[20.0],"temperature_2m_min":[10.0,11.0]}}"#;
        let raw: OpenMeteoForecast = serde_json::from_str(json).unwrap();

        // Act
        let result = ForecastResult::try_from(raw);

        // Assert
        assert!(result.unwrap_err().to_string().contains("differ in length"));
    }

    #[test]
    fn test_error_reason_extraction() {
        // Arrange
        let body = r#"{"error":true,"reason":"Latitude must be in range of -90 to 90°. Given: 123.0."}"#;

        // Act
        let reason = open_meteo_error_message(body).unwrap();

        // Assert
        assert!(reason.starts_with("Latitude must be in range"));
    }
}
