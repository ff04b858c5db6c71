//! Open-Meteo lookup for the two robot cities.
//!
//! Lookups never fail from the caller's point of view: any HTTP or decoding
//! problem is logged and replaced by a per-city fallback temperature.

#[cfg(test)]
#[path = "weather_test.rs"]
mod weather_test;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use time::UtcOffset;
use time::macros::{format_description, offset};

use crate::state::transcript::{at_unix_ms, now_ms};

pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const COLOMBIA_TIMEZONE: &str = "America/Bogota";

/// Colombia has no daylight saving time: UTC-5 all year.
pub const COLOMBIA_OFFSET: UtcOffset = offset!(-5);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum City {
    Bogota,
    Medellin,
}

impl City {
    pub const ALL: [City; 2] = [City::Bogota, City::Medellin];

    /// `(latitude, longitude)`.
    #[must_use]
    pub fn coordinates(self) -> (f64, f64) {
        match self {
            Self::Bogota => (4.61, -74.08),
            Self::Medellin => (6.25, -75.56),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bogota => "Bogotá",
            Self::Medellin => "Medellín",
        }
    }

    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Bogota => "🏔️",
            Self::Medellin => "🌺",
        }
    }

    #[must_use]
    pub fn fallback_temperature(self) -> i64 {
        match self {
            Self::Bogota => 15,
            Self::Medellin => 24,
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Self::Bogota => "bogota",
            Self::Medellin => "medellin",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for City {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bogota" | "bogotá" => Ok(Self::Bogota),
            "medellin" | "medellín" => Ok(Self::Medellin),
            _ => Err(WeatherError::UnknownCity(s.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("unknown city: {0} (expected bogota or medellin)")]
    UnknownCity(String),
    #[error("open-meteo request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result of a lookup, live or fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CityWeather {
    pub city: City,
    /// Whole degrees Celsius.
    pub temperature: i64,
    /// `HH:MM` in Colombia time.
    pub time: String,
    /// `false` when `temperature` is the fallback.
    pub live: bool,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
}

#[derive(Debug, Clone)]
pub struct WeatherService {
    http: reqwest::Client,
    base_url: String,
}

impl Default for WeatherService {
    fn default() -> Self {
        Self::with_base_url(reqwest::Client::new(), OPEN_METEO_URL)
    }
}

impl WeatherService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    /// Current temperature in °C, unrounded.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx responses and unexpected bodies.
    pub async fn current_temperature(&self, city: City) -> Result<f64, WeatherError> {
        let (lat, lon) = city.coordinates();
        let forecast = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current", "temperature_2m".to_owned()),
                ("timezone", COLOMBIA_TIMEZONE.to_owned()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<ForecastResponse>()
            .await?;
        Ok(forecast.current.temperature_2m)
    }

    /// Live temperature rounded to whole degrees, or the city's fallback.
    pub async fn city_weather(&self, city: City) -> CityWeather {
        let time = colombian_hour_minute(now_ms());
        match self.current_temperature(city).await {
            Ok(temperature) => CityWeather { city, temperature: round_celsius(temperature), time, live: true },
            Err(error) => {
                tracing::warn!(%city, %error, "weather lookup failed, using fallback");
                CityWeather { city, temperature: city.fallback_temperature(), time, live: false }
            }
        }
    }
}

/// `HH:MM:SS` in Colombia time for a Unix timestamp in milliseconds.
#[must_use]
pub fn colombian_time(unix_ms: i64) -> String {
    at_unix_ms(unix_ms)
        .and_then(|instant| {
            instant.to_offset(COLOMBIA_OFFSET).format(format_description!("[hour]:[minute]:[second]")).ok()
        })
        .unwrap_or_else(|| "--:--:--".to_owned())
}

/// `HH:MM` in Colombia time, as shown next to a city temperature.
#[must_use]
pub fn colombian_hour_minute(unix_ms: i64) -> String {
    at_unix_ms(unix_ms)
        .and_then(|instant| instant.to_offset(COLOMBIA_OFFSET).format(format_description!("[hour]:[minute]")).ok())
        .unwrap_or_else(|| "--:--".to_owned())
}

#[allow(clippy::cast_possible_truncation)]
fn round_celsius(value: f64) -> i64 {
    // Surface temperatures are far inside i64.
    value.round() as i64
}
