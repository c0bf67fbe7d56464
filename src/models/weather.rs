use chrono::{DateTime, Utc};
use serde::Deserialize;

// ─── Hourly weather series ───────────────────────────────────────────────────

/// One hourly weather sample.
///
/// All irradiance fields are present by construction; a sample the upstream
/// API reported as null carries `NaN`, which propagates through the pipeline
/// as undefined rather than being zero-filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSample {
    /// Timezone-aware sample instant (hourly).
    pub time: DateTime<Utc>,
    /// Ambient air temperature at 2 m (°C).
    pub temperature_2m: f64,
    /// Wind speed at 10 m (m/s).
    pub wind_speed_10m: f64,
    /// Direct-normal irradiance (W/m²).
    pub dni: f64,
    /// Diffuse-horizontal irradiance (W/m²).
    pub dhi: f64,
    /// Global-horizontal irradiance (W/m²).
    pub ghi: f64,
}

/// Ordered hourly weather series, aligned on a shared timestamp index.
pub type WeatherSeries = Vec<WeatherSample>;

// ─── Open-Meteo wire types ───────────────────────────────────────────────────

/// Top-level hourly response from the Open-Meteo forecast/archive APIs.
///
/// Requested with `timeformat=unixtime` so the timestamp index stays
/// timezone-aware end to end (the default ISO 8601 times are naive local).
#[derive(Debug, Deserialize)]
pub struct HourlyWeatherResponse {
    pub hourly: HourlyBlock,
}

/// The `hourly` block: parallel arrays keyed by the `time` index.
///
/// Each variable is optional on the wire; an absent column is a hard error
/// at the boundary (see `weather_service::into_series`), and nulls inside a
/// present column become `NaN`.
#[derive(Debug, Deserialize)]
pub struct HourlyBlock {
    pub time: Vec<i64>,
    pub temperature_2m: Option<Vec<Option<f64>>>,
    pub wind_speed_10m: Option<Vec<Option<f64>>>,
    pub direct_normal_irradiance: Option<Vec<Option<f64>>>,
    pub diffuse_radiation: Option<Vec<Option<f64>>>,
    pub shortwave_radiation: Option<Vec<Option<f64>>>,
}

// ─── Nominatim wire types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeResponse {
    pub address: Option<GeocodeAddress>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeocodeAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub country: Option<String>,
}
