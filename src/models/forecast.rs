use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Panel configuration ─────────────────────────────────────────────────────

/// Fixed-mount panel array configuration for one estimation run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct PanelConfig {
    /// Tilt from horizontal in degrees (0 = flat, 90 = vertical).
    pub tilt_deg: f64,
    /// Azimuth in degrees from true north, clockwise (180 = south).
    pub azimuth_deg: f64,
    /// Rated DC capacity at STC (kW, 1000 W/m² / 25 °C).
    pub capacity_kw: f64,
    /// DC power temperature coefficient (1/°C, typically small negative).
    #[serde(default = "default_gamma_pdc")]
    pub gamma_pdc: f64,
    /// Ground albedo for the reflected POA component.
    #[serde(default = "default_albedo")]
    pub albedo: f64,
}

pub fn default_gamma_pdc() -> f64 {
    -0.004
}

pub fn default_albedo() -> f64 {
    0.2
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            tilt_deg: 0.0,
            azimuth_deg: 180.0,
            capacity_kw: 1.0,
            gamma_pdc: default_gamma_pdc(),
            albedo: default_albedo(),
        }
    }
}

// ─── Derived series ──────────────────────────────────────────────────────────

/// One estimated DC power sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PowerPoint {
    /// Timezone-aware sample instant, same index as the weather input.
    pub time: DateTime<Utc>,
    /// Estimated instantaneous DC power (kW), never negative.
    pub power_kw: f64,
}

/// Per-timestamp plane-of-array irradiance breakdown (W/m²).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoaIrradiance {
    pub beam: f64,
    pub sky_diffuse: f64,
    pub ground_reflected: f64,
    /// Sum of the three components.
    pub global: f64,
}

// ─── Reporting ───────────────────────────────────────────────────────────────

/// Summary statistics over an hourly power series.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ForecastSummary {
    /// Total produced energy over the period (kWh; hourly samples, so kW sum
    /// directly yields kWh).
    pub total_energy_kwh: f64,
    /// Average energy per day (kWh/day).
    pub avg_energy_per_day_kwh: f64,
    /// Maximum power sample (kW).
    pub peak_power_kw: f64,
    /// Instant at which the maximum occurred.
    pub peak_time: DateTime<Utc>,
    /// Rule-of-thumb best tilt for this latitude (°).
    pub recommended_tilt_deg: f64,
    /// Rule-of-thumb best azimuth for this latitude (°, 180 = south).
    pub recommended_azimuth_deg: f64,
}

// ─── REST API responses ──────────────────────────────────────────────────────

/// Full per-site forecast returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ForecastResponse {
    /// Site or request identifier.
    pub site_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// When this forecast was computed.
    pub computed_at: DateTime<Utc>,
    pub panel: PanelConfig,
    pub summary: ForecastSummary,
    /// Hourly PV power series, "PV power [kW]".
    pub series: Vec<PowerPoint>,
}

/// Nearest city / country for a coordinate pair.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaceResponse {
    pub city: String,
    pub country: String,
}

/// Service health and configured-site count.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub sites_total: usize,
    pub sites_ready: usize,
}
