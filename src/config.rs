use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::forecast::{PanelConfig, default_albedo, default_gamma_pdc};
use crate::services::cell_temperature::Mounting;

fn default_refresh_secs() -> u64 {
    900
}

fn default_forecast_days() -> u8 {
    3
}

fn default_tilt() -> f64 {
    0.0
}

fn default_azimuth() -> f64 {
    180.0
}

fn default_capacity() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Seconds between background forecast refreshes per site.
    #[serde(default = "default_refresh_secs")]
    pub refresh_interval_secs: u64,
    /// Days of hourly forecast to request from Open-Meteo.
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
    pub sites: Vec<SiteConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// One configured PV site.
#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct SiteConfig {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_capacity")]
    pub capacity_kw: f64,
    #[serde(default = "default_tilt")]
    pub tilt_deg: f64,
    #[serde(default = "default_azimuth")]
    pub azimuth_deg: f64,
    #[serde(default = "default_gamma_pdc")]
    pub gamma_pdc: f64,
    #[serde(default = "default_albedo")]
    pub albedo: f64,
    /// SAPM mounting configuration for the cell-temperature stage.
    #[serde(default)]
    pub mounting: Mounting,
}

impl SiteConfig {
    pub fn panel(&self) -> PanelConfig {
        PanelConfig {
            tilt_deg: self.tilt_deg,
            azimuth_deg: self.azimuth_deg,
            capacity_kw: self.capacity_kw,
            gamma_pdc: self.gamma_pdc,
            albedo: self.albedo,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_site_uses_documented_defaults() {
        let json = r#"{
            "server": { "port": 8080 },
            "sites": [
                { "id": "berlin", "name": "Berlin rooftop",
                  "latitude": 52.52, "longitude": 13.41 }
            ]
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.refresh_interval_secs, 900);
        assert_eq!(config.forecast_days, 3);
        let site = &config.sites[0];
        assert_eq!(site.capacity_kw, 1.0);
        assert_eq!(site.tilt_deg, 0.0);
        assert_eq!(site.azimuth_deg, 180.0);
        assert_eq!(site.gamma_pdc, -0.004);
        assert_eq!(site.albedo, 0.2);
        assert_eq!(site.mounting, Mounting::OpenRackGlassPolymer);
    }

    #[test]
    fn site_panel_carries_all_fields() {
        let site = SiteConfig {
            id: "x".into(),
            name: "x".into(),
            latitude: 45.0,
            longitude: 7.0,
            capacity_kw: 9.6,
            tilt_deg: 35.0,
            azimuth_deg: 170.0,
            gamma_pdc: -0.0035,
            albedo: 0.25,
            mounting: Mounting::CloseMountGlassGlass,
        };
        let panel = site.panel();
        assert_eq!(panel.capacity_kw, 9.6);
        assert_eq!(panel.tilt_deg, 35.0);
        assert_eq!(panel.gamma_pdc, -0.0035);
    }
}
