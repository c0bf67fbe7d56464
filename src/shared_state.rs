use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::extract::FromRef;

use crate::config::Config;
use crate::models::forecast::ForecastResponse;
use crate::services::geocode_service::GeocodeService;
use crate::services::weather_service::WeatherService;

/// Latest computed forecast per configured site.
///
/// Written by the per-site background refresh tasks, read by the API
/// handlers. A site has no entry until its first refresh succeeds.
#[derive(Clone)]
pub struct AppState {
    forecasts: Arc<RwLock<HashMap<String, ForecastResponse>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            forecasts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn set_forecast(&self, site_id: &str, forecast: ForecastResponse) {
        if let Ok(mut map) = self.forecasts.write() {
            map.insert(site_id.to_string(), forecast);
        }
    }

    pub fn get_forecast(&self, site_id: &str) -> Option<ForecastResponse> {
        self.forecasts
            .read()
            .ok()
            .and_then(|map| map.get(site_id).cloned())
    }

    /// Number of sites with at least one successful refresh.
    pub fn ready_count(&self) -> usize {
        self.forecasts.read().map(|map| map.len()).unwrap_or(0)
    }
}

/// Everything the API handlers need. Handlers extract `State<AppState>` or
/// `State<Config>` via `FromRef` — a single `.with_state(shared)` covers all.
#[derive(Clone)]
pub struct SharedState {
    pub config: Config,
    pub app: AppState,
    pub weather: Arc<WeatherService>,
    pub geocode: Arc<GeocodeService>,
}

impl FromRef<SharedState> for Config {
    fn from_ref(shared: &SharedState) -> Self {
        shared.config.clone()
    }
}

impl FromRef<SharedState> for AppState {
    fn from_ref(shared: &SharedState) -> Self {
        shared.app.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forecast::{ForecastSummary, PanelConfig};
    use chrono::{TimeZone, Utc};

    fn forecast(site_id: &str) -> ForecastResponse {
        let t = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
        ForecastResponse {
            site_id: site_id.to_string(),
            latitude: 45.0,
            longitude: 7.0,
            computed_at: t,
            panel: PanelConfig::default(),
            summary: ForecastSummary {
                total_energy_kwh: 10.0,
                avg_energy_per_day_kwh: 5.0,
                peak_power_kw: 0.9,
                peak_time: t,
                recommended_tilt_deg: 45.0,
                recommended_azimuth_deg: 180.0,
            },
            series: vec![],
        }
    }

    #[test]
    fn stores_and_returns_latest_forecast() {
        let state = AppState::new();
        assert!(state.get_forecast("a").is_none());
        assert_eq!(state.ready_count(), 0);

        state.set_forecast("a", forecast("a"));
        state.set_forecast("a", forecast("a"));
        state.set_forecast("b", forecast("b"));

        assert_eq!(state.ready_count(), 2);
        assert_eq!(state.get_forecast("a").unwrap().site_id, "a");
    }
}
